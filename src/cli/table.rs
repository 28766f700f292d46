//! Commands over a single table file

use super::util::{
    flag_value, has_flag, load_table, parse_output_arg, render_table, write_output,
};
use dtable::{Error, GenerateOptions, Result};

pub fn cmd_normalize(args: &[String]) -> Result<()> {
    let table = load_table(args, "Usage: dtable normalize <table.json> [--output <file>]")?;
    for warning in table.warnings() {
        eprintln!("⚠ {}", warning);
    }
    let output = parse_output_arg(args);
    write_output(&output, &render_table(&table, &output)?)
}

pub fn cmd_run(args: &[String]) -> Result<()> {
    let table = load_table(args, "Usage: dtable run <table.json> [--json]")?;
    let report = table
        .engine()
        .run(table.test_cases(), table.columns(), table.rows());

    let content = if has_flag(args, "--json") {
        serde_json::to_string_pretty(&report)?
    } else {
        report.to_report()
    };
    write_output(&parse_output_arg(args), &content)?;

    if report.summary.all_passed() {
        Ok(())
    } else {
        Err(format!("{} test case(s) failed", report.summary.failed).into())
    }
}

pub fn cmd_generate(args: &[String]) -> Result<()> {
    let mut table = load_table(
        args,
        "Usage: dtable generate <table.json> [--no-negative] [--max-negatives <n>] [--output <file>]",
    )?;

    let mut options: GenerateOptions = table.engine().config().generate.clone();
    if has_flag(args, "--no-negative") {
        options.include_negative = false;
    }
    if let Some(n) = flag_value(args, &["--max-negatives"]) {
        options.max_negatives_per_rule = n
            .parse()
            .map_err(|_| Error::Other(format!("Invalid --max-negatives: {}", n)))?;
    }

    let count = table.generate_suite(Some(&options));
    eprintln!("Generated {} test case(s)", count);

    let output = parse_output_arg(args);
    write_output(&output, &render_table(&table, &output)?)
}

pub fn cmd_validate(args: &[String]) -> Result<()> {
    let table = load_table(args, "Usage: dtable validate <table.json> [--json]")?;
    let issues = table.validate();

    if has_flag(args, "--json") {
        println!("{}", serde_json::to_string_pretty(&issues)?);
    } else if issues.is_empty() {
        println!("✓ {} is valid", table.title);
    } else {
        println!("{}:", table.title);
        for issue in &issues {
            println!("  ⚠ {}", issue);
        }
    }
    Ok(())
}
