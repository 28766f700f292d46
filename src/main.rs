//! dtable CLI - Command-line interface
//!
//! Commands:
//!   normalize - Normalize a table (output last, rows repaired)
//!   run       - Run a table's test suite
//!   generate  - Generate a test suite from a table's rows
//!   validate  - Report table diagnostics
//!   schema    - Print JSON schema for table or config files

mod cli;

use dtable::*;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return ExitCode::from(1);
    }

    let result = match args[1].as_str() {
        "normalize" => cli::cmd_normalize(&args[2..]),
        "run" => cli::cmd_run(&args[2..]),
        "generate" => cli::cmd_generate(&args[2..]),
        "validate" => cli::cmd_validate(&args[2..]),
        "schema" => cli::cmd_schema(&args[2..]),
        "version" | "--version" | "-v" => {
            println!("dtable {}", VERSION);
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        cmd => {
            eprintln!("Unknown command: {}", cmd);
            print_usage();
            Err("Unknown command".into())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(1)
        }
    }
}

fn print_usage() {
    println!(
        r#"
dtable - Decision table engine

USAGE:
    dtable <COMMAND> [OPTIONS]

COMMANDS:
    normalize <table.json>           Move output column last, repair rows
    run <table.json>                 Run the table's test suite
    generate <table.json>            Replace the suite with generated cases
    validate <table.json>            Report table diagnostics
    schema [table|config]            Print JSON schema
    version                          Print version

OPTIONS:
    --config <dtable.yaml>           Engine config (default: ./dtable.yaml if present)
    --output <file>                  Output file (default: stdout)
    --json                           JSON output format (run, validate)
    --no-negative                    Positive cases only (generate)
    --max-negatives <n>              Negative cases per rule (generate, default 1)

Tables may be JSON or YAML (.yaml/.yml). Set RUST_LOG=debug for tracing.

EXAMPLES:
    dtable run claims.json
    dtable generate claims.json --max-negatives 2 --output claims.json
    dtable schema table > table.schema.json
"#
    );
}
