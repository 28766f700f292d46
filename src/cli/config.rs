//! Schema output

use dtable::{DecisionTable, EngineConfig, Result, SuiteReport, TableSnapshot};

pub fn cmd_schema(args: &[String]) -> Result<()> {
    let schema_name = args.first().map(|s| s.as_str()).unwrap_or("list");

    match schema_name {
        "list" => {
            println!("Available schemas: table, snapshot, config, report");
            Ok(())
        }
        "table" => print_schema::<DecisionTable>(),
        "snapshot" => print_schema::<TableSnapshot>(),
        "config" => print_schema::<EngineConfig>(),
        "report" => print_schema::<SuiteReport>(),
        _ => Err(format!("Unknown schema: {}", schema_name).into()),
    }
}

fn print_schema<T: schemars::JsonSchema>() -> Result<()> {
    let schema = schemars::schema_for!(T);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
