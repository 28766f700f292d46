//! CLI utility helpers

use dtable::{DecisionTable, Engine, EngineConfig, Error, Result, CONFIG_FILE};
use std::fs;
use std::path::{Path, PathBuf};

/// Value following a flag, e.g. `--output <file>`
pub fn flag_value<'a>(args: &'a [String], names: &[&str]) -> Option<&'a str> {
    args.iter()
        .position(|a| names.contains(&a.as_str()))
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

pub fn has_flag(args: &[String], name: &str) -> bool {
    args.iter().any(|a| a == name)
}

/// Parse --output argument to determine output file path
pub fn parse_output_arg(args: &[String]) -> Option<PathBuf> {
    flag_value(args, &["--output", "-o"]).map(PathBuf::from)
}

/// Engine from --config, else ./dtable.yaml, else defaults
pub fn load_engine(args: &[String]) -> Result<Engine> {
    let config = match flag_value(args, &["--config", "-c"]) {
        Some(path) => EngineConfig::load(Path::new(path))?,
        None => {
            let cwd = std::env::current_dir().map_err(Error::Io)?;
            EngineConfig::load_from_dir(&cwd)?.unwrap_or_default()
        }
    };
    tracing::debug!(file = CONFIG_FILE, ?config, "engine config");
    Ok(Engine::with_config(config))
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}

/// Load a table file (JSON or YAML by extension) with the configured engine
pub fn load_table(args: &[String], usage: &str) -> Result<DecisionTable> {
    let path = args
        .first()
        .filter(|a| !a.starts_with('-'))
        .ok_or_else(|| Error::Other(usage.to_string()))?;
    let path = Path::new(path);
    let content = fs::read_to_string(path).map_err(Error::Io)?;
    let engine = load_engine(args)?;
    if is_yaml(path) {
        DecisionTable::from_yaml_with(&content, engine)
    } else {
        DecisionTable::from_json_with(&content, engine)
    }
}

/// Serialize a table in the format implied by the output path
pub fn render_table(table: &DecisionTable, path: &Option<PathBuf>) -> Result<String> {
    match path {
        Some(p) if is_yaml(p) => table.to_yaml(),
        _ => table.to_json(),
    }
}

/// Write content to file or stdout
pub fn write_output(path: &Option<PathBuf>, content: &str) -> Result<()> {
    match path {
        Some(p) => {
            fs::write(p, content).map_err(Error::Io)?;
            eprintln!("Written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_flag_value() {
        let a = args(&["t.json", "--max-negatives", "3", "--json"]);
        assert_eq!(flag_value(&a, &["--max-negatives"]), Some("3"));
        assert_eq!(flag_value(&a, &["--output"]), None);
        assert!(has_flag(&a, "--json"));
    }

    #[test]
    fn test_load_table_requires_path() {
        let err = load_table(&args(&["--json"]), "Usage: dtable run <table.json>").unwrap_err();
        assert!(err.to_string().contains("Usage"));
    }

    #[test]
    fn test_load_yaml_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.yaml");
        fs::write(
            &path,
            "title: t\ncolumns:\n  - name: Result\n  - name: A\nrows:\n  - [r, a]\n",
        )
        .unwrap();
        let cfg = dir.path().join("cfg.yaml");
        fs::write(&cfg, "version: 1\n").unwrap();

        let table = load_table(
            &args(&[path.to_str().unwrap(), "--config", cfg.to_str().unwrap()]),
            "usage",
        )
        .unwrap();
        assert_eq!(table.rows()[0], vec!["a", "r"]);
    }

    #[test]
    fn test_configured_output_names_bind_test_cases() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.json");
        fs::write(
            &path,
            r#"{
                "columns": [{ "name": "Result" }, { "name": "A" }, { "name": "Verdict" }],
                "rows": [["r", "a", "v"]],
                "testCases": [{ "inputs": ["r", "a"], "expected": "v" }]
            }"#,
        )
        .unwrap();
        let cfg = dir.path().join("cfg.yaml");
        fs::write(&cfg, "output_names: [verdict]\n").unwrap();

        let mut table = load_table(
            &args(&[path.to_str().unwrap(), "--config", cfg.to_str().unwrap()]),
            "usage",
        )
        .unwrap();
        let names: Vec<&str> = table.columns().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Result", "A", "Verdict"]);
        assert_eq!(table.run_suite().passed, 1);
    }
}
