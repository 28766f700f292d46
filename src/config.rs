//! Engine configuration
//!
//! Loaded from an optional `dtable.yaml`. Every field has a default, so an
//! empty file (or no file at all) yields the stock behaviour:
//!
//! ```yaml
//! version: 1
//! output_names: [result, output, decision]
//! no_match: "No match found"
//! negative_sentinel: "-"
//! generate:
//!   include_negative: true
//!   max_negatives_per_rule: 1
//! autofill: first_match
//! ```

use crate::error::{Error, Result};
use crate::generate::GenerateOptions;
use crate::testcase::AutofillPolicy;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Config file name looked up in the working directory
pub const CONFIG_FILE: &str = "dtable.yaml";

/// Literal reported when no row matches a test case
pub const NO_MATCH: &str = "No match found";

/// Value substituted by negative generation when a column has no alternative
pub const NEGATIVE_SENTINEL: &str = "-";

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[schemars(title = "dtable config", description = "Decision table engine settings")]
pub struct EngineConfig {
    /// Schema version for migrations
    #[serde(default = "default_version")]
    pub version: u32,

    /// Column names (trimmed, case-insensitive) that designate the output column
    #[serde(default = "default_output_names")]
    pub output_names: Vec<String>,

    /// Result reported when no row matches
    #[serde(default = "default_no_match")]
    pub no_match: String,

    /// Input value used by negative cases when no alternative value exists
    #[serde(default = "default_sentinel")]
    pub negative_sentinel: String,

    /// Default options for suite generation
    #[serde(default)]
    pub generate: GenerateOptions,

    /// Donor-row policy used when realignment autofills a new column
    #[serde(default)]
    pub autofill: AutofillPolicy,
}

fn default_version() -> u32 {
    1
}

fn default_output_names() -> Vec<String> {
    vec!["result".into(), "output".into(), "decision".into()]
}

fn default_no_match() -> String {
    NO_MATCH.to_string()
}

fn default_sentinel() -> String {
    NEGATIVE_SENTINEL.to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            output_names: default_output_names(),
            no_match: default_no_match(),
            negative_sentinel: default_sentinel(),
            generate: GenerateOptions::default(),
            autofill: AutofillPolicy::default(),
        }
    }
}

impl EngineConfig {
    /// Parse config from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty document deserializes to unit, not a map
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: EngineConfig = serde_norway::from_str(yaml)
            .map_err(|e| Error::Config(format!("Failed to parse {}: {}", CONFIG_FILE, e)))?;

        if config.version != 1 {
            return Err(Error::Config(format!(
                "Unsupported {} version: {}",
                CONFIG_FILE, config.version
            )));
        }

        if config.output_names.iter().all(|n| n.trim().is_empty()) {
            return Err(Error::Config("output_names must not be empty".into()));
        }

        Ok(config)
    }

    /// Load config from an explicit file path
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(Error::Io)?;
        Self::from_yaml(&content)
    }

    /// Load `dtable.yaml` from a directory, if present
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let file = dir.join(CONFIG_FILE);
        if !file.exists() {
            return Ok(None);
        }
        Self::load(&file).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(EngineConfig::from_yaml("").unwrap(), EngineConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = EngineConfig::from_yaml(
            r#"
output_names: [verdict]
generate:
  include_negative: false
autofill: unanimous
"#,
        )
        .unwrap();

        assert_eq!(config.output_names, vec!["verdict".to_string()]);
        assert!(!config.generate.include_negative);
        assert_eq!(config.generate.max_negatives_per_rule, 1);
        assert_eq!(config.autofill, AutofillPolicy::Unanimous);
        assert_eq!(config.no_match, NO_MATCH);
    }

    #[test]
    fn test_rejects_unknown_version() {
        let err = EngineConfig::from_yaml("version: 2").unwrap_err();
        assert!(err.to_string().contains("version"));
    }

    #[test]
    fn test_rejects_blank_output_names() {
        assert!(EngineConfig::from_yaml("output_names: ['  ']").is_err());
    }

    #[test]
    fn test_load_from_dir_missing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(EngineConfig::load_from_dir(dir.path()).unwrap().is_none());
    }
}
