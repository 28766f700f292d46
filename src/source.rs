//! Boundary with the rule repository
//!
//! The engine only sees in-memory tables. Two collaborators sit at the
//! edge: a source that supplies parsed decision definitions, and a sink
//! that stores the finalized `{ columns, rows, testCases }` triple.
//! `DirectoryStore` implements both over `<dir>/<name>.json` files.

use crate::error::{Error, Result};
use crate::table::{Column, DecisionTable, Row};
use crate::testcase::TestCase;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// A rule as delivered by the repository: input and output entries
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ParsedRule {
    #[serde(default)]
    pub inputs: Vec<Value>,
    #[serde(default)]
    pub outputs: Vec<Value>,
}

/// A decision definition as delivered by the repository
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ParsedDecision {
    #[serde(default)]
    pub inputs: Vec<Option<String>>,
    #[serde(default)]
    pub outputs: Vec<Option<String>>,
    #[serde(default)]
    pub rules: Vec<ParsedRule>,
}

/// Cell text for a repository value; `null` becomes empty
fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl DecisionTable {
    /// Build a table from a parsed decision: inputs then outputs, all
    /// `String`/`Equals`; a decision without rules gets one blank row
    pub fn from_parsed(title: impl Into<String>, parsed: &ParsedDecision) -> Self {
        let columns: Vec<Column> = parsed
            .inputs
            .iter()
            .chain(&parsed.outputs)
            .map(|name| Column::string(name.clone().unwrap_or_default()))
            .collect();

        let mut rows: Vec<Row> = parsed
            .rules
            .iter()
            .map(|r| r.inputs.iter().chain(&r.outputs).map(cell_text).collect())
            .collect();
        if rows.is_empty() {
            rows.push(vec![String::new(); columns.len()]);
        }

        DecisionTable::from_parts(title, columns, rows, Vec::new())
    }
}

/// The persisted triple
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TableSnapshot {
    pub columns: Vec<Column>,
    pub rows: Vec<Row>,
    #[serde(default)]
    pub test_cases: Vec<TestCase>,
}

impl From<&DecisionTable> for TableSnapshot {
    fn from(table: &DecisionTable) -> Self {
        Self {
            columns: table.columns().to_vec(),
            rows: table.rows().to_vec(),
            test_cases: table.test_cases().to_vec(),
        }
    }
}

impl TableSnapshot {
    /// Restore a normalized table
    pub fn into_table(self, title: impl Into<String>) -> DecisionTable {
        DecisionTable::from_parts(title, self.columns, self.rows, self.test_cases)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::TableParse(e.to_string()))
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_norway::to_string(self)?)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_norway::from_str(yaml).map_err(|e| Error::TableParse(e.to_string()))
    }

    /// Content hash for change detection
    pub fn hash(&self) -> String {
        use sha2::{Digest, Sha256};
        let content = serde_json::to_string(self).unwrap_or_default();
        let mut hasher = Sha256::new();
        hasher.update(content.as_bytes());
        format!("sha256:{}", hex::encode(&hasher.finalize()[..8]))
    }
}

/// Supplies decision definitions
pub trait TableSource {
    fn load(&self, name: &str) -> Result<DecisionTable>;
}

/// Stores finalized tables
pub trait TableSink {
    fn save(&self, name: &str, snapshot: &TableSnapshot) -> Result<()>;
}

/// JSON files in a directory, one per table
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, name: &str) -> Result<PathBuf> {
        if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
            return Err(Error::Other(format!("Invalid table name: {:?}", name)));
        }
        Ok(self.root.join(format!("{}.json", name)))
    }
}

impl TableSource for DirectoryStore {
    fn load(&self, name: &str) -> Result<DecisionTable> {
        let content = std::fs::read_to_string(self.path_for(name)?).map_err(Error::Io)?;
        let value: Value =
            serde_json::from_str(&content).map_err(|e| Error::TableParse(e.to_string()))?;
        let mut table = DecisionTable::from_json(&content)?;
        // Bare snapshots carry no title
        if value.get("title").is_none() {
            table.title = name.to_string();
        }
        Ok(table)
    }
}

impl TableSink for DirectoryStore {
    fn save(&self, name: &str, snapshot: &TableSnapshot) -> Result<()> {
        let path = self.path_for(name)?;
        std::fs::create_dir_all(&self.root).map_err(Error::Io)?;
        std::fs::write(&path, snapshot.to_json()?).map_err(Error::Io)?;
        tracing::debug!(path = %path.display(), hash = %snapshot.hash(), "saved table");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_parsed() {
        let parsed: ParsedDecision = serde_json::from_value(json!({
            "inputs": ["Indicator", null],
            "outputs": ["Result"],
            "rules": [
                { "inputs": ["Y", true], "outputs": ["Proceed"] },
                { "inputs": [null, 3], "outputs": [null] }
            ]
        }))
        .unwrap();

        let table = DecisionTable::from_parsed("Check", &parsed);
        let names: Vec<&str> = table.columns().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Indicator", "", "Result"]);
        assert_eq!(table.rows()[0], vec!["Y", "true", "Proceed"]);
        assert_eq!(table.rows()[1], vec!["", "3", ""]);
    }

    #[test]
    fn test_from_parsed_without_rules() {
        let parsed = ParsedDecision {
            inputs: vec![Some("A".into())],
            outputs: vec![Some("Decision".into())],
            rules: vec![],
        };
        let table = DecisionTable::from_parsed("t", &parsed);
        assert_eq!(table.rows(), &[vec![String::new(), String::new()]]);
    }

    #[test]
    fn test_hash_changes_with_content() {
        let table = DecisionTable::new();
        let a = TableSnapshot::from(&table);
        let mut b = a.clone();
        b.rows[0][0] = "x".into();
        assert!(a.hash().starts_with("sha256:"));
        assert_ne!(a.hash(), b.hash());
        assert_eq!(a.hash(), TableSnapshot::from(&table).hash());
    }

    #[test]
    fn test_rejects_path_names() {
        let store = DirectoryStore::new("/tmp");
        assert!(store.load("../etc").is_err());
        assert!(store.save("", &TableSnapshot::default()).is_err());
    }
}
