//! Test cases and realignment
//!
//! A test case's `inputs` are bound positionally to the input columns of
//! the table (every column except the output). When the column set
//! changes, [`Engine::realign`] re-binds each vector by column name:
//!
//! 1. values whose column survived (same name) are kept,
//! 2. a new or emptied column is autofilled from a donor row whose other
//!    input cells match the test case,
//! 3. anything else becomes the empty string.
//!
//! `expected` and every other field are carried over untouched.

use crate::engine::Engine;
use crate::table::{Column, Row};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Outcome of a test case after a suite run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    Pass,
    Fail,
}

impl std::fmt::Display for TestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TestStatus::Pass => write!(f, "pass"),
            TestStatus::Fail => write!(f, "fail"),
        }
    }
}

/// A test case against a decision table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    /// One value per input column, in column order
    #[serde(default)]
    pub inputs: Vec<String>,

    /// Expected output; empty means no assertion
    #[serde(default)]
    pub expected: String,

    /// Output produced by the last run
    #[serde(default)]
    pub result: Option<String>,

    /// Status from the last run; `None` when unrun or nothing was asserted
    #[serde(default)]
    pub status: Option<TestStatus>,

    /// Row this case was generated from
    #[serde(default)]
    pub source_row_index: Option<usize>,

    /// Row matched by the last run
    #[serde(default)]
    pub matched_row: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Column names the inputs were written against (suggested cases only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_names: Option<Vec<String>>,
}

impl TestCase {
    pub fn new(inputs: Vec<String>, expected: impl Into<String>) -> Self {
        Self {
            inputs,
            expected: expected.into(),
            ..Default::default()
        }
    }

    /// Empty case with `n` blank inputs
    pub fn blank(n: usize) -> Self {
        Self::new(vec![String::new(); n], "")
    }

    pub fn passed(&self) -> bool {
        self.status == Some(TestStatus::Pass)
    }

    pub fn failed(&self) -> bool {
        self.status == Some(TestStatus::Fail)
    }
}

/// How a donor row is chosen when autofilling a realigned column
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AutofillPolicy {
    /// First matching row in row order donates its value
    #[default]
    FirstMatch,
    /// Every matching row must hold the same non-empty value
    Unanimous,
}

impl Engine {
    /// Re-bind test case inputs from `prev_columns` to `new_columns`
    ///
    /// `current_rows` must be laid out in the normalized order of
    /// `new_columns` (output last); they are only read for autofill.
    pub fn realign(
        &self,
        new_columns: &[Column],
        prev_columns: &[Column],
        prev_test_cases: &[TestCase],
        current_rows: &[Row],
    ) -> Vec<TestCase> {
        let new_cols = self.ensure_output_last(new_columns);
        let prev_cols = self.ensure_output_last(prev_columns);
        self.realign_inputs(
            &input_names(&new_cols),
            &input_names(&prev_cols),
            prev_test_cases,
            current_rows,
        )
    }

    /// Re-bind test case inputs from one list of input names to another
    pub(crate) fn realign_inputs(
        &self,
        new_inputs: &[&str],
        prev_inputs: &[&str],
        prev_test_cases: &[TestCase],
        current_rows: &[Row],
    ) -> Vec<TestCase> {
        let realigned: Vec<TestCase> = prev_test_cases
            .iter()
            .map(|tc| {
                let by_name: HashMap<&str, &str> = prev_inputs
                    .iter()
                    .zip(&tc.inputs)
                    .map(|(name, value)| (*name, value.as_str()))
                    .collect();

                let inputs = new_inputs
                    .iter()
                    .enumerate()
                    .map(|(idx, name)| match by_name.get(name) {
                        Some(v) if !v.is_empty() => v.to_string(),
                        _ => self.autofill(idx, new_inputs, &by_name, current_rows),
                    })
                    .collect();

                TestCase {
                    inputs,
                    ..tc.clone()
                }
            })
            .collect();

        tracing::debug!(
            columns = ?new_inputs,
            test_cases = realigned.len(),
            "realigned test cases"
        );
        realigned
    }

    /// Value for input column `idx` taken from a row matching the other inputs
    fn autofill(
        &self,
        idx: usize,
        input_names: &[&str],
        by_name: &HashMap<&str, &str>,
        rows: &[Row],
    ) -> String {
        // Known values at the other input positions; unknown ones are wildcards
        let pattern: Vec<Option<&str>> = input_names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                if i == idx {
                    None
                } else {
                    by_name.get(name).copied()
                }
            })
            .collect();

        let mut donors = rows.iter().enumerate().filter(|(_, row)| {
            pattern
                .iter()
                .enumerate()
                .all(|(i, p)| p.is_none_or(|v| row.get(i).map(String::as_str) == Some(v)))
        });

        let value = match self.config().autofill {
            AutofillPolicy::FirstMatch => donors.next().and_then(|(r, row)| {
                tracing::debug!(
                    column = input_names[idx],
                    row = r,
                    "autofilled from first matching row"
                );
                row.get(idx).cloned()
            }),
            AutofillPolicy::Unanimous => {
                let values: Vec<&str> = donors
                    .map(|(_, row)| row.get(idx).map(String::as_str).unwrap_or(""))
                    .collect();
                match values.split_first() {
                    Some((first, rest)) if rest.iter().all(|v| v == first) => {
                        Some(first.to_string())
                    }
                    Some(_) => {
                        tracing::debug!(
                            column = input_names[idx],
                            "matching rows disagree, leaving value empty"
                        );
                        None
                    }
                    None => None,
                }
            }
        };

        value.filter(|v| !v.is_empty()).unwrap_or_default()
    }
}

fn input_names(normalized: &[Column]) -> Vec<&str> {
    let n = normalized.len().saturating_sub(1);
    normalized[..n].iter().map(|c| c.name.as_str()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::engine::realign;

    fn row(cells: &[&str]) -> Row {
        cells.iter().map(|s| s.to_string()).collect()
    }

    fn case(inputs: &[&str], expected: &str) -> TestCase {
        TestCase::new(inputs.iter().map(|s| s.to_string()).collect(), expected)
    }

    #[test]
    fn test_reorder_preserves_values() {
        let prev = vec![
            Column::string("A"),
            Column::string("B"),
            Column::string("Result"),
        ];
        let new = vec![
            Column::string("B"),
            Column::string("A"),
            Column::string("Result"),
        ];
        let out = realign(&new, &prev, &[case(&["a", "b"], "r")], &[]);
        assert_eq!(out[0].inputs, vec!["b", "a"]);
        assert_eq!(out[0].expected, "r");
    }

    #[test]
    fn test_new_column_autofilled_from_matching_row() {
        let prev = vec![Column::string("A"), Column::string("Result")];
        let new = vec![
            Column::string("A"),
            Column::string("B"),
            Column::string("Result"),
        ];
        let rows = vec![row(&["x", "1", "R1"]), row(&["y", "2", "R2"])];
        let out = realign(&new, &prev, &[case(&["y"], "R2")], &rows);
        assert_eq!(out[0].inputs, vec!["y", "2"]);
    }

    #[test]
    fn test_new_column_without_match_is_empty() {
        let prev = vec![Column::string("A"), Column::string("Result")];
        let new = vec![
            Column::string("A"),
            Column::string("B"),
            Column::string("Result"),
        ];
        let rows = vec![row(&["x", "1", "R1"])];
        let out = realign(&new, &prev, &[case(&["z"], "")], &rows);
        assert_eq!(out[0].inputs, vec!["z", ""]);
    }

    #[test]
    fn test_removed_column_dropped() {
        let prev = vec![
            Column::string("A"),
            Column::string("B"),
            Column::string("Result"),
        ];
        let new = vec![Column::string("B"), Column::string("Result")];
        let out = realign(&new, &prev, &[case(&["a", "b"], "r")], &[]);
        assert_eq!(out[0].inputs, vec!["b"]);
    }

    #[test]
    fn test_short_inputs_are_tolerated() {
        let cols = vec![
            Column::string("A"),
            Column::string("B"),
            Column::string("Result"),
        ];
        let out = realign(&cols, &cols, &[case(&["a"], "")], &[]);
        assert_eq!(out[0].inputs, vec!["a", ""]);
    }

    #[test]
    fn test_unanimous_policy_rejects_disagreeing_rows() {
        let config = EngineConfig {
            autofill: AutofillPolicy::Unanimous,
            ..Default::default()
        };
        let engine = Engine::with_config(config);
        let prev = vec![Column::string("A"), Column::string("Result")];
        let new = vec![
            Column::string("A"),
            Column::string("B"),
            Column::string("Result"),
        ];
        let rows = vec![row(&["x", "1", "R1"]), row(&["x", "2", "R2"])];
        let out = engine.realign(&new, &prev, &[case(&["x"], "")], &rows);
        assert_eq!(out[0].inputs, vec!["x", ""]);

        let first = Engine::new().realign(&new, &prev, &[case(&["x"], "")], &rows);
        assert_eq!(first[0].inputs, vec!["x", "1"]);
    }

    #[test]
    fn test_run_state_carried_over() {
        let cols = vec![Column::string("A"), Column::string("Result")];
        let mut tc = case(&["a"], "r");
        tc.result = Some("r".into());
        tc.status = Some(TestStatus::Pass);
        let out = realign(&cols, &cols, std::slice::from_ref(&tc), &[]);
        assert_eq!(out[0], tc);
    }
}
