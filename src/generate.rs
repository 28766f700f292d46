//! Test suite generation
//!
//! Builds a suite from the rows of a table:
//! - one positive case per row (its inputs, expecting its output)
//! - optionally, negative cases that change one input of a row to another
//!   value observed in that column and expect no match
//!
//! Generated cases are unrun: `result` and `status` are `None`.

use crate::engine::Engine;
use crate::table::{Column, Row};
use crate::testcase::TestCase;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Generation options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct GenerateOptions {
    /// Emit negative cases
    #[serde(default = "default_true")]
    pub include_negative: bool,

    /// Upper bound on negative cases per row
    #[serde(default = "default_max_negatives")]
    pub max_negatives_per_rule: usize,
}

fn default_true() -> bool {
    true
}

fn default_max_negatives() -> usize {
    1
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            include_negative: true,
            max_negatives_per_rule: 1,
        }
    }
}

impl GenerateOptions {
    /// Positive cases only
    pub fn positive_only() -> Self {
        Self {
            include_negative: false,
            ..Default::default()
        }
    }
}

impl Engine {
    /// Generate positive and negative test cases from the rows
    pub fn generate(
        &self,
        columns: &[Column],
        rows: &[Row],
        options: &GenerateOptions,
    ) -> Vec<TestCase> {
        if rows.is_empty() || columns.is_empty() {
            return Vec::new();
        }

        let (inputs, output) = self.split_columns(columns);
        let cell = |row: &Row, idx: usize| row.get(idx).cloned().unwrap_or_default();
        let input_values =
            |row: &Row| -> Vec<String> { inputs.iter().map(|&i| cell(row, i)).collect() };

        let mut cases: Vec<TestCase> = rows
            .iter()
            .enumerate()
            .map(|(ri, row)| TestCase {
                inputs: input_values(row),
                expected: output.map(|o| cell(row, o.index)).unwrap_or_default(),
                source_row_index: Some(ri),
                description: Some("Positive - should match rule".into()),
                ..Default::default()
            })
            .collect();
        let positives = cases.len();

        if options.include_negative && options.max_negatives_per_rule > 0 {
            // Distinct non-empty values per input column, first-seen order
            let observed: Vec<Vec<String>> = inputs
                .iter()
                .map(|&ci| {
                    let mut values: Vec<String> = Vec::new();
                    for row in rows {
                        let v = cell(row, ci);
                        if !v.is_empty() && !values.contains(&v) {
                            values.push(v);
                        }
                    }
                    values
                })
                .collect();

            for (ri, row) in rows.iter().enumerate() {
                let base = input_values(row);
                for (ci, values) in observed
                    .iter()
                    .enumerate()
                    .take(options.max_negatives_per_rule)
                {
                    let mut mutated = base.clone();
                    mutated[ci] = values
                        .iter()
                        .find(|v| **v != base[ci])
                        .cloned()
                        .unwrap_or_else(|| self.config().negative_sentinel.clone());

                    cases.push(TestCase {
                        inputs: mutated,
                        expected: self.config().no_match.clone(),
                        source_row_index: Some(ri),
                        description: Some(format!("Negative - change column {}", ci + 1)),
                        ..Default::default()
                    });
                }
            }
        }

        tracing::debug!(
            positives,
            negatives = cases.len() - positives,
            "generated test suite"
        );
        cases
    }
}
