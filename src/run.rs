//! Test suite execution
//!
//! A test case matches the first row whose cell, for every input column,
//! equals the case's input at that position. Cells are looked up by column
//! *name* so a reordered column list still finds the right cell. The result
//! is the matched row's output cell, or the no-match literal.
//!
//! | expected | result      | status |
//! |----------|-------------|--------|
//! | `""`     | anything    | `None` |
//! | `x`      | `x`         | `Pass` |
//! | `x`      | other       | `Fail` |

use crate::engine::Engine;
use crate::normalize::{canonical_cell, OutputColumn};
use crate::table::{Column, Row};
use crate::testcase::{TestCase, TestStatus};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Pass/fail counts for a suite
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SuiteSummary {
    pub passed: usize,
    pub failed: usize,
    pub total: usize,
}

impl SuiteSummary {
    pub fn of(test_cases: &[TestCase]) -> Self {
        Self {
            passed: test_cases.iter().filter(|tc| tc.passed()).count(),
            failed: test_cases.iter().filter(|tc| tc.failed()).count(),
            total: test_cases.len(),
        }
    }

    /// Cases that ran without an expectation
    pub fn unasserted(&self) -> usize {
        self.total - self.passed - self.failed
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

impl std::fmt::Display for SuiteSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} passed, {} failed, {} total",
            self.passed, self.failed, self.total
        )
    }
}

/// Result of running a suite
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SuiteReport {
    pub test_cases: Vec<TestCase>,
    pub summary: SuiteSummary,
    /// Output column used for results
    pub output: Option<OutputColumn>,
    /// Persistent warnings (e.g. positional output fallback)
    pub warnings: Vec<String>,
}

impl SuiteReport {
    /// Human-readable report
    pub fn to_report(&self) -> String {
        let mut out = String::new();
        for warning in &self.warnings {
            out.push_str(&format!("⚠ {}\n", warning));
        }
        for (idx, tc) in self.test_cases.iter().enumerate() {
            let mark = match tc.status {
                Some(TestStatus::Pass) => "✓",
                Some(TestStatus::Fail) => "✗",
                None => "·",
            };
            out.push_str(&format!(
                "{} #{} [{}] -> {}",
                mark,
                idx + 1,
                tc.inputs.join(", "),
                tc.result.as_deref().unwrap_or("")
            ));
            if tc.failed() {
                out.push_str(&format!(" (expected {})", tc.expected));
            }
            out.push('\n');
        }
        out.push_str(&format!("Summary: {}", self.summary));
        out
    }
}

impl Engine {
    /// Run every test case against the rows
    pub fn run(&self, test_cases: &[TestCase], columns: &[Column], rows: &[Row]) -> SuiteReport {
        let normalized = self.ensure_output_last(columns);
        let output = self.resolve_output(&normalized);
        let input_names: Vec<&str> = normalized[..normalized.len().saturating_sub(1)]
            .iter()
            .map(|c| c.name.as_str())
            .collect();

        // Positions in the caller's column order, found by name
        let input_positions: Vec<Option<usize>> = input_names
            .iter()
            .map(|name| columns.iter().position(|c| c.name == *name))
            .collect();
        let output_position = normalized
            .last()
            .and_then(|out| columns.iter().position(|c| c.name == out.name));

        let cell = |row: &Row, pos: usize| -> Option<String> {
            row.get(pos)
                .map(|v| canonical_cell(&columns[pos].typ, v))
        };

        let test_cases: Vec<TestCase> = test_cases
            .iter()
            .map(|tc| {
                let matched = rows.iter().position(|row| {
                    input_positions.iter().enumerate().all(|(idx, pos)| {
                        match (pos.and_then(|p| cell(row, p)), tc.inputs.get(idx)) {
                            (Some(value), Some(input)) => value == *input,
                            _ => false,
                        }
                    })
                });

                let result = match matched {
                    Some(r) => output_position
                        .and_then(|p| cell(&rows[r], p))
                        .unwrap_or_default(),
                    None => self.config().no_match.clone(),
                };

                let status = if tc.expected.is_empty() {
                    None
                } else if result == tc.expected {
                    Some(TestStatus::Pass)
                } else {
                    Some(TestStatus::Fail)
                };

                TestCase {
                    result: Some(result),
                    status,
                    matched_row: matched,
                    ..tc.clone()
                }
            })
            .collect();

        let summary = SuiteSummary::of(&test_cases);
        tracing::debug!(%summary, "suite run");

        let warnings = output
            .and_then(|o| o.warning(&normalized))
            .into_iter()
            .collect();

        SuiteReport {
            test_cases,
            summary,
            output,
            warnings,
        }
    }
}
