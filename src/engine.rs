//! The decision table engine
//!
//! `Engine` carries an [`EngineConfig`] and exposes the four core
//! operations. The free functions use the default configuration:
//!
//! ```text
//! ensure_output_last(columns)                       -> columns'
//! realign(new_cols, prev_cols, test_cases, rows)    -> test_cases'
//! run(test_cases, columns, rows)                    -> test_cases'
//! generate(columns, rows, options)                  -> test_cases
//! ```
//!
//! All of them are pure: they read their inputs and return fresh values.

use crate::config::EngineConfig;
use crate::generate::GenerateOptions;
use crate::table::{Column, Row};
use crate::testcase::TestCase;

/// Move the output column to the end using the default output names
pub fn ensure_output_last(columns: &[Column]) -> Vec<Column> {
    Engine::new().ensure_output_last(columns)
}

/// Re-bind test case inputs to a changed column set
pub fn realign(
    new_columns: &[Column],
    prev_columns: &[Column],
    prev_test_cases: &[TestCase],
    current_rows: &[Row],
) -> Vec<TestCase> {
    Engine::new().realign(new_columns, prev_columns, prev_test_cases, current_rows)
}

/// Execute test cases against the rows
pub fn run(test_cases: &[TestCase], columns: &[Column], rows: &[Row]) -> Vec<TestCase> {
    Engine::new().run(test_cases, columns, rows).test_cases
}

/// Synthesize a test suite from the rows
pub fn generate(columns: &[Column], rows: &[Row], options: &GenerateOptions) -> Vec<TestCase> {
    Engine::new().generate(columns, rows, options)
}

/// Decision table engine
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}
