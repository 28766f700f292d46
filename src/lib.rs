// Production-quality lints
#![warn(
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro,
    clippy::print_stdout,
    clippy::print_stderr
)]
// Deny truly dangerous patterns
#![deny(clippy::mem_forget)]
// Allow common patterns in library code
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! # dtable - Decision table engine
//!
//! Models business decision tables (condition columns, one output column,
//! rule rows) together with their test suites, independent of any front end.
//!
//! ## Core Concept
//!
//! A table is a list of columns and rows. Exactly one column is the
//! **output**, always kept last; every other column is an **input**. Test
//! cases hold one value per input column and an expected output.
//!
//! - **Normalize** columns so the output is last and rows fit the columns
//! - **Realign** test cases by column name when columns change
//! - **Run** test cases against the rows (first matching row wins)
//! - **Generate** positive and negative test cases from the rows
//!
//! ## Quick Start
//!
//! ```rust
//! use dtable::{Column, ColumnType, DecisionTable, TestCase, TestStatus};
//!
//! let mut table = DecisionTable::from_parts(
//!     "Authorization",
//!     vec![
//!         Column::string("A"),
//!         Column::new("B", ColumnType::Boolean),
//!         Column::string("Result"),
//!     ],
//!     vec![
//!         vec!["x".into(), "true".into(), "R1".into()],
//!         vec!["-".into(), "-".into(), "R2".into()],
//!     ],
//!     vec![TestCase::new(vec!["x".into(), "TRUE".into()], "R1")],
//! );
//!
//! let summary = table.run_suite();
//! assert_eq!(summary.passed, 1);
//! assert_eq!(table.test_cases()[0].status, Some(TestStatus::Pass));
//! assert_eq!(table.test_cases()[0].matched_row, Some(0));
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                                                             │
//! │  Workspace (repo → tables, change log)                      │
//! │       │                                                     │
//! │       └──► DecisionTable (columns, rows, test cases)        │
//! │                 │                                           │
//! │                 ├──► ensure_output_last(columns)            │
//! │                 ├──► realign(new, prev, cases, rows)        │
//! │                 ├──► run(cases, columns, rows)              │
//! │                 └──► generate(columns, rows, options)       │
//! │                                                             │
//! │  TableSource ──► DecisionTable ──► TableSnapshot ──► Sink   │
//! │                                                             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The engine never fails: a missing output column degrades to the last
//! column with a warning, malformed rows are repaired, and an unmatched test
//! case reports `"No match found"`.

// Core model
pub mod config;
pub mod engine;
pub mod error;
pub mod normalize;
pub mod table;
pub mod testcase;

// Operations
pub mod generate;
pub mod merge;
pub mod run;

// Session and boundary
pub mod session;
pub mod source;

// Re-exports
pub use config::{EngineConfig, CONFIG_FILE, NEGATIVE_SENTINEL, NO_MATCH};
pub use engine::{ensure_output_last, generate, realign, run, Engine};
pub use error::{Error, Result};
pub use generate::GenerateOptions;
pub use normalize::{canonical_cell, normalize_rows, OutputColumn, OutputSource};
pub use run::{SuiteReport, SuiteSummary};
pub use session::{ChangeEntry, TableModel, Workspace};
pub use source::{
    DirectoryStore, ParsedDecision, ParsedRule, TableSink, TableSnapshot, TableSource,
};
pub use table::{Column, ColumnType, ColumnUpdate, ConditionKind, DecisionTable, Row};
pub use testcase::{AutofillPolicy, TestCase, TestStatus};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
