//! Decision table model
//!
//! A `DecisionTable` owns ordered columns, rule rows and the test suite.
//! Every column mutation goes through one path that:
//!
//! - moves the output column last (cells move with it),
//! - repairs row lengths and canonicalizes boolean cells,
//! - realigns test case inputs to the new input columns,
//! - marks the suite as not run.
//!
//! ## Example
//!
//! ```json
//! {
//!   "title": "Authorization Check",
//!   "columns": [
//!     { "name": "Authorization Indicator", "type": "String", "condition": "Equals" },
//!     { "name": "UM Core Edit", "type": "Boolean", "condition": "Equals" },
//!     { "name": "Result", "type": "String", "condition": "Equals" }
//!   ],
//!   "rows": [["Y", "TRUE", "Proceed to Claim Level Bypass Check"]],
//!   "testCases": [{ "inputs": ["Y", "TRUE"], "expected": "Proceed to Claim Level Bypass Check" }]
//! }
//! ```

use crate::engine::Engine;
use crate::error::{Error, Result};
use crate::generate::GenerateOptions;
use crate::normalize::{canonical_cell, normalize_rows, repair_row, reorder_row, OutputColumn};
use crate::run::SuiteSummary;
use crate::testcase::TestCase;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A rule row: one cell per column
pub type Row = Vec<String>;

/// Column data types
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum ColumnType {
    #[default]
    #[serde(alias = "string")]
    String,
    #[serde(alias = "number")]
    Number,
    #[serde(alias = "boolean")]
    Boolean,
    #[serde(alias = "date")]
    Date,
}

/// Condition applied by a column
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum ConditionKind {
    #[default]
    Equals,
    #[serde(rename = "Greater Than", alias = "GreaterThan")]
    GreaterThan,
    #[serde(rename = "Less Than", alias = "LessThan")]
    LessThan,
    Contains,
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColumnType::String => write!(f, "String"),
            ColumnType::Number => write!(f, "Number"),
            ColumnType::Boolean => write!(f, "Boolean"),
            ColumnType::Date => write!(f, "Date"),
        }
    }
}

impl std::fmt::Display for ConditionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConditionKind::Equals => write!(f, "Equals"),
            ConditionKind::GreaterThan => write!(f, "Greater Than"),
            ConditionKind::LessThan => write!(f, "Less Than"),
            ConditionKind::Contains => write!(f, "Contains"),
        }
    }
}

/// A column definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Column {
    pub name: String,

    #[serde(rename = "type", default)]
    pub typ: ColumnType,

    #[serde(default)]
    pub condition: ConditionKind,
}

impl Column {
    pub fn new(name: impl Into<String>, typ: ColumnType) -> Self {
        Self {
            name: name.into(),
            typ,
            condition: ConditionKind::Equals,
        }
    }

    /// String column with an `Equals` condition
    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, ColumnType::String)
    }

    pub fn with_condition(mut self, condition: ConditionKind) -> Self {
        self.condition = condition;
        self
    }
}

/// A single-field column edit
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnUpdate {
    Name(String),
    Type(ColumnType),
    Condition(ConditionKind),
}

/// A decision table with its test suite
///
/// Deserializing goes through [`RawDecisionTable`], so a loaded table is
/// always normalized.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", from = "RawDecisionTable")]
#[schemars(title = "Decision table", description = "Columns, rule rows and test cases")]
pub struct DecisionTable {
    #[serde(default = "default_title")]
    pub title: String,

    #[serde(default = "default_columns")]
    columns: Vec<Column>,

    #[serde(default)]
    rows: Vec<Row>,

    #[serde(default)]
    test_cases: Vec<TestCase>,

    /// Whether results reflect the current table
    #[serde(skip)]
    suite_run: bool,

    #[serde(skip)]
    engine: Engine,
}

/// Table as written on disk, before normalization
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
#[schemars(title = "Decision table", description = "Columns, rule rows and test cases")]
struct RawDecisionTable {
    #[serde(default = "default_title")]
    title: String,

    #[serde(default = "default_columns")]
    columns: Vec<Column>,

    #[serde(default)]
    rows: Vec<Row>,

    #[serde(default)]
    test_cases: Vec<TestCase>,
}

impl From<RawDecisionTable> for DecisionTable {
    fn from(raw: RawDecisionTable) -> Self {
        DecisionTable::from_raw(raw, Engine::default())
    }
}

fn default_title() -> String {
    "New Decision Table".to_string()
}

fn default_columns() -> Vec<Column> {
    vec![Column::string("Condition 1"), Column::string("Result")]
}

impl Default for DecisionTable {
    fn default() -> Self {
        Self {
            title: default_title(),
            columns: default_columns(),
            rows: vec![vec![String::new(), String::new()]],
            test_cases: Vec::new(),
            suite_run: false,
            engine: Engine::default(),
        }
    }
}

impl DecisionTable {
    /// Default 2-column, 1-row table
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from raw parts, normalizing columns and rows
    ///
    /// `rows` are laid out in the order of `columns` as given.
    pub fn from_parts(
        title: impl Into<String>,
        columns: Vec<Column>,
        rows: Vec<Row>,
        test_cases: Vec<TestCase>,
    ) -> Self {
        Self::from_raw(
            RawDecisionTable {
                title: title.into(),
                columns,
                rows,
                test_cases,
            },
            Engine::default(),
        )
    }

    /// Normalize raw data once, with the engine that will own the table
    fn from_raw(raw: RawDecisionTable, engine: Engine) -> Self {
        let mut table = Self {
            title: raw.title,
            columns: raw.columns,
            rows: raw.rows,
            test_cases: raw.test_cases,
            suite_run: false,
            engine,
        };
        table.normalize();
        table
    }

    /// Parse a table from JSON and normalize it
    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_json_with(json, Engine::default())
    }

    /// Parse a table from JSON and normalize it with a configured engine
    ///
    /// Test cases in the file are bound to the input order this engine
    /// produces.
    pub fn from_json_with(json: &str, engine: Engine) -> Result<Self> {
        let raw: RawDecisionTable =
            serde_json::from_str(json).map_err(|e| Error::TableParse(e.to_string()))?;
        Ok(Self::from_raw(raw, engine))
    }

    /// Parse a table from YAML and normalize it
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Self::from_yaml_with(yaml, Engine::default())
    }

    pub fn from_yaml_with(yaml: &str, engine: Engine) -> Result<Self> {
        let raw: RawDecisionTable =
            serde_norway::from_str(yaml).map_err(|e| Error::TableParse(e.to_string()))?;
        Ok(Self::from_raw(raw, engine))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_norway::to_string(self)?)
    }

    /// Use a configured engine for subsequent operations
    ///
    /// Output detection may change with the engine; test cases follow
    /// their columns by name.
    pub fn with_engine(mut self, engine: Engine) -> Self {
        let prev = self.input_names();
        self.engine = engine;
        self.normalize();
        if self.input_names() != prev {
            self.realign_from(&prev);
        }
        self
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Re-establish the shape invariants after loading raw data
    ///
    /// Test cases are kept as loaded; they are assumed to be bound to the
    /// normalized input order already.
    pub fn normalize(&mut self) {
        let order = self.engine.output_last_order(&self.columns);
        self.columns = order.iter().map(|&i| self.columns[i].clone()).collect();
        let rows: Vec<Row> = self
            .rows
            .iter()
            .map(|row| reorder_row(row, &order))
            .collect();
        self.rows = normalize_rows(&self.columns, &rows);
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn test_cases(&self) -> &[TestCase] {
        &self.test_cases
    }

    /// Whether the last suite run still reflects the table
    pub fn is_suite_run(&self) -> bool {
        self.suite_run
    }

    pub fn output(&self) -> Option<OutputColumn> {
        self.engine.resolve_output(&self.columns)
    }

    pub fn output_column(&self) -> Option<&Column> {
        self.output().map(|o| &self.columns[o.index])
    }

    pub fn input_columns(&self) -> &[Column] {
        &self.columns[..self.columns.len().saturating_sub(1)]
    }

    /// Persistent warnings about the table shape
    pub fn warnings(&self) -> Vec<String> {
        self.output()
            .and_then(|o| o.warning(&self.columns))
            .into_iter()
            .collect()
    }

    /// Non-fatal diagnostics for the operator
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.columns.is_empty() {
            issues.push("Table has no columns".to_string());
        }

        let mut seen = HashSet::new();
        for (idx, col) in self.columns.iter().enumerate() {
            if col.name.trim().is_empty() {
                issues.push(format!("Column {} has an empty name", idx + 1));
            } else if !seen.insert(col.name.as_str()) {
                issues.push(format!("Duplicate column name: {}", col.name));
            }
        }

        let candidates: Vec<&str> = self
            .columns
            .iter()
            .filter(|c| self.engine.is_output_name(&c.name))
            .map(|c| c.name.as_str())
            .collect();
        if candidates.len() > 1 {
            let used = self.output_column().map(|c| c.name.as_str()).unwrap_or("");
            issues.push(format!(
                "Multiple output columns ({}); using '{}'",
                candidates.join(", "),
                used
            ));
        }

        issues.extend(self.warnings());

        let inputs = self.input_columns().len();
        for (idx, tc) in self.test_cases.iter().enumerate() {
            if tc.inputs.len() != inputs {
                issues.push(format!(
                    "Test case {} has {} inputs, expected {}",
                    idx + 1,
                    tc.inputs.len(),
                    inputs
                ));
            }
        }

        issues
    }

    // ------------------------------------------------------------------
    // Column mutations
    // ------------------------------------------------------------------

    /// Replace the column set wholesale
    ///
    /// Cells follow their column by name; columns without a previous
    /// counterpart start empty. Use [`rename_column`](Self::rename_column)
    /// to rename without losing cells.
    pub fn set_columns(&mut self, columns: Vec<Column>) {
        let rows = self
            .rows
            .iter()
            .map(|row| {
                columns
                    .iter()
                    .map(|col| {
                        self.columns
                            .iter()
                            .position(|c| c.name == col.name)
                            .and_then(|i| row.get(i).cloned())
                            .unwrap_or_default()
                    })
                    .collect()
            })
            .collect();
        let prev = self.input_names();
        self.apply_columns(columns, rows, &prev);
    }

    /// Insert `Condition N` before the output column and return its index
    pub fn add_column(&mut self) -> usize {
        let column = Column::string(self.fresh_column_name());
        self.insert_column(column)
    }

    /// Insert a column before the output column and return its final index
    pub fn insert_column(&mut self, column: Column) -> usize {
        let at = self
            .engine
            .find_output(&self.columns)
            .unwrap_or(self.columns.len());
        let mut columns = self.columns.clone();
        columns.insert(at, column);

        let rows = self
            .rows
            .iter()
            .map(|row| {
                let mut row = row.clone();
                row.insert(at.min(row.len()), String::new());
                row
            })
            .collect();

        let prev = self.input_names();
        let order = self.apply_columns(columns, rows, &prev);
        order.iter().position(|&i| i == at).unwrap_or(at)
    }

    pub fn remove_column(&mut self, idx: usize) -> Result<Column> {
        if idx >= self.columns.len() {
            return Err(Error::out_of_range("column", idx, self.columns.len()));
        }
        let mut columns = self.columns.clone();
        let removed = columns.remove(idx);
        let rows = self
            .rows
            .iter()
            .map(|row| {
                let mut row = row.clone();
                if idx < row.len() {
                    row.remove(idx);
                }
                row
            })
            .collect();

        let prev = self.input_names();
        self.apply_columns(columns, rows, &prev);
        Ok(removed)
    }

    pub fn update_column(&mut self, idx: usize, update: ColumnUpdate) -> Result<()> {
        if idx >= self.columns.len() {
            return Err(Error::out_of_range("column", idx, self.columns.len()));
        }
        let mut columns = self.columns.clone();
        let mut prev = self.input_names();
        match update {
            ColumnUpdate::Name(name) => {
                // Test values follow the column under its new name
                if let Some(prev_name) = prev.get_mut(idx) {
                    *prev_name = name.clone();
                }
                columns[idx].name = name;
            }
            ColumnUpdate::Type(typ) => columns[idx].typ = typ,
            ColumnUpdate::Condition(condition) => columns[idx].condition = condition,
        }
        let rows = self.rows.clone();
        self.apply_columns(columns, rows, &prev);
        Ok(())
    }

    pub fn rename_column(&mut self, idx: usize, name: impl Into<String>) -> Result<()> {
        self.update_column(idx, ColumnUpdate::Name(name.into()))
    }

    fn input_names(&self) -> Vec<String> {
        self.input_columns().iter().map(|c| c.name.clone()).collect()
    }

    /// Commit a positional column edit: normalize, repair, realign
    ///
    /// `prev_inputs` are the input names the test cases are bound to.
    /// Returns the order applied by normalization.
    fn apply_columns(
        &mut self,
        columns: Vec<Column>,
        rows: Vec<Row>,
        prev_inputs: &[String],
    ) -> Vec<usize> {
        let order = self.engine.output_last_order(&columns);
        self.columns = order.iter().map(|&i| columns[i].clone()).collect();
        let rows: Vec<Row> = rows.iter().map(|row| reorder_row(row, &order)).collect();
        self.rows = normalize_rows(&self.columns, &rows);
        self.realign_from(prev_inputs);
        order
    }

    /// Realign test cases bound to `prev_inputs` onto the current inputs
    pub(crate) fn realign_from(&mut self, prev_inputs: &[String]) {
        let prev: Vec<&str> = prev_inputs.iter().map(String::as_str).collect();
        let new: Vec<&str> = self.input_columns().iter().map(|c| c.name.as_str()).collect();
        self.test_cases = self
            .engine
            .realign_inputs(&new, &prev, &self.test_cases, &self.rows);
        self.suite_run = false;
    }

    fn fresh_column_name(&self) -> String {
        let mut n = self.columns.len() + 1;
        loop {
            let name = format!("Condition {}", n);
            if !self.columns.iter().any(|c| c.name == name) {
                return name;
            }
            n += 1;
        }
    }

    // ------------------------------------------------------------------
    // Row mutations
    // ------------------------------------------------------------------

    /// Append a blank row and return its index
    pub fn add_row(&mut self) -> usize {
        self.rows.push(vec![String::new(); self.columns.len()]);
        self.suite_run = false;
        self.rows.len() - 1
    }

    pub fn remove_row(&mut self, idx: usize) -> Result<Row> {
        if idx >= self.rows.len() {
            return Err(Error::out_of_range("row", idx, self.rows.len()));
        }
        self.suite_run = false;
        Ok(self.rows.remove(idx))
    }

    pub fn update_cell(&mut self, row: usize, col: usize, value: impl Into<String>) -> Result<()> {
        let typ = self
            .columns
            .get(col)
            .map(|c| c.typ)
            .ok_or_else(|| Error::out_of_range("column", col, self.columns.len()))?;
        let (len, width) = (self.rows.len(), self.columns.len());
        let cells = self
            .rows
            .get_mut(row)
            .ok_or_else(|| Error::out_of_range("row", row, len))?;
        if cells.len() != width {
            repair_row(cells, width);
        }
        cells[col] = canonical_cell(&typ, &value.into());
        self.suite_run = false;
        Ok(())
    }

    /// Move a row to a new position, shifting the rows in between
    pub fn move_row(&mut self, from: usize, to: usize) -> Result<()> {
        let len = self.rows.len();
        if from >= len {
            return Err(Error::out_of_range("row", from, len));
        }
        if to >= len {
            return Err(Error::out_of_range("row", to, len));
        }
        if from != to {
            let row = self.rows.remove(from);
            self.rows.insert(to, row);
            self.suite_run = false;
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Test suite
    // ------------------------------------------------------------------

    /// Append a blank test case and return its index
    pub fn add_test_case(&mut self) -> usize {
        self.test_cases
            .push(TestCase::blank(self.input_columns().len()));
        self.suite_run = false;
        self.test_cases.len() - 1
    }

    /// Replace the suite, realigning nothing
    pub fn set_test_cases(&mut self, test_cases: Vec<TestCase>) {
        self.test_cases = test_cases;
        self.suite_run = false;
    }

    pub fn update_test_input(
        &mut self,
        idx: usize,
        input_idx: usize,
        value: impl Into<String>,
    ) -> Result<()> {
        let inputs = self.input_columns().len();
        if input_idx >= inputs {
            return Err(Error::out_of_range("input", input_idx, inputs));
        }
        let tc = self.test_case_mut(idx)?;
        if tc.inputs.len() < inputs {
            tc.inputs.resize(inputs, String::new());
        }
        tc.inputs[input_idx] = value.into();
        Ok(())
    }

    pub fn update_test_expected(&mut self, idx: usize, value: impl Into<String>) -> Result<()> {
        self.test_case_mut(idx)?.expected = value.into();
        Ok(())
    }

    pub fn remove_test_case(&mut self, idx: usize) -> Result<TestCase> {
        if idx >= self.test_cases.len() {
            return Err(Error::out_of_range("test case", idx, self.test_cases.len()));
        }
        self.suite_run = false;
        Ok(self.test_cases.remove(idx))
    }

    fn test_case_mut(&mut self, idx: usize) -> Result<&mut TestCase> {
        let len = self.test_cases.len();
        self.suite_run = false;
        self.test_cases
            .get_mut(idx)
            .ok_or_else(|| Error::out_of_range("test case", idx, len))
    }

    /// Run every test case against the rows
    pub fn run_suite(&mut self) -> SuiteSummary {
        let report = self.engine.run(&self.test_cases, &self.columns, &self.rows);
        self.test_cases = report.test_cases;
        self.suite_run = true;
        report.summary
    }

    /// Replace the suite with generated cases
    pub fn generate_suite(&mut self, options: Option<&GenerateOptions>) -> usize {
        let options = options.unwrap_or(&self.engine.config().generate);
        let generated = self.engine.generate(&self.columns, &self.rows, options);
        if !generated.is_empty() {
            self.test_cases = generated;
            self.suite_run = false;
        }
        self.test_cases.len()
    }

    /// Pass/fail counts of the current results
    pub fn summary(&self) -> SuiteSummary {
        SuiteSummary::of(&self.test_cases)
    }

    pub(crate) fn replace(&mut self, columns: Vec<Column>, rows: Vec<Row>) {
        self.columns = columns;
        self.rows = rows;
        self.normalize();
        self.suite_run = false;
    }

    pub(crate) fn test_cases_mut(&mut self) -> &mut Vec<TestCase> {
        self.suite_run = false;
        &mut self.test_cases
    }
}
