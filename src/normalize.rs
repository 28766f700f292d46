//! Column and row normalization
//!
//! The output column is the first column whose trimmed, lower-cased name is
//! one of the configured output names (`result`, `output`, `decision` by
//! default). Normalization moves it to the end and leaves every other column
//! in place. A table whose last column already carries an output name is
//! left alone, which keeps normalization idempotent when several columns
//! qualify. When nothing matches, the last column stands in as the output
//! and the resolution is flagged as [`OutputSource::Positional`].
//!
//! Rows are repaired to the column count (padding with empty strings or
//! truncating) and boolean cells are upper-cased to `TRUE` / `FALSE`.

use crate::engine::Engine;
use crate::table::{Column, ColumnType, Row};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// How the output column was identified
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum OutputSource {
    /// Name matched one of the output names
    Named,
    /// No name matched; the last column is used
    Positional,
}

/// Resolved output column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct OutputColumn {
    pub index: usize,
    pub source: OutputSource,
}

impl OutputColumn {
    /// True when the output was not identified by name
    pub fn is_fallback(&self) -> bool {
        self.source == OutputSource::Positional
    }

    /// Warning text for a positional fallback
    pub fn warning(&self, columns: &[Column]) -> Option<String> {
        if !self.is_fallback() {
            return None;
        }
        let name = columns.get(self.index).map(|c| c.name.as_str()).unwrap_or("");
        Some(format!(
            "No output column found by name; using last column '{}' as output",
            name
        ))
    }
}

impl Engine {
    /// Whether a column name designates the output column
    pub fn is_output_name(&self, name: &str) -> bool {
        let normalized = name.trim().to_lowercase();
        self.config()
            .output_names
            .iter()
            .any(|n| n.trim().to_lowercase() == normalized)
    }

    /// Index of the designated output column, if any column is named like one
    ///
    /// A trailing output-named column is already in place and wins;
    /// otherwise the first output-named column in declared order.
    pub fn find_output(&self, columns: &[Column]) -> Option<usize> {
        let last = columns.len().checked_sub(1)?;
        if self.is_output_name(&columns[last].name) {
            return Some(last);
        }
        columns.iter().position(|c| self.is_output_name(&c.name))
    }

    /// Resolve the output column, falling back to the last column
    pub fn resolve_output(&self, columns: &[Column]) -> Option<OutputColumn> {
        if let Some(index) = self.find_output(columns) {
            return Some(OutputColumn {
                index,
                source: OutputSource::Named,
            });
        }
        let last = columns.len().checked_sub(1)?;
        tracing::warn!(
            column = %columns[last].name,
            "no output column found by name, falling back to last column"
        );
        Some(OutputColumn {
            index: last,
            source: OutputSource::Positional,
        })
    }

    /// Positional order that moves the output column last
    ///
    /// `order[i]` is the index in `columns` of the column that belongs at
    /// position `i`. Apply the same order to rows to keep cells aligned.
    pub fn output_last_order(&self, columns: &[Column]) -> Vec<usize> {
        let mut order: Vec<usize> = (0..columns.len()).collect();
        if let Some(idx) = self.find_output(columns) {
            let out = order.remove(idx);
            order.push(out);
        }
        order
    }

    /// Move the output column to the end, keeping the rest in order
    pub fn ensure_output_last(&self, columns: &[Column]) -> Vec<Column> {
        self.output_last_order(columns)
            .into_iter()
            .map(|i| columns[i].clone())
            .collect()
    }

    /// Split normalized columns into (input indices, output index)
    pub(crate) fn split_columns(&self, columns: &[Column]) -> (Vec<usize>, Option<OutputColumn>) {
        let output = self.resolve_output(columns);
        let inputs = (0..columns.len())
            .filter(|i| output.map(|o| o.index) != Some(*i))
            .collect();
        (inputs, output)
    }
}

/// Apply a positional order (from [`Engine::output_last_order`]) to a row
pub fn reorder_row(row: &[String], order: &[usize]) -> Row {
    order
        .iter()
        .map(|&i| row.get(i).cloned().unwrap_or_default())
        .collect()
}

/// Pad or truncate a row to `len` cells
pub fn repair_row(row: &mut Row, len: usize) {
    row.resize(len, String::new());
}

/// Canonical form of a cell for its column type
pub fn canonical_cell(typ: &ColumnType, value: &str) -> String {
    match typ {
        ColumnType::Boolean => value.to_uppercase(),
        _ => value.to_string(),
    }
}

/// Repair row lengths and canonicalize boolean cells
pub fn normalize_rows(columns: &[Column], rows: &[Row]) -> Vec<Row> {
    rows.iter()
        .map(|row| {
            let mut row = row.clone();
            if row.len() != columns.len() {
                tracing::debug!(
                    expected = columns.len(),
                    actual = row.len(),
                    "repairing row length"
                );
                repair_row(&mut row, columns.len());
            }
            for (cell, col) in row.iter_mut().zip(columns) {
                if col.typ == ColumnType::Boolean {
                    *cell = canonical_cell(&col.typ, cell);
                }
            }
            row
        })
        .collect()
}
