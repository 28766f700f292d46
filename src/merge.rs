//! Merging suggested content into a table
//!
//! Suggestions (from an assistant, an import, another model) arrive as
//! test cases written against some column names, or as columns and rows.
//! Both are folded in by column name.

use crate::table::{Column, DecisionTable, Row};
use crate::testcase::TestCase;

/// Remap inputs written against `from` names onto the `to` names
fn remap_inputs(inputs: &[String], from: &[String], to: &[String]) -> Vec<String> {
    to.iter()
        .map(|name| {
            from.iter()
                .position(|n| n == name)
                .and_then(|i| inputs.get(i).cloned())
                .unwrap_or_default()
        })
        .collect()
}

impl DecisionTable {
    /// Append suggested test cases, dropping duplicates
    ///
    /// Each case is remapped from its own `column_names`, else from
    /// `column_names`, else assumed to be in the current input order.
    /// Two cases are duplicates when inputs and expected both match; the
    /// first occurrence is kept. Returns the number of cases added.
    pub fn merge_test_cases(
        &mut self,
        incoming: Vec<TestCase>,
        column_names: Option<&[String]>,
    ) -> usize {
        let current: Vec<String> = self
            .input_columns()
            .iter()
            .map(|c| c.name.clone())
            .collect();

        let before = self.test_cases().len();
        let cases = self.test_cases_mut();
        for mut tc in incoming {
            let names = tc
                .column_names
                .take()
                .or_else(|| column_names.map(<[String]>::to_vec))
                .unwrap_or_else(|| current.clone());
            tc.inputs = remap_inputs(&tc.inputs, &names, &current);

            let duplicate = cases
                .iter()
                .any(|c| c.inputs == tc.inputs && c.expected == tc.expected);
            if !duplicate {
                cases.push(tc);
            }
        }

        let added = self.test_cases().len() - before;
        tracing::debug!(added, "merged suggested test cases");
        added
    }

    /// Merge suggested columns and rows
    ///
    /// Columns not already present (by name) are inserted before the output
    /// column, which stays last. Suggested rows are remapped onto the merged
    /// columns by name; without rows, existing rows are kept and padded.
    pub fn merge_columns(&mut self, columns: &[Column], rows: Option<&[Row]>) {
        let existing = self.columns().to_vec();
        let fresh: Vec<Column> = columns
            .iter()
            .filter(|c| !existing.iter().any(|e| e.name == c.name))
            .cloned()
            .collect();

        let at = self
            .engine()
            .find_output(&existing)
            .unwrap_or(existing.len());
        let mut merged = existing[..at].to_vec();
        merged.extend(fresh.iter().cloned());
        merged.extend_from_slice(&existing[at..]);

        let new_rows: Vec<Row> = match rows {
            Some(rows) => rows
                .iter()
                .map(|row| {
                    merged
                        .iter()
                        .map(|col| {
                            columns
                                .iter()
                                .position(|c| c.name == col.name)
                                .and_then(|i| row.get(i).cloned())
                                .unwrap_or_default()
                        })
                        .collect()
                })
                .collect(),
            None => self
                .rows()
                .iter()
                .map(|row| {
                    let mut row = row.clone();
                    for _ in &fresh {
                        row.insert(at.min(row.len()), String::new());
                    }
                    row
                })
                .collect(),
        };

        tracing::debug!(added = fresh.len(), "merged suggested columns");
        let prev: Vec<String> = self
            .input_columns()
            .iter()
            .map(|c| c.name.clone())
            .collect();
        self.replace(merged, new_rows);
        self.realign_from(&prev);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn table() -> DecisionTable {
        DecisionTable::from_parts(
            "t",
            vec![
                Column::string("A"),
                Column::string("B"),
                Column::string("Result"),
            ],
            vec![strings(&["a", "b", "r"])],
            vec![TestCase::new(strings(&["a", "b"]), "r")],
        )
    }

    #[test]
    fn test_merge_remaps_and_dedups() {
        let mut t = table();
        let mut named = TestCase::new(strings(&["b", "a"]), "r");
        named.column_names = Some(strings(&["B", "A"]));
        let plain = TestCase::new(strings(&["x", "y"]), "r2");

        let added = t.merge_test_cases(vec![named, plain.clone(), plain], None);
        assert_eq!(added, 1);
        assert_eq!(t.test_cases().len(), 2);
        assert_eq!(t.test_cases()[1].inputs, strings(&["x", "y"]));
    }

    #[test]
    fn test_merge_with_shared_names() {
        let mut t = table();
        let names = strings(&["B", "Gone"]);
        t.merge_test_cases(vec![TestCase::new(strings(&["b2", "z"]), "")], Some(&names));
        assert_eq!(t.test_cases()[1].inputs, strings(&["", "b2"]));
    }

    #[test]
    fn test_merge_columns_with_rows() {
        let mut t = table();
        let suggested = vec![
            Column::string("C"),
            Column::string("A"),
            Column::string("Result"),
        ];
        let rows = vec![strings(&["c1", "a1", "r1"])];
        t.merge_columns(&suggested, Some(&rows));

        let names: Vec<&str> = t.columns().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C", "Result"]);
        assert_eq!(t.rows(), &[strings(&["a1", "", "c1", "r1"])]);
        assert_eq!(t.test_cases()[0].inputs.len(), 3);
    }

    #[test]
    fn test_merge_columns_pads_existing_rows() {
        let mut t = table();
        t.merge_columns(&[Column::string("C")], None);
        assert_eq!(t.rows(), &[strings(&["a", "b", "", "r"])]);
        assert_eq!(t.test_cases()[0].inputs, strings(&["a", "b", ""]));
    }
}
