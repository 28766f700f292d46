//! Workspace: the tables of a repository and their change logs
//!
//! A `Workspace` is owned by one editing session. It holds every table
//! model across repositories, the selected repository and the active model
//! within it. The engine functions never see it; callers hand them the
//! active table.

use crate::error::{Error, Result};
use crate::source::TableSnapshot;
use crate::table::DecisionTable;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One entry in a model's change log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeEntry {
    pub title: String,
    pub timestamp: DateTime<Utc>,
    pub snapshot: TableSnapshot,
    /// Content hash of the snapshot
    pub hash: String,
}

impl ChangeEntry {
    pub fn new(title: impl Into<String>, snapshot: TableSnapshot) -> Self {
        let hash = snapshot.hash();
        Self {
            title: title.into(),
            timestamp: Utc::now(),
            snapshot,
            hash,
        }
    }
}

/// A decision table owned by a repository
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableModel {
    pub id: u64,
    pub repo: String,
    pub table: DecisionTable,
    /// Newest first
    #[serde(default)]
    pub change_log: Vec<ChangeEntry>,
}

/// Editing session state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Workspace {
    models: Vec<TableModel>,
    selected_repo: String,
    /// Index into the models of the selected repository
    active: usize,
    next_id: u64,
}

impl Workspace {
    pub fn new(repo: impl Into<String>) -> Self {
        Self {
            selected_repo: repo.into(),
            next_id: 1,
            ..Default::default()
        }
    }

    pub fn selected_repo(&self) -> &str {
        &self.selected_repo
    }

    /// Models of the selected repository, in insertion order
    pub fn models_for_repo(&self) -> Vec<&TableModel> {
        self.models
            .iter()
            .filter(|m| m.repo == self.selected_repo)
            .collect()
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active(&self) -> Option<&TableModel> {
        let id = self.active_id()?;
        self.models.iter().find(|m| m.id == id)
    }

    pub fn active_table(&self) -> Option<&DecisionTable> {
        self.active().map(|m| &m.table)
    }

    fn active_id(&self) -> Option<u64> {
        self.models_for_repo().get(self.active).map(|m| m.id)
    }

    fn model_mut(&mut self, id: u64) -> Result<&mut TableModel> {
        self.models
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(Error::UnknownModel(id))
    }

    /// Switch repository; the active index resets when out of range
    pub fn select_repo(&mut self, repo: impl Into<String>) {
        self.selected_repo = repo.into();
        if self.active >= self.models_for_repo().len() {
            self.active = 0;
        }
        tracing::debug!(repo = %self.selected_repo, "selected repository");
    }

    /// Make the `idx`-th model of the selected repository active
    pub fn set_active(&mut self, idx: usize) -> Result<()> {
        let len = self.models_for_repo().len();
        if idx >= len {
            return Err(Error::out_of_range("model", idx, len));
        }
        self.active = idx;
        Ok(())
    }

    /// Add an existing table to the selected repository and activate it
    pub fn insert(&mut self, table: DecisionTable) -> u64 {
        let id = self.next_id.max(1);
        self.next_id = id + 1;
        self.models.push(TableModel {
            id,
            repo: self.selected_repo.clone(),
            table,
            change_log: Vec::new(),
        });
        let len = self.models_for_repo().len();
        self.active = len - 1;
        id
    }

    /// Add a default table to the selected repository and activate it
    pub fn add_model(&mut self) -> u64 {
        self.insert(DecisionTable::new())
    }

    /// Delete the active model; the last model of a repository is kept
    pub fn destroy_model(&mut self) -> Result<bool> {
        if self.models_for_repo().len() <= 1 {
            return Ok(false);
        }
        let id = self
            .active_id()
            .ok_or_else(|| Error::out_of_range("model", self.active, 0))?;
        self.models.retain(|m| m.id != id);
        self.active = self.active.saturating_sub(1);
        tracing::debug!(id, "destroyed model");
        Ok(true)
    }

    /// Apply an edit to the active table
    pub fn update_active<F, T>(&mut self, edit: F) -> Result<T>
    where
        F: FnOnce(&mut DecisionTable) -> T,
    {
        let id = self
            .active_id()
            .ok_or_else(|| Error::out_of_range("model", self.active, 0))?;
        Ok(edit(&mut self.model_mut(id)?.table))
    }

    /// Prepend an entry to the active model's log, or to every model of
    /// the repository when `broadcast` is set
    pub fn log_change(&mut self, entry: ChangeEntry, broadcast: bool) {
        let active = self.active_id();
        let repo = self.selected_repo.clone();
        for model in self.models.iter_mut().filter(|m| m.repo == repo) {
            if broadcast || Some(model.id) == active {
                model.change_log.insert(0, entry.clone());
            }
        }
    }

    /// Snapshot the active table into its change log
    pub fn save_active(&mut self) -> Result<ChangeEntry> {
        let table = self
            .active_table()
            .ok_or_else(|| Error::out_of_range("model", self.active, 0))?;
        let entry = ChangeEntry::new(format!("[Save] {}", table.title), table.into());
        self.log_change(entry.clone(), false);
        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_models_scoped_to_repo() {
        let mut ws = Workspace::new("claims");
        ws.add_model();
        ws.add_model();
        ws.select_repo("billing");
        assert!(ws.models_for_repo().is_empty());
        assert!(ws.active().is_none());
        ws.add_model();
        assert_eq!(ws.models_for_repo().len(), 1);
        ws.select_repo("claims");
        assert_eq!(ws.models_for_repo().len(), 2);
    }

    #[test]
    fn test_active_resets_when_out_of_range() {
        let mut ws = Workspace::new("a");
        ws.add_model();
        ws.add_model();
        assert_eq!(ws.active_index(), 1);
        ws.select_repo("b");
        assert_eq!(ws.active_index(), 0);
    }

    #[test]
    fn test_destroy_keeps_last_model() {
        let mut ws = Workspace::new("a");
        ws.add_model();
        assert!(!ws.destroy_model().unwrap());
        ws.add_model();
        assert!(ws.destroy_model().unwrap());
        assert_eq!(ws.models_for_repo().len(), 1);
        assert_eq!(ws.active_index(), 0);
    }

    #[test]
    fn test_update_active() {
        let mut ws = Workspace::new("a");
        ws.add_model();
        let idx = ws.update_active(|t| t.add_column()).unwrap();
        assert_eq!(idx, 1);
        assert_eq!(ws.active_table().unwrap().columns().len(), 3);
    }

    #[test]
    fn test_log_change_broadcast() {
        let mut ws = Workspace::new("a");
        ws.add_model();
        ws.add_model();
        ws.save_active().unwrap();
        let counts: Vec<usize> = ws
            .models_for_repo()
            .iter()
            .map(|m| m.change_log.len())
            .collect();
        assert_eq!(counts, vec![0, 1]);

        let entry = ChangeEntry::new("[DMN Save] a updated", TableSnapshot::default());
        ws.log_change(entry, true);
        let counts: Vec<usize> = ws
            .models_for_repo()
            .iter()
            .map(|m| m.change_log.len())
            .collect();
        assert_eq!(counts, vec![1, 2]);
        assert_eq!(
            ws.active().unwrap().change_log[0].title,
            "[DMN Save] a updated"
        );
    }

    #[test]
    fn test_deserialized_workspace_tables_are_normalized() {
        let mut ws: Workspace = serde_json::from_str(
            r#"{
                "models": [{
                    "id": 1,
                    "repo": "a",
                    "table": { "columns": [{ "name": "Result" }, { "name": "A" }], "rows": [["r"]] }
                }],
                "selected_repo": "a",
                "active": 0,
                "next_id": 2
            }"#,
        )
        .unwrap();
        let table = ws.active_table().unwrap();
        assert_eq!(table.rows()[0], vec!["", "r"]);

        ws.update_active(|t| t.update_cell(0, 0, "a"))
            .unwrap()
            .unwrap();
        assert_eq!(ws.active_table().unwrap().rows()[0], vec!["a", "r"]);
    }

    #[test]
    fn test_set_active_bounds() {
        let mut ws = Workspace::new("a");
        ws.add_model();
        assert!(ws.set_active(1).is_err());
        assert!(ws.set_active(0).is_ok());
    }
}
