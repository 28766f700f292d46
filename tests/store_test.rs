//! Loading, editing and storing tables through the directory store

use dtable::{
    DecisionTable, DirectoryStore, ParsedDecision, ParsedRule, TableSink, TableSnapshot,
    TableSource, TestStatus, Workspace,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::fs;

const CLAIMS: &str = include_str!("fixtures/claims.json");

fn store_with_claims() -> (tempfile::TempDir, DirectoryStore) {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("claims.json"), CLAIMS).unwrap();
    let store = DirectoryStore::new(dir.path());
    (dir, store)
}

#[test]
fn test_load_normalizes_fixture() {
    let (_dir, store) = store_with_claims();
    let table = store.load("claims").unwrap();

    assert_eq!(table.title, "claims");
    let names: Vec<&str> = table.columns().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Claim Type", "Preapproved", "Decision"]);
    assert_eq!(table.rows()[0], vec!["Medical", "TRUE", "Approve"]);
    assert_eq!(table.rows()[2], vec!["Dental", "", "Reject"]);
}

#[test]
fn test_run_and_store_round_trip() {
    let (dir, store) = store_with_claims();
    let mut table = store.load("claims").unwrap();

    let summary = table.run_suite();
    assert_eq!(summary.to_string(), "2 passed, 0 failed, 3 total");
    assert_eq!(summary.unasserted(), 1);
    assert_eq!(table.test_cases()[2].status, None);

    let snapshot = TableSnapshot::from(&table);
    store.save("claims-run", &snapshot).unwrap();
    assert!(dir.path().join("claims-run.json").exists());

    let reloaded = store.load("claims-run").unwrap();
    assert_eq!(TableSnapshot::from(&reloaded), snapshot);
    assert_eq!(reloaded.test_cases()[0].status, Some(TestStatus::Pass));
}

#[test]
fn test_missing_table_is_io_error() {
    let (_dir, store) = store_with_claims();
    let err = store.load("nope").unwrap_err();
    assert!(err.to_string().starts_with("IO error"));
}

#[test]
fn test_workspace_save_logs_snapshot() {
    let (_dir, store) = store_with_claims();
    let mut ws = Workspace::new("claims-repo");
    ws.insert(store.load("claims").unwrap());
    ws.add_model();
    ws.set_active(0).unwrap();

    ws.update_active(|t| t.run_suite()).unwrap();
    let entry = ws.save_active().unwrap();
    assert_eq!(entry.title, "[Save] claims");
    assert_eq!(entry.hash, entry.snapshot.hash());

    let active = ws.active().unwrap();
    assert_eq!(active.change_log.len(), 1);
    assert_eq!(entry.snapshot.clone().into_table("copy").summary().passed, 2);
}

#[test]
fn test_parsed_decision_to_store() {
    let parsed: ParsedDecision = serde_json::from_value(json!({
        "inputs": ["Age", "Member"],
        "outputs": ["Result"],
        "rules": [
            { "inputs": [18, "Y"], "outputs": ["Discount"] },
            { "inputs": [null, "N"], "outputs": ["Full price"] }
        ]
    }))
    .unwrap();
    assert_eq!(
        parsed.rules[0],
        ParsedRule {
            inputs: vec![json!(18), json!("Y")],
            outputs: vec![json!("Discount")],
        }
    );

    let mut table = DecisionTable::from_parsed("Pricing", &parsed);
    assert_eq!(table.generate_suite(None), 4);
    let summary = table.run_suite();
    assert_eq!(summary.failed, 0);

    let dir = tempfile::tempdir().unwrap();
    let store = DirectoryStore::new(dir.path().join("nested"));
    store.save("pricing", &TableSnapshot::from(&table)).unwrap();
    let loaded = store.load("pricing").unwrap();
    assert_eq!(loaded.rows()[0], vec!["18", "Y", "Discount"]);
    assert_eq!(loaded.test_cases().len(), 4);
}

#[test]
fn test_snapshot_yaml() {
    let table = DecisionTable::from_json(CLAIMS).unwrap();
    let snapshot = TableSnapshot::from(&table);
    let yaml = snapshot.to_yaml().unwrap();
    assert_eq!(TableSnapshot::from_yaml(&yaml).unwrap(), snapshot);
}
