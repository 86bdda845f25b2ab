use std::fs;

use pretty_assertions::assert_eq;
use testops_core::{JobKind, JobStatus, JobSummary, JobUpdate};
use testops_engine::JobStore;

fn summary(job_id: &str, kind: JobKind) -> JobSummary {
    JobSummary::submitted(job_id, kind, format!("job {job_id}"))
}

#[test]
fn append_then_reload_preserves_order_and_content() {
    client_logging::initialize_for_tests();
    let dir = tempfile::tempdir().unwrap();

    let mut store = JobStore::open(dir.path(), JobKind::UiTestcases);
    assert!(store.append(summary("j1", JobKind::UiTestcases)).unwrap());
    assert!(store.append(summary("j2", JobKind::UiTestcases)).unwrap());
    let written = store.list().to_vec();

    let reloaded = JobStore::open(dir.path(), JobKind::UiTestcases);
    assert_eq!(reloaded.list(), written.as_slice());

    // Newest first.
    let ids: Vec<_> = reloaded.list().iter().map(|s| s.job_id.as_str()).collect();
    assert_eq!(ids, vec!["j2", "j1"]);
}

#[test]
fn duplicate_append_is_rejected_without_persisting() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = JobStore::open(dir.path(), JobKind::Optimization);
    assert!(store.append(summary("j1", JobKind::Optimization)).unwrap());
    assert!(!store.append(summary("j1", JobKind::Optimization)).unwrap());
    assert_eq!(store.list().len(), 1);
}

#[test]
fn update_on_missing_id_is_a_noop() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = JobStore::open(dir.path(), JobKind::Standards);
    store.append(summary("j1", JobKind::Standards)).unwrap();

    let applied = store
        .update("gone", &JobUpdate::status(JobStatus::Completed))
        .unwrap();
    assert!(!applied);
    assert_eq!(store.get("j1").unwrap().status, JobStatus::Pending);
}

#[test]
fn remove_persists_and_list_never_contains_the_id_again() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = JobStore::open(dir.path(), JobKind::ApiAutotests);
    store.append(summary("j1", JobKind::ApiAutotests)).unwrap();
    store.append(summary("j2", JobKind::ApiAutotests)).unwrap();

    assert!(store.remove("j1").unwrap());
    assert!(store.get("j1").is_none());

    let reloaded = JobStore::open(dir.path(), JobKind::ApiAutotests);
    assert!(reloaded.list().iter().all(|s| s.job_id != "j1"));
}

#[test]
fn corrupt_persisted_content_recovers_as_empty_list() {
    client_logging::initialize_for_tests();
    let dir = tempfile::tempdir().unwrap();
    let path = dir
        .path()
        .join(format!("{}.json", JobKind::Standards.storage_key()));
    fs::write(&path, "{ not valid json").unwrap();

    // Fails soft: no panic, no error, just an empty hydrated list.
    let store = JobStore::open(dir.path(), JobKind::Standards);
    assert!(store.list().is_empty());

    // The store is usable again and the next mutation overwrites the blob.
    let mut store = store;
    store.append(summary("j1", JobKind::Standards)).unwrap();
    let reloaded = JobStore::open(dir.path(), JobKind::Standards);
    assert_eq!(reloaded.list().len(), 1);
}

#[test]
fn kinds_never_cross_contaminate() {
    let dir = tempfile::tempdir().unwrap();
    let mut ui = JobStore::open(dir.path(), JobKind::UiTestcases);
    let mut standards = JobStore::open(dir.path(), JobKind::Standards);

    ui.append(summary("j1", JobKind::UiTestcases)).unwrap();
    standards.append(summary("j1", JobKind::Standards)).unwrap();

    let ui_reloaded = JobStore::open(dir.path(), JobKind::UiTestcases);
    assert_eq!(ui_reloaded.list().len(), 1);
    assert_eq!(ui_reloaded.list()[0].kind, JobKind::UiTestcases);
}

#[test]
fn persisted_file_is_a_full_newest_first_array() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = JobStore::open(dir.path(), JobKind::UiAutotests);
    store.append(summary("j1", JobKind::UiAutotests)).unwrap();
    store.append(summary("j2", JobKind::UiAutotests)).unwrap();
    store
        .update("j1", &JobUpdate::progress(JobStatus::Processing, 40))
        .unwrap();

    let path = dir
        .path()
        .join(format!("{}.json", JobKind::UiAutotests.storage_key()));
    let blob: serde_json::Value = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
    let entries = blob.as_array().expect("array at top level");
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["job_id"], "j2");
    assert_eq!(entries[1]["job_id"], "j1");
    assert_eq!(entries[1]["status"], "processing");
}
