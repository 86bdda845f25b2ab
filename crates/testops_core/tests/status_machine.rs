use testops_core::JobStatus;

#[test]
fn terminal_states_are_exactly_the_three_absorbing_ones() {
    assert!(!JobStatus::Pending.is_terminal());
    assert!(!JobStatus::Processing.is_terminal());
    assert!(JobStatus::Completed.is_terminal());
    assert!(JobStatus::Failed.is_terminal());
    assert!(JobStatus::Cancelled.is_terminal());
}

#[test]
fn status_moves_forward_only() {
    assert!(JobStatus::Pending.accepts(JobStatus::Processing));
    assert!(JobStatus::Pending.accepts(JobStatus::Completed));
    assert!(JobStatus::Pending.accepts(JobStatus::Cancelled));
    assert!(JobStatus::Processing.accepts(JobStatus::Failed));

    // Regressions are rejected.
    assert!(!JobStatus::Processing.accepts(JobStatus::Pending));
}

#[test]
fn terminal_status_never_changes() {
    assert!(!JobStatus::Completed.accepts(JobStatus::Processing));
    assert!(!JobStatus::Completed.accepts(JobStatus::Failed));
    assert!(!JobStatus::Failed.accepts(JobStatus::Completed));
    assert!(!JobStatus::Cancelled.accepts(JobStatus::Pending));
}

#[test]
fn same_status_is_accepted_as_a_refresh() {
    // Repeated polls commonly report the same status; that is not a
    // regression.
    assert!(JobStatus::Pending.accepts(JobStatus::Pending));
    assert!(JobStatus::Processing.accepts(JobStatus::Processing));
}

#[test]
fn status_serializes_lowercase() {
    let json = serde_json::to_string(&JobStatus::Processing).unwrap();
    assert_eq!(json, "\"processing\"");
    let back: JobStatus = serde_json::from_str("\"cancelled\"").unwrap();
    assert_eq!(back, JobStatus::Cancelled);
}
