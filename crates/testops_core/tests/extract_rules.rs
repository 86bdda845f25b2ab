use serde_json::json;
use testops_core::{extract_metadata, JobKind};

#[test]
fn explicit_count_field_wins() {
    let payload = json!({
        "total_violations": 12,
        "violations": [{"rule": "a"}, {"rule": "b"}],
    });
    let metadata = extract_metadata(JobKind::Standards, &payload);
    assert_eq!(metadata.violations, Some(12));
    assert!(metadata.artifacts.is_none());
    assert!(metadata.recommendations.is_none());
}

#[test]
fn nested_result_array_beats_top_level_array() {
    let payload = json!({
        "result": { "violations": [1, 2, 3] },
        "violations": [1],
    });
    let metadata = extract_metadata(JobKind::Standards, &payload);
    assert_eq!(metadata.violations, Some(3));
}

#[test]
fn top_level_array_is_the_last_resort_before_zero() {
    let payload = json!({ "violations": [1, 2] });
    let metadata = extract_metadata(JobKind::Standards, &payload);
    assert_eq!(metadata.violations, Some(2));

    let metadata = extract_metadata(JobKind::Standards, &json!({}));
    assert_eq!(metadata.violations, Some(0));
}

#[test]
fn testcase_kinds_count_generated_artifacts() {
    let payload = json!({ "testcases": [{"id": "t1"}, {"id": "t2"}, {"id": "t3"}] });
    for kind in [
        JobKind::UiTestcases,
        JobKind::ApiTestcases,
        JobKind::UiAutotests,
        JobKind::ApiAutotests,
    ] {
        let metadata = extract_metadata(kind, &payload);
        assert_eq!(metadata.artifacts, Some(3), "kind {kind}");
        assert!(metadata.violations.is_none());
    }
}

#[test]
fn optimization_counts_recommendations() {
    let payload = json!({
        "result": { "recommendations": [{"title": "r1"}] },
    });
    let metadata = extract_metadata(JobKind::Optimization, &payload);
    assert_eq!(metadata.recommendations, Some(1));
}

#[test]
fn non_array_and_non_numeric_shapes_fall_through() {
    // A count field of the wrong type and a non-array payload both fall
    // through to the next probe.
    let payload = json!({
        "total_violations": "many",
        "result": { "violations": "broken" },
        "violations": {"not": "an array"},
    });
    let metadata = extract_metadata(JobKind::Standards, &payload);
    assert_eq!(metadata.violations, Some(0));
}
