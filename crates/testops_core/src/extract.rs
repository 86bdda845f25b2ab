use serde_json::Value;

use crate::{JobKind, JobStatus, JobUpdate};

/// Kind-specific counters pulled from a terminal result payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResultMetadata {
    pub artifacts: Option<u32>,
    pub violations: Option<u32>,
    pub recommendations: Option<u32>,
}

/// One row of the extraction rule table: where to look for a counter.
///
/// Probed in fixed precedence: the explicit count field, then the named
/// array nested under `result`, then the top-level array of the same name,
/// then zero. The backend's response shapes have drifted over time; this
/// table is the compatibility shim, kept explicit rather than sniffed at
/// each call site.
struct CountRule {
    count_field: &'static str,
    array_field: &'static str,
}

const ARTIFACT_RULE: CountRule = CountRule {
    count_field: "testcases_count",
    array_field: "testcases",
};

const VIOLATION_RULE: CountRule = CountRule {
    count_field: "total_violations",
    array_field: "violations",
};

const RECOMMENDATION_RULE: CountRule = CountRule {
    count_field: "recommendations_count",
    array_field: "recommendations",
};

impl CountRule {
    fn probe(&self, payload: &Value) -> u32 {
        if let Some(count) = payload.get(self.count_field).and_then(Value::as_u64) {
            return count as u32;
        }
        let nested = payload
            .get("result")
            .and_then(|r| r.get(self.array_field))
            .and_then(Value::as_array);
        if let Some(items) = nested {
            return items.len() as u32;
        }
        if let Some(items) = payload.get(self.array_field).and_then(Value::as_array) {
            return items.len() as u32;
        }
        0
    }
}

/// Extract the result metadata relevant to a kind from a status payload.
///
/// Only the counter(s) that apply to the kind are filled in.
pub fn extract_metadata(kind: JobKind, payload: &Value) -> ResultMetadata {
    let mut metadata = ResultMetadata::default();
    match kind {
        JobKind::UiTestcases
        | JobKind::ApiTestcases
        | JobKind::UiAutotests
        | JobKind::ApiAutotests => {
            metadata.artifacts = Some(ARTIFACT_RULE.probe(payload));
        }
        JobKind::Standards => {
            metadata.violations = Some(VIOLATION_RULE.probe(payload));
        }
        JobKind::Optimization => {
            metadata.recommendations = Some(RECOMMENDATION_RULE.probe(payload));
        }
    }
    metadata
}

impl JobUpdate {
    /// The reconciliation update applied when a job is first observed
    /// terminal: the terminal status, progress pinned at 100, and the
    /// kind's extracted counters.
    pub fn terminal(status: JobStatus, metadata: ResultMetadata) -> Self {
        Self {
            status: Some(status),
            progress: Some(100),
            artifacts: metadata.artifacts,
            violations: metadata.violations,
            recommendations: metadata.recommendations,
        }
    }
}
