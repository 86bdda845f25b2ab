use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::JobStatus;

/// Most recently fetched server-reported state for a watched job.
///
/// A transient projection owned by exactly one watcher; it takes display
/// precedence over the persisted summary while the watcher is attached and
/// is folded into the summary once, when a terminal status is first
/// observed. Never persisted directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveJobView {
    pub job_id: String,
    pub status: JobStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Kind-specific result payload (`testcases`, `violations`,
    /// `recommendations`, `result`, ...) captured verbatim for metadata
    /// extraction.
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl LiveJobView {
    /// The payload as a JSON value, for the extraction rule table.
    pub fn payload_value(&self) -> Value {
        Value::Object(self.payload.clone())
    }
}
