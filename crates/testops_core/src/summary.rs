use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{JobKind, JobStatus};

/// Client-owned record of a submitted job, persisted across reloads.
///
/// Result metadata (`artifacts`, `violations`, `recommendations`) is filled
/// in only once the job reaches a terminal status; which counter applies
/// depends on the kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSummary {
    pub job_id: String,
    pub kind: JobKind,
    pub title: String,
    pub status: JobStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<u8>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifacts: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub violations: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<u32>,
}

impl JobSummary {
    /// A freshly submitted job: optimistic `pending` at 10% progress.
    pub fn submitted(job_id: impl Into<String>, kind: JobKind, title: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
            kind,
            title: title.into(),
            status: JobStatus::Pending,
            progress: Some(10),
            created_at: Utc::now(),
            artifacts: None,
            violations: None,
            recommendations: None,
        }
    }

    /// Shallow-merge a partial update into this summary.
    ///
    /// Enforces the lifecycle invariants: status only moves forward, progress
    /// is monotonic non-decreasing while non-terminal, and a terminal update
    /// pins progress at 100.
    pub fn apply(&mut self, update: &JobUpdate) {
        if let Some(status) = update.status {
            if self.status.accepts(status) {
                self.status = status;
            }
        }
        if self.status.is_terminal() {
            self.progress = Some(100);
        } else if let Some(progress) = update.progress {
            let progress = progress.min(100);
            if progress >= self.progress.unwrap_or(0) {
                self.progress = Some(progress);
            }
        }
        if update.artifacts.is_some() {
            self.artifacts = update.artifacts;
        }
        if update.violations.is_some() {
            self.violations = update.violations;
        }
        if update.recommendations.is_some() {
            self.recommendations = update.recommendations;
        }
    }
}

/// Partial update merged into a [`JobSummary`]; `None` fields are untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobUpdate {
    pub status: Option<JobStatus>,
    pub progress: Option<u8>,
    pub artifacts: Option<u32>,
    pub violations: Option<u32>,
    pub recommendations: Option<u32>,
}

impl JobUpdate {
    /// Update carrying only a status change.
    pub fn status(status: JobStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Update carrying a status change and a progress value.
    pub fn progress(status: JobStatus, progress: u8) -> Self {
        Self {
            status: Some(status),
            progress: Some(progress),
            ..Self::default()
        }
    }
}
