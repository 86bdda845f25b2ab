use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle status reported by the backend for a job.
///
/// The transition graph is `pending -> processing -> {completed | failed}`
/// plus `pending | processing -> cancelled`. The three right-hand states are
/// terminal and absorbing; the client only ever observes transitions, it
/// never drives them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
    Cancelled,
}

impl JobStatus {
    /// True for `completed`, `failed` and `cancelled`.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobStatus::Completed | JobStatus::Failed | JobStatus::Cancelled
        )
    }

    /// Whether a status update from `self` to `next` moves forward.
    ///
    /// A status never regresses and a terminal status never changes, so a
    /// stale or out-of-order update is simply not applied.
    pub fn accepts(&self, next: JobStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        self.rank() <= next.rank()
    }

    fn rank(&self) -> u8 {
        match self {
            JobStatus::Pending => 0,
            JobStatus::Processing => 1,
            JobStatus::Completed | JobStatus::Failed | JobStatus::Cancelled => 2,
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JobStatus::Pending => "pending",
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
            JobStatus::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}
