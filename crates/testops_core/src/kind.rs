use std::fmt;

use serde::{Deserialize, Serialize};

/// The closed set of job kinds the dashboard tracks.
///
/// Each kind has its own persisted list and its own backend endpoints; the
/// lifecycle machinery is shared across all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobKind {
    #[serde(rename = "ui-testcases")]
    UiTestcases,
    #[serde(rename = "api-testcases")]
    ApiTestcases,
    #[serde(rename = "ui-autotests")]
    UiAutotests,
    #[serde(rename = "api-autotests")]
    ApiAutotests,
    #[serde(rename = "standards")]
    Standards,
    #[serde(rename = "optimization")]
    Optimization,
}

impl JobKind {
    /// All kinds, in display order.
    pub const ALL: [JobKind; 6] = [
        JobKind::UiTestcases,
        JobKind::ApiTestcases,
        JobKind::UiAutotests,
        JobKind::ApiAutotests,
        JobKind::Standards,
        JobKind::Optimization,
    ];

    /// Stable slug used in storage keys and on the command line.
    pub fn slug(&self) -> &'static str {
        match self {
            JobKind::UiTestcases => "ui-testcases",
            JobKind::ApiTestcases => "api-testcases",
            JobKind::UiAutotests => "ui-autotests",
            JobKind::ApiAutotests => "api-autotests",
            JobKind::Standards => "standards",
            JobKind::Optimization => "optimization",
        }
    }

    /// Parse a slug back into a kind.
    pub fn from_slug(slug: &str) -> Option<JobKind> {
        JobKind::ALL.iter().copied().find(|k| k.slug() == slug)
    }

    /// Key under which this kind's job list is persisted.
    ///
    /// Each kind gets its own namespace so the lists never collide.
    pub fn storage_key(&self) -> String {
        format!("testops_{}_jobs", self.slug())
    }

    /// Status endpoint for a job of this kind.
    pub fn status_path(&self, job_id: &str) -> String {
        format!("{}/{}", self.status_prefix(), job_id)
    }

    /// Submission endpoint for this kind.
    pub fn submit_path(&self) -> &'static str {
        match self {
            JobKind::UiTestcases => "/api/testcases/manual/ui",
            JobKind::ApiTestcases => "/api/testcases/manual/api",
            JobKind::UiAutotests => "/api/autotests/ui",
            JobKind::ApiAutotests => "/api/autotests/api",
            JobKind::Standards => "/api/standards/check",
            JobKind::Optimization => "/api/optimization/analyze",
        }
    }

    /// Artifact download endpoint, valid once a job has completed.
    ///
    /// Standards checks expose an HTML report instead of a zip archive.
    pub fn download_path(&self, job_id: &str) -> String {
        match self {
            JobKind::Standards => format!("{}/report", self.status_path(job_id)),
            _ => format!("{}/download", self.status_path(job_id)),
        }
    }

    fn status_prefix(&self) -> &'static str {
        match self {
            JobKind::UiTestcases | JobKind::ApiTestcases => "/api/testcases",
            JobKind::UiAutotests | JobKind::ApiAutotests => "/api/autotests",
            JobKind::Standards => "/api/standards",
            JobKind::Optimization => "/api/optimization",
        }
    }
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}
