use crate::{JobSummary, JobUpdate};

/// Ordered list of job summaries for one kind, newest first.
///
/// Pure value type; durable storage wraps it. At most one entry per
/// `job_id`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobList {
    entries: Vec<JobSummary>,
}

impl JobList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<JobSummary>) -> Self {
        Self { entries }
    }

    /// Insert at the head (most recently created job first).
    ///
    /// Returns false without inserting when the id is already present.
    pub fn append(&mut self, summary: JobSummary) -> bool {
        if self.contains(&summary.job_id) {
            return false;
        }
        self.entries.insert(0, summary);
        true
    }

    /// Merge a partial update into the entry with the given id.
    ///
    /// Silently a no-op when no entry matches; the user may have removed the
    /// job while a watcher was still in flight.
    pub fn update(&mut self, job_id: &str, update: &JobUpdate) -> bool {
        match self.entries.iter_mut().find(|e| e.job_id == job_id) {
            Some(entry) => {
                entry.apply(update);
                true
            }
            None => false,
        }
    }

    /// Drop the entry with the given id, if present.
    pub fn remove(&mut self, job_id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.job_id != job_id);
        self.entries.len() != before
    }

    pub fn get(&self, job_id: &str) -> Option<&JobSummary> {
        self.entries.iter().find(|e| e.job_id == job_id)
    }

    pub fn contains(&self, job_id: &str) -> bool {
        self.get(job_id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &JobSummary> {
        self.entries.iter()
    }

    pub fn as_slice(&self) -> &[JobSummary] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_entries(self) -> Vec<JobSummary> {
        self.entries
    }
}
