use std::fs;
use std::path::{Path, PathBuf};

use client_logging::{client_debug, client_warn};
use testops_core::{JobKind, JobList, JobSummary, JobUpdate};

use crate::persist::{AtomicFileWriter, PersistError};

/// Durable, per-kind list of job summaries.
///
/// One file per kind under the state directory, named after the kind's
/// storage key, holding the JSON-serialized array newest-first. Every
/// mutation rewrites the file in full through an atomic temp-then-rename,
/// so a reader never observes a torn list.
pub struct JobStore {
    kind: JobKind,
    dir: PathBuf,
    list: JobList,
}

impl JobStore {
    /// Hydrate the store from disk.
    ///
    /// A missing file is an empty list. Unreadable or unparsable content is
    /// also treated as an empty list: persistence corruption is logged and
    /// recovered from, never surfaced as an error.
    pub fn open(state_dir: &Path, kind: JobKind) -> Self {
        let dir = state_dir.to_path_buf();
        let list = JobList::from_entries(load_entries(&dir, kind));
        Self { kind, dir, list }
    }

    pub fn kind(&self) -> JobKind {
        self.kind
    }

    /// Insert a new summary at the head and persist.
    ///
    /// Returns false (and persists nothing) when the id already exists.
    pub fn append(&mut self, summary: JobSummary) -> Result<bool, PersistError> {
        if !self.list.append(summary) {
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    /// Shallow-merge an update into the entry with the given id and persist.
    ///
    /// A missing id is a no-op: the entry may have been removed by the user
    /// while a poll for it was still in flight.
    pub fn update(&mut self, job_id: &str, update: &JobUpdate) -> Result<bool, PersistError> {
        if !self.list.update(job_id, update) {
            client_debug!(
                "Update for unknown {} job {job_id} ignored",
                self.kind
            );
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    /// Remove the entry with the given id and persist.
    pub fn remove(&mut self, job_id: &str) -> Result<bool, PersistError> {
        if !self.list.remove(job_id) {
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    pub fn get(&self, job_id: &str) -> Option<&JobSummary> {
        self.list.get(job_id)
    }

    /// All summaries, newest first.
    pub fn list(&self) -> &[JobSummary] {
        self.list.as_slice()
    }

    fn persist(&self) -> Result<(), PersistError> {
        let content = serde_json::to_string_pretty(self.list.as_slice())?;
        let writer = AtomicFileWriter::new(self.dir.clone());
        writer.write(&store_filename(self.kind), &content)?;
        Ok(())
    }
}

fn store_filename(kind: JobKind) -> String {
    format!("{}.json", kind.storage_key())
}

fn load_entries(dir: &Path, kind: JobKind) -> Vec<JobSummary> {
    let path = dir.join(store_filename(kind));
    let content = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Vec::new();
        }
        Err(err) => {
            client_warn!("Failed to read persisted {kind} jobs from {:?}: {err}", path);
            return Vec::new();
        }
    };

    match serde_json::from_str::<Vec<JobSummary>>(&content) {
        Ok(entries) => {
            client_debug!("Loaded {} persisted {kind} jobs from {:?}", entries.len(), path);
            entries
        }
        Err(err) => {
            client_warn!("Failed to parse persisted {kind} jobs from {:?}: {err}", path);
            Vec::new()
        }
    }
}
