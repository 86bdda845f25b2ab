use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use client_logging::{client_error, client_info};
use serde_json::Value;
use testops_core::{extract_metadata, JobKind, JobSummary, JobUpdate};
use testops_engine::{
    ApiError, JobApi, JobStore, PersistError, SubmitAck, TerminalHook, WatchSet,
};

#[derive(Debug, thiserror::Error)]
pub enum TrackError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Persist(#[from] PersistError),
}

/// A persisted summary merged with the live overlay for display.
#[derive(Debug, Clone)]
pub struct JobRow {
    pub summary: JobSummary,
    /// Transient fetch error from the job's watcher, if any.
    pub live_error: Option<String>,
}

/// Glue between submission, the per-kind durable stores and the watchers.
///
/// This is the reconciliation point: a watcher's terminal hook extracts the
/// kind's result metadata from the live payload and folds it into the
/// persisted summary (a one-way merge, live into persisted).
pub struct JobTracker {
    api: Arc<dyn JobApi>,
    stores: HashMap<JobKind, Arc<Mutex<JobStore>>>,
    watchers: WatchSet,
}

impl JobTracker {
    pub fn new(api: Arc<dyn JobApi>, state_dir: &Path, poll_interval: Duration) -> Self {
        let stores = JobKind::ALL
            .iter()
            .map(|&kind| {
                (
                    kind,
                    Arc::new(Mutex::new(JobStore::open(state_dir, kind))),
                )
            })
            .collect();
        Self {
            api: Arc::clone(&api),
            stores,
            watchers: WatchSet::new(api, poll_interval),
        }
    }

    /// Submit a job and start tracking it.
    ///
    /// On acceptance the summary is appended optimistically (`pending`, 10%
    /// progress) and a watcher attached. A submission failure is returned to
    /// the caller and leaves no trace in the store.
    pub async fn submit(
        &mut self,
        kind: JobKind,
        title: &str,
        body: Value,
    ) -> Result<SubmitAck, TrackError> {
        let ack = self.api.submit(kind, body).await?;
        client_info!("Submitted {kind} job {} ({title})", ack.job_id);

        let summary = JobSummary::submitted(&ack.job_id, kind, title);
        self.store(kind)
            .lock()
            .expect("lock job store")
            .append(summary)?;
        self.attach(kind, &ack.job_id);
        Ok(ack)
    }

    /// Re-attach watchers for every persisted non-terminal job.
    ///
    /// Called on startup so tracking survives reloads. Terminal summaries
    /// are never polled again.
    pub fn resume(&mut self) {
        for &kind in &JobKind::ALL {
            let pending: Vec<String> = {
                let store = self.store(kind).lock().expect("lock job store");
                store
                    .list()
                    .iter()
                    .filter(|s| !s.status.is_terminal())
                    .map(|s| s.job_id.clone())
                    .collect()
            };
            for job_id in pending {
                self.attach(kind, &job_id);
            }
        }
    }

    /// Persisted summaries for a kind, newest first, with the live view
    /// overlaid where a watcher is attached.
    pub fn rows(&self, kind: JobKind) -> Vec<JobRow> {
        let store = self.store(kind).lock().expect("lock job store");
        store
            .list()
            .iter()
            .map(|summary| {
                let mut summary = summary.clone();
                let mut live_error = None;
                if let Some(snapshot) = self.watchers.snapshot(kind, &summary.job_id) {
                    if let Some(view) = snapshot.job {
                        let mut overlay = JobUpdate::status(view.status);
                        overlay.progress = view.progress;
                        summary.apply(&overlay);
                    }
                    live_error = snapshot.error;
                }
                JobRow {
                    summary,
                    live_error,
                }
            })
            .collect()
    }

    /// Explicit user removal; detaches any watcher first.
    pub fn remove(&mut self, kind: JobKind, job_id: &str) -> Result<bool, TrackError> {
        self.watchers.detach(kind, job_id);
        let removed = self
            .store(kind)
            .lock()
            .expect("lock job store")
            .remove(job_id)?;
        Ok(removed)
    }

    /// True while any watcher is still polling.
    pub fn has_active_watchers(&mut self) -> bool {
        self.watchers.prune_settled();
        !self.watchers.is_empty()
    }

    fn store(&self, kind: JobKind) -> &Arc<Mutex<JobStore>> {
        // The map is populated for every kind at construction.
        &self.stores[&kind]
    }

    fn attach(&mut self, kind: JobKind, job_id: &str) {
        let store = Arc::clone(self.store(kind));
        let id = job_id.to_string();
        let hook: TerminalHook = Arc::new(move |view| {
            let metadata = extract_metadata(kind, &view.payload_value());
            let update = JobUpdate::terminal(view.status, metadata);
            let mut store = store.lock().expect("lock job store");
            if let Err(err) = store.update(&id, &update) {
                client_error!("Failed to persist terminal state of {kind} job {id}: {err}");
            }
        });
        self.watchers.attach(kind, job_id, hook);
    }
}
