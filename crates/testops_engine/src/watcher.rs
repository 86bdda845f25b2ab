use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use client_logging::{client_debug, client_info};
use testops_core::{JobKind, LiveJobView};

use crate::{ApiError, JobApi, Poller, Tick};

/// Callback fired exactly once when a watched job is first observed in a
/// terminal status.
pub type TerminalHook = Arc<dyn Fn(&LiveJobView) + Send + Sync>;

/// Latest known state of a watched job, for display.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WatchSnapshot {
    /// Freshest server payload, or `None` before the first successful fetch.
    pub job: Option<LiveJobView>,
    /// Human-readable fetch error from the most recent failed tick; cleared
    /// by the next successful fetch.
    pub error: Option<String>,
}

#[derive(Default)]
struct WatchState {
    job: Option<LiveJobView>,
    error: Option<String>,
    terminal_fired: bool,
}

/// Per-job polling state machine over one [`Poller`].
///
/// Each tick fetches the job's status. A successful fetch replaces the local
/// view wholesale (ticks are sequential, so last-fetch-wins is also
/// issuance-order-wins) and clears any prior error. A failed fetch keeps the
/// last good view, records the error and leaves the schedule running. The
/// first terminal status fires the hook once and stops the schedule; no
/// fetch is ever issued for this id afterwards.
///
/// Dropping the watcher cancels its poller; an in-flight fetch settles into
/// a dropped future and mutates nothing.
pub struct JobWatcher {
    kind: JobKind,
    job_id: String,
    state: Arc<Mutex<WatchState>>,
    poller: Poller,
}

impl JobWatcher {
    pub fn watch(
        api: Arc<dyn JobApi>,
        kind: JobKind,
        job_id: impl Into<String>,
        interval: Duration,
        on_terminal: TerminalHook,
    ) -> Self {
        let job_id = job_id.into();
        let state = Arc::new(Mutex::new(WatchState::default()));

        client_debug!("Watching {kind} job {job_id} every {:?}", interval);

        let poller = {
            let state = Arc::clone(&state);
            let job_id = job_id.clone();
            Poller::spawn(interval, move || {
                let api = Arc::clone(&api);
                let state = Arc::clone(&state);
                let job_id = job_id.clone();
                let on_terminal = Arc::clone(&on_terminal);
                async move { poll_once(api, kind, &job_id, &state, &on_terminal).await }
            })
        };

        Self {
            kind,
            job_id,
            state,
            poller,
        }
    }

    pub fn kind(&self) -> JobKind {
        self.kind
    }

    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    /// Current view/error pair.
    pub fn snapshot(&self) -> WatchSnapshot {
        let guard = self.state.lock().expect("lock watch state");
        WatchSnapshot {
            job: guard.job.clone(),
            error: guard.error.clone(),
        }
    }

    /// True once polling has stopped, either because a terminal status was
    /// observed or because the watcher was cancelled.
    pub fn is_settled(&self) -> bool {
        self.poller.is_finished()
    }

    /// Stop polling without waiting for a terminal status.
    pub fn detach(self) {
        self.poller.cancel();
    }
}

async fn poll_once(
    api: Arc<dyn JobApi>,
    kind: JobKind,
    job_id: &str,
    state: &Mutex<WatchState>,
    on_terminal: &TerminalHook,
) -> Result<Tick, ApiError> {
    let view = match api.fetch_status(kind, job_id).await {
        Ok(view) => view,
        Err(err) => {
            let mut guard = state.lock().expect("lock watch state");
            guard.error = Some(err.to_string());
            // Transient by definition; the poller logs it and keeps going.
            return Err(err);
        }
    };

    let mut guard = state.lock().expect("lock watch state");
    if guard.terminal_fired {
        return Ok(Tick::Stop);
    }
    guard.error = None;
    guard.job = Some(view.clone());

    if view.status.is_terminal() {
        guard.terminal_fired = true;
        drop(guard);
        client_info!("{kind} job {job_id} reached terminal status {}", view.status);
        on_terminal(&view);
        return Ok(Tick::Stop);
    }
    Ok(Tick::Continue)
}

/// Owns at most one watcher per `(kind, job_id)`.
///
/// Switching the watched id for a slot is detach-then-attach; independent
/// jobs poll independently of each other.
pub struct WatchSet {
    api: Arc<dyn JobApi>,
    interval: Duration,
    watchers: HashMap<(JobKind, String), JobWatcher>,
}

impl WatchSet {
    pub fn new(api: Arc<dyn JobApi>, interval: Duration) -> Self {
        Self {
            api,
            interval,
            watchers: HashMap::new(),
        }
    }

    /// Begin watching a job. No-op when the id is already watched.
    pub fn attach(&mut self, kind: JobKind, job_id: &str, on_terminal: TerminalHook) -> bool {
        let key = (kind, job_id.to_string());
        if self.watchers.contains_key(&key) {
            return false;
        }
        let watcher = JobWatcher::watch(
            Arc::clone(&self.api),
            kind,
            job_id,
            self.interval,
            on_terminal,
        );
        self.watchers.insert(key, watcher);
        true
    }

    /// Tear down the watcher for a job, if any.
    pub fn detach(&mut self, kind: JobKind, job_id: &str) -> bool {
        self.watchers.remove(&(kind, job_id.to_string())).is_some()
    }

    pub fn is_watching(&self, kind: JobKind, job_id: &str) -> bool {
        self.watchers.contains_key(&(kind, job_id.to_string()))
    }

    pub fn snapshot(&self, kind: JobKind, job_id: &str) -> Option<WatchSnapshot> {
        self.watchers
            .get(&(kind, job_id.to_string()))
            .map(JobWatcher::snapshot)
    }

    /// Drop watchers whose polling has already stopped.
    pub fn prune_settled(&mut self) {
        self.watchers.retain(|_, watcher| !watcher.is_settled());
    }

    pub fn len(&self) -> usize {
        self.watchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.watchers.is_empty()
    }
}
