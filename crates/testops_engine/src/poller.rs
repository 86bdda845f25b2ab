use std::fmt;
use std::future::Future;
use std::time::Duration;

use client_logging::client_warn;
use tokio_util::sync::CancellationToken;

/// Scheduling decision returned by a poll action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Schedule the next tick after the interval.
    Continue,
    /// The schedule is done; no further tick will run.
    Stop,
}

/// Repeating-timer primitive driving an async action.
///
/// The action runs once immediately, then on a fixed cadence. Ticks are
/// strictly sequential: the next tick is scheduled only after the previous
/// action future settles, so at most one action is in flight per poller.
///
/// A tick that returns `Err` is logged and the schedule continues; a failed
/// tick never stops polling and never escapes to the caller. Cancelling (or
/// dropping) the poller races the token against the in-flight action, which
/// drops the action future before any of its remaining side effects can
/// land.
///
/// Changing the interval or the action is expressed as drop-and-respawn;
/// one `Poller` value owns exactly one timer task.
pub struct Poller {
    cancel: CancellationToken,
    handle: tokio::task::JoinHandle<()>,
}

impl Poller {
    /// Spawn the schedule with the first tick running immediately.
    pub fn spawn<A, F, E>(interval: Duration, mut action: A) -> Self
    where
        A: FnMut() -> F + Send + 'static,
        F: Future<Output = Result<Tick, E>> + Send + 'static,
        E: fmt::Display + Send + 'static,
    {
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    result = action() => match result {
                        Ok(Tick::Continue) => {}
                        Ok(Tick::Stop) => break,
                        Err(err) => {
                            client_warn!("Poll tick failed, keeping schedule: {err}");
                        }
                    }
                }
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = tokio::time::sleep(interval) => {}
                }
            }
        });
        Self { cancel, handle }
    }

    /// Stop the schedule. Idempotent; any in-flight tick is dropped.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// True once the timer task has exited, either by cancellation or by an
    /// action returning [`Tick::Stop`].
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
