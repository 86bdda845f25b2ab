//! TestOps engine: backend client, polling primitives and durable job lists.
mod api;
mod persist;
mod poller;
mod settings;
mod store;
mod watcher;

pub use api::{ApiError, ApiFailure, JobApi, ReqwestJobApi, SubmitAck};
pub use persist::{ensure_state_dir, AtomicFileWriter, PersistError};
pub use poller::{Poller, Tick};
pub use settings::ClientSettings;
pub use store::JobStore;
pub use watcher::{JobWatcher, TerminalHook, WatchSet, WatchSnapshot};
