//! TestOps dashboard client: configuration, logging and job tracking glue.
pub mod config;
pub mod logging;
pub mod tracker;

pub use config::AppConfig;
pub use tracker::{JobRow, JobTracker, TrackError};
