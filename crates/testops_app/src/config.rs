use std::path::PathBuf;
use std::time::Duration;

use client_logging::client_warn;
use testops_engine::ClientSettings;

const DEFAULT_STATE_DIR: &str = "./testops_state";

/// Environment-driven application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub settings: ClientSettings,
    /// Directory holding the per-kind persisted job lists.
    pub state_dir: PathBuf,
}

impl AppConfig {
    /// Read configuration from the environment, falling back to defaults.
    ///
    /// `TESTOPS_API_BASE` — backend base URL.
    /// `TESTOPS_STATE_DIR` — where job lists are persisted.
    /// `TESTOPS_POLL_INTERVAL_MS` — status poll cadence.
    pub fn from_env() -> Self {
        let mut settings = ClientSettings::default();
        if let Ok(base) = std::env::var("TESTOPS_API_BASE") {
            if !base.trim().is_empty() {
                settings.base_url = base;
            }
        }
        if let Ok(raw) = std::env::var("TESTOPS_POLL_INTERVAL_MS") {
            match raw.parse::<u64>() {
                Ok(ms) if ms > 0 => settings.poll_interval = Duration::from_millis(ms),
                _ => {
                    client_warn!(
                        "Ignoring invalid TESTOPS_POLL_INTERVAL_MS={raw}, using {:?}",
                        settings.poll_interval
                    );
                }
            }
        }
        let state_dir = std::env::var("TESTOPS_STATE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_STATE_DIR));

        Self {
            settings,
            state_dir,
        }
    }
}
