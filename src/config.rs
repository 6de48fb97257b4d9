//! Server configuration from environment variables

use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Runtime settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub port: u16,
    /// Drop sessions untouched for this long; `None` disables expiry
    pub session_idle: Option<Duration>,
    pub sweep_interval: Duration,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unparsable values fall back to defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let db_path = lookup("CONCIERGE_DB_PATH").map_or_else(
            || {
                let home = lookup("HOME").unwrap_or_else(|| "/tmp".to_string());
                PathBuf::from(format!("{home}/.concierge/concierge.db"))
            },
            PathBuf::from,
        );

        let port = lookup("CONCIERGE_PORT")
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let session_idle = lookup("CONCIERGE_SESSION_IDLE_SECS")
            .and_then(|s| s.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        let sweep_interval = lookup("CONCIERGE_SWEEP_INTERVAL_SECS")
            .and_then(|s| s.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map_or(DEFAULT_SWEEP_INTERVAL, Duration::from_secs);

        Self {
            db_path,
            port,
            session_idle,
            sweep_interval,
        }
    }
}
