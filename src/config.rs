// config.rs

use std::path::Path;
use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use log::LevelFilter;
use serde::Deserialize;

use crate::sync::SyncTuning;

/// Runtime settings, layered from lowest to highest precedence: built-in
/// defaults, an optional `orthoctl.toml`, `ORTHOCTL_*` environment variables
/// and finally command-line flags (applied in `cli`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    /// MIDI port to bind to, matched as a substring of the port name.
    pub port: Option<String>,
    /// Applications probed for a reference volume, in priority order.
    pub apps: Vec<String>,
    /// Latch window in percentage points.
    pub latch_tolerance: u8,
    /// Minimum spacing between set-volume calls.
    pub sync_interval_ms: u64,
    /// Cooldown after the application reports rate limiting.
    pub rate_limit_backoff_ms: u64,
    /// Sleep quantum of the sync worker loop.
    pub worker_quantum_ms: u64,
    /// How long connection teardown waits for the worker to exit.
    pub worker_join_timeout_ms: u64,
    /// How often the supervisor probes for the port.
    pub poll_interval_ms: u64,
    /// Send the vendor SysEx greeting after connecting.
    pub sysex_handshake: bool,
    /// Log level for the file logger.
    pub log_level: String,
}

impl Settings {
    /// Loads settings from all layers. With `file` set the named file must
    /// exist; otherwise `orthoctl.toml` in the working directory is used
    /// when present.
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("port", None::<String>)?
            .set_default("apps", DEFAULT_APPS.to_vec())?
            .set_default("latch_tolerance", DEFAULT_LATCH_TOLERANCE)?
            .set_default("sync_interval_ms", DEFAULT_SYNC_INTERVAL_MS)?
            .set_default("rate_limit_backoff_ms", DEFAULT_RATE_LIMIT_BACKOFF_MS)?
            .set_default("worker_quantum_ms", DEFAULT_WORKER_QUANTUM_MS)?
            .set_default("worker_join_timeout_ms", DEFAULT_WORKER_JOIN_TIMEOUT_MS)?
            .set_default("poll_interval_ms", DEFAULT_POLL_INTERVAL_MS)?
            .set_default("sysex_handshake", false)?
            .set_default("log_level", "info")?;

        builder = match file {
            Some(path) => builder.add_source(File::from(path)),
            None => builder.add_source(File::with_name("orthoctl").required(false)),
        };

        builder
            .add_source(
                // Env values arrive as strings; "apps" is the one list-typed
                // key, split on commas (ORTHOCTL_APPS=Spotify,Music).
                Environment::with_prefix("ORTHOCTL")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("apps"),
            )
            .build()?
            .try_deserialize()
    }

    pub fn sync_tuning(&self) -> SyncTuning {
        SyncTuning {
            interval: Duration::from_millis(self.sync_interval_ms),
            backoff: Duration::from_millis(self.rate_limit_backoff_ms),
            quantum: Duration::from_millis(self.worker_quantum_ms),
        }
    }

    pub fn worker_join_timeout(&self) -> Duration {
        Duration::from_millis(self.worker_join_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Level for the file logger; unknown names fall back to info.
    pub fn level_filter(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or(LevelFilter::Info)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            port: None,
            apps: DEFAULT_APPS.iter().map(|app| app.to_string()).collect(),
            latch_tolerance: DEFAULT_LATCH_TOLERANCE,
            sync_interval_ms: DEFAULT_SYNC_INTERVAL_MS,
            rate_limit_backoff_ms: DEFAULT_RATE_LIMIT_BACKOFF_MS,
            worker_quantum_ms: DEFAULT_WORKER_QUANTUM_MS,
            worker_join_timeout_ms: DEFAULT_WORKER_JOIN_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            sysex_handshake: false,
            log_level: "info".to_string(),
        }
    }
}

pub const DEFAULT_APPS: &[&str] = &["Spotify", "Music"];
pub const DEFAULT_LATCH_TOLERANCE: u8 = 3;
pub const DEFAULT_SYNC_INTERVAL_MS: u64 = 250;
pub const DEFAULT_RATE_LIMIT_BACKOFF_MS: u64 = 10_000;
pub const DEFAULT_WORKER_QUANTUM_MS: u64 = 50;
pub const DEFAULT_WORKER_JOIN_TIMEOUT_MS: u64 = 1_000;
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1_000;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.port, None);
        assert_eq!(settings.apps, vec!["Spotify", "Music"]);
        assert_eq!(settings.latch_tolerance, 3);
        assert_eq!(settings.sync_interval_ms, 250);
        assert_eq!(settings.rate_limit_backoff_ms, 10_000);
        assert!(!settings.sysex_handshake);
    }

    #[test]
    fn test_duration_accessors() {
        let settings = Settings::default();
        let tuning = settings.sync_tuning();
        assert_eq!(tuning.interval, Duration::from_millis(250));
        assert_eq!(tuning.backoff, Duration::from_secs(10));
        assert_eq!(tuning.quantum, Duration::from_millis(50));
        assert_eq!(settings.worker_join_timeout(), Duration::from_secs(1));
        assert_eq!(settings.poll_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_level_filter_parsing() {
        let mut settings = Settings::default();
        settings.log_level = "debug".to_string();
        assert_eq!(settings.level_filter(), LevelFilter::Debug);

        settings.log_level = "not-a-level".to_string();
        assert_eq!(
            settings.level_filter(),
            LevelFilter::Info,
            "Unknown level names should fall back to info"
        );
    }
}
