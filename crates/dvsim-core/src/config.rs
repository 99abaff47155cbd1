use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Tuning knobs for a simulation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Maximum connection attempts per link before giving up.
    pub connect_attempts: u32,
    /// Delay between connection attempts (milliseconds).
    pub connect_delay_ms: u64,
    /// Idle window the monitor waits for table-change notifications before
    /// declaring convergence or starting the next round (milliseconds).
    pub grace_ms: u64,
    /// Capacity of the per-node inbound and event channels.
    pub channel_capacity: usize,
    /// Hard cap on rounds; exceeding it aborts the run as non-converging.
    pub round_limit: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            connect_attempts: 10,
            connect_delay_ms: 1000,
            grace_ms: 200,
            channel_capacity: 64,
            round_limit: 1024,
        }
    }
}

impl SimConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let input = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.into(),
            source,
        })?;
        toml::from_str(&input).map_err(|source| ConfigError::ConfigFile {
            path: path.into(),
            source,
        })
    }

    /// Delay between connection attempts as a `Duration`.
    pub fn connect_delay(&self) -> Duration {
        Duration::from_millis(self.connect_delay_ms)
    }

    /// Monitor idle window as a `Duration`.
    pub fn grace(&self) -> Duration {
        Duration::from_millis(self.grace_ms)
    }
}
