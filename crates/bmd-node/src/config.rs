use std::path::Path;
use std::time::Duration;

use anyhow::{ensure, Context};
use bmd_store::{StoreOptions, MEMDB_DRIVER};
use serde::{Deserialize, Serialize};

/// Daemon configuration, read from a TOML file. Every field is optional.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    /// Registry name of the store driver.
    pub driver: String,
    pub store: StoreOptions,
    /// Seconds between expiry sweeps.
    pub sweep_interval_secs: u64,
    /// Objects fetched per page when walking a backlog.
    pub backlog_batch_size: usize,
    /// Default log filter. `RUST_LOG` takes precedence.
    pub log_level: String,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            driver: MEMDB_DRIVER.to_string(),
            store: StoreOptions::default(),
            sweep_interval_secs: 600,
            backlog_batch_size: 100,
            log_level: "info".to_string(),
        }
    }
}

impl NodeConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("loading config {}", path.display()))
    }

    pub fn from_toml(text: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(self.sweep_interval_secs > 0, "sweep_interval_secs must be positive");
        ensure!(self.backlog_batch_size > 0, "backlog_batch_size must be positive");
        ensure!(!self.driver.is_empty(), "driver must not be empty");
        Ok(())
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}
