//! # Host Configuration
//!
//! ```toml
//! tick_interval_ms = 50
//! mailbox_capacity = 64
//! cache_dir = "cache"
//!
//! [render]
//! canvas_width = 256
//! canvas_height = 256
//! ```

use crate::error::{HostError, HostResult};
use isoraster_rendering::RenderConfig;
use isoraster_shared::DEFAULT_TICK_INTERVAL_MS;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Settings for the display host.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Time between ticks sent to each display
    pub tick_interval_ms: u64,
    /// Messages a display can have queued before ticks are dropped
    pub mailbox_capacity: usize,
    /// Directory for canvas snapshots and properties; in-memory when unset
    pub cache_dir: Option<PathBuf>,
    /// Settings shared by every display
    pub render: RenderConfig,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            render: RenderConfig::default(),
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            mailbox_capacity: 64,
            cache_dir: None,
        }
    }
}

impl HostConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(text: &str) -> HostResult<Self> {
        let config: Self = toml::from_str(text).map_err(|e| HostError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    pub fn load(path: impl AsRef<Path>) -> HostResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| HostError::Config(format!("failed to read {}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Checks the host settings and the embedded render settings.
    pub fn validate(&self) -> HostResult<()> {
        if self.tick_interval_ms == 0 {
            return Err(HostError::Config("tick_interval_ms must be non-zero".to_string()));
        }
        if self.mailbox_capacity == 0 {
            return Err(HostError::Config("mailbox_capacity must be non-zero".to_string()));
        }
        self.render.validate()?;
        Ok(())
    }

    /// Time between ticks.
    #[must_use]
    pub const fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}
