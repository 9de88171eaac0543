//! Driver configuration.
//!
//! [`DriverConfig`] carries the knobs the host can set before enumeration:
//! an explicit device-path override list, the enumeration capacity, and the
//! per-session slot capacity. Values come from [`DriverConfig::default`] or
//! a TOML file via [`DriverConfig::load`]:
//!
//! ```toml
//! devices = "/dev/input/event2, /dev/input/event5"
//! max_devices = 16
//! slot_capacity = 10
//! ```

use crate::error::DriverError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable naming a single preferred device path, consulted
/// when no `devices` override is configured.
pub const DEVICE_ENV_VAR: &str = "TOUCHBRIDGE_DEVICE";

/// Default cap on enumerated devices.
pub const DEFAULT_MAX_DEVICES: usize = 16;

/// Default per-session slot capacity (simultaneous contacts tracked).
pub const DEFAULT_SLOT_CAPACITY: usize = 10;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Comma-separated device-path override list. When set, enumeration
    /// probes exactly these paths and nothing else.
    pub devices: Option<String>,

    /// Maximum number of devices one enumeration pass returns; also bounds
    /// the `/dev/input/eventN` scan range.
    pub max_devices: usize,

    /// Sample buffer size per session. The active-slot count configured at
    /// runtime may not exceed this.
    pub slot_capacity: usize,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            devices: None,
            max_devices: DEFAULT_MAX_DEVICES,
            slot_capacity: DEFAULT_SLOT_CAPACITY,
        }
    }
}

impl DriverConfig {
    /// Load configuration from a TOML file.
    ///
    /// Missing keys fall back to defaults. Zero capacities are rejected up
    /// front rather than producing a driver that can never report anything.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DriverError> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), DriverError> {
        if self.max_devices == 0 {
            return Err(DriverError::InvalidArgument(
                "max_devices must be at least 1".into(),
            ));
        }
        if self.slot_capacity == 0 {
            return Err(DriverError::InvalidArgument(
                "slot_capacity must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Split a comma-separated device list, trimming whitespace and dropping
/// empty tokens.
pub fn parse_device_list(arg: &str) -> Vec<String> {
    arg.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}
