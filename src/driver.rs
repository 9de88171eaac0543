//! Host-facing driver surface.
//!
//! [`TouchDriver`] is the entry point a host input core binds against:
//! driver identity, device enumeration, opening translating sessions, and
//! the keymap query this driver class never supports.

use crate::backends;
use crate::config::DriverConfig;
use crate::discovery::{discover, DeviceList};
use crate::error::DriverError;
use crate::event::{Axis, Button};
use crate::metadata::DeviceMeta;
use crate::session::Session;
use crate::sink::EventSink;
use bitflags::bitflags;

/// Driver identity reported to the host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DriverInfo {
    pub name: &'static str,
    pub vendor: &'static str,
    pub version_major: u16,
    pub version_minor: u16,
}

/// How the host should classify an opened device.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeviceClass {
    /// Mouse-like pointer device.
    Pointer,
}

bitflags! {
    /// Capability mask of an opened device.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct DeviceCaps: u32 {
        const AXES = 1 << 0;
        const BUTTONS = 1 << 1;
    }
}

/// Metadata handed to the host when a device is opened.
#[derive(Clone, Debug)]
pub struct DeviceInfo {
    pub class: DeviceClass,
    pub caps: DeviceCaps,
    /// Highest axis the device reports.
    pub max_axis: Axis,
    /// Highest button the device reports.
    pub max_button: Button,
    pub name: String,
    pub vendor: String,
    /// Probe-time metadata for the underlying node.
    pub meta: DeviceMeta,
}

/// One entry of a key translation table.
///
/// Touch panels carry no keymap; the query exists to satisfy the host
/// contract and always fails with [`DriverError::Unsupported`].
#[derive(Clone, Copy, Debug, Default)]
pub struct KeymapEntry {
    pub code: u32,
    pub identifier: u32,
    pub symbol: u32,
}

pub struct TouchDriver {
    config: DriverConfig,
}

impl TouchDriver {
    pub fn new(config: DriverConfig) -> Self {
        Self { config }
    }

    /// Driver with default configuration (no overrides, caps 16/10).
    pub fn with_defaults() -> Self {
        Self::new(DriverConfig::default())
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Driver identity.
    pub fn info(&self) -> DriverInfo {
        DriverInfo {
            name: "touchbridge",
            vendor: "Belegrade Studio",
            version_major: 0,
            version_minor: 1,
        }
    }

    /// Run one enumeration pass and return the available devices.
    pub fn enumerate(&self) -> DeviceList {
        discover(&self.config)
    }

    /// Open the device at `index` in `list` and start translating into
    /// `sink`.
    ///
    /// Open or configure failures surface as [`DriverError::Init`] and the
    /// device is not registered.
    pub fn open_device(
        &self,
        list: &DeviceList,
        index: usize,
        sink: Box<dyn EventSink>,
    ) -> Result<(DeviceInfo, Session), DriverError> {
        let descriptor = list.get(index).ok_or_else(|| {
            DriverError::InvalidArgument(format!("device index {index} out of range"))
        })?;

        let sampler =
            backends::open_sampler(&descriptor.path, self.config.slot_capacity).map_err(|err| {
                log::error!("could not open device '{}': {err}", descriptor.path);
                DriverError::Init(err.to_string())
            })?;

        let info = DeviceInfo {
            class: DeviceClass::Pointer,
            caps: DeviceCaps::AXES | DeviceCaps::BUTTONS,
            max_axis: Axis::Y,
            max_button: Button::Left,
            name: "Touchscreen".to_string(),
            vendor: "touchbridge".to_string(),
            meta: descriptor.meta.clone(),
        };

        let session = Session::spawn(sampler, sink, self.config.slot_capacity)?;

        Ok((info, session))
    }

    /// Keymap lookup; never supported for this driver class.
    pub fn keymap_entry(&self, _keycode: u32) -> Result<KeymapEntry, DriverError> {
        Err(DriverError::Unsupported)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::InputEvent;

    #[test]
    fn info_reports_fixed_identity() {
        let driver = TouchDriver::with_defaults();
        let info = driver.info();
        assert_eq!(info.name, "touchbridge");
        assert_eq!((info.version_major, info.version_minor), (0, 1));
    }

    #[test]
    fn keymap_queries_are_unsupported() {
        let driver = TouchDriver::with_defaults();
        assert!(matches!(
            driver.keymap_entry(30),
            Err(DriverError::Unsupported)
        ));
    }

    #[test]
    fn open_out_of_range_index_is_rejected() {
        let driver = TouchDriver::with_defaults();
        let result = driver.open_device(
            &DeviceList::default(),
            0,
            Box::new(|_: &InputEvent| {}),
        );
        assert!(matches!(result, Err(DriverError::InvalidArgument(_))));
    }
}
