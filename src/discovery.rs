//! Device enumeration.
//!
//! [`discover`] builds the list of usable touch devices for one pass:
//!
//! 1. a configured `devices` override list, probed in order;
//! 2. otherwise, the [`DEVICE_ENV_VAR`](crate::config::DEVICE_ENV_VAR)
//!    environment variable, then a scan of `/dev/input/event0..N`.
//!
//! Every candidate is validated by an open+configure probe; paths that fail
//! are silently excluded. The result is an owned [`DeviceList`]; each call
//! re-scans and returns a fresh, independent list.

use crate::backends;
use crate::config::{parse_device_list, DriverConfig, DEVICE_ENV_VAR};
use crate::metadata::DeviceMeta;

/// One enumerated device. Identity is the node path.
#[derive(Clone, Debug)]
pub struct DeviceDescriptor {
    pub path: String,
    pub meta: DeviceMeta,
}

/// Owned result of one enumeration pass.
#[derive(Clone, Debug, Default)]
pub struct DeviceList(Vec<DeviceDescriptor>);

impl DeviceList {
    /// Number of available devices.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Resolve an open index to its descriptor.
    pub fn get(&self, index: usize) -> Option<&DeviceDescriptor> {
        self.0.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DeviceDescriptor> {
        self.0.iter()
    }
}

/// Enumerate usable touch devices.
pub fn discover(config: &DriverConfig) -> DeviceList {
    discover_with(config, std::env::var(DEVICE_ENV_VAR).ok(), |path| {
        backends::probe_device(path)
    })
}

/// Enumeration core with the environment lookup and probe injected.
fn discover_with(
    config: &DriverConfig,
    env_device: Option<String>,
    mut probe: impl FnMut(&str) -> Option<DeviceMeta>,
) -> DeviceList {
    let mut found = Vec::new();

    // An explicit device list overrides all guessing.
    if let Some(arg) = config.devices.as_deref() {
        for path in parse_device_list(arg) {
            if found.len() >= config.max_devices {
                break;
            }
            if let Some(meta) = probe(&path) {
                log::debug!("discovered configured device {path}");
                found.push(DeviceDescriptor { path, meta });
            }
        }
        return DeviceList(found);
    }

    // No devices specified. Check the environment, then scan.
    if let Some(path) = env_device.as_deref() {
        if let Some(meta) = probe(path) {
            log::debug!("discovered {path} from {DEVICE_ENV_VAR}");
            found.push(DeviceDescriptor {
                path: path.to_string(),
                meta,
            });
        }
    }

    for i in 0..config.max_devices {
        if found.len() >= config.max_devices {
            break;
        }

        let path = format!("/dev/input/event{i}");
        if env_device.as_deref() == Some(path.as_str()) {
            continue;
        }

        if let Some(meta) = probe(&path) {
            log::debug!("discovered scanned device {path}");
            found.push(DeviceDescriptor { path, meta });
        }
    }

    DeviceList(found)
}
