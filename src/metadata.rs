//! Device metadata snapshot.
//!
//! [`DeviceMeta`] is a lightweight, cloneable description of a touch device
//! suitable for UI display, logging, and persistence. The enumeration probe
//! populates what the kernel reports; unknown fields remain `None`.
//!
//! # Conventions
//! - `path` is the device node the driver opens (e.g. `/dev/input/event3`);
//!   it is also the device's identity within one enumeration pass.
//! - `name` is the kernel-reported device name, user-facing when available.
//! - `phys` is the physical topology string (port/connector); diagnostic
//!   first, identity second, since it may change across reconnects.
//! - `bus` is a short human-readable bus hint like `"usb"` or `"i2c"`.

use serde::{Deserialize, Serialize};

/// Snapshot of metadata describing a single touch device.
///
/// All fields but `path` are optional; the probe fills what the platform
/// reports.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DeviceMeta {
    /// Device node path this snapshot was probed from.
    pub path: String,

    /// Kernel-reported device name.
    pub name: Option<String>,

    /// Physical topology string (e.g. `"usb-0000:00:14.0-3/input0"`).
    pub phys: Option<String>,

    /// High-level bus classification (e.g. `"usb"`, `"i2c"`, `"host"`).
    pub bus: Option<String>,

    /// Vendor ID, if known.
    pub vendor_id: Option<u16>,

    /// Product ID, if known.
    pub product_id: Option<u16>,
}
