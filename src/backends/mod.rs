//! Sampling backends for `touchbridge`.
//!
//! Implementations of [`TouchSampler`](crate::sampler::TouchSampler) for
//! platform-specific touch device access. Linux is the supported platform;
//! on anything else, probing finds nothing and opening fails cleanly.
//!
//! Most users should not interact with this module directly. Prefer the
//! high-level [`TouchDriver`](crate::driver::TouchDriver) API:
//! - [`discover`](crate::discovery::discover) for enumeration
//! - `open_device` to start a translating session

use crate::metadata::DeviceMeta;
use crate::sampler::{SamplerError, TouchSampler};

#[cfg(target_os = "linux")]
pub mod evdev_touch;

/// Open+configure probe used during enumeration.
///
/// Returns the device's metadata when `path` is a usable multi-touch
/// device, `None` otherwise. The probe handle is dropped before returning
/// in either case.
pub fn probe_device(path: &str) -> Option<DeviceMeta> {
    #[cfg(target_os = "linux")]
    {
        match evdev_touch::EvdevSampler::open(path, 1) {
            Ok(mut sampler) => match sampler.configure() {
                Ok(()) => Some(sampler.meta()),
                Err(err) => {
                    log::debug!("probe {path}: configure failed: {err}");
                    None
                }
            },
            Err(err) => {
                log::debug!("probe {path}: open failed: {err}");
                None
            }
        }
    }
    #[cfg(not(target_os = "linux"))]
    {
        let _ = path;
        None
    }
}

/// Open and configure a sampler for a session.
pub fn open_sampler(
    path: &str,
    slot_capacity: usize,
) -> Result<Box<dyn TouchSampler>, SamplerError> {
    #[cfg(target_os = "linux")]
    {
        let mut sampler = evdev_touch::EvdevSampler::open(path, slot_capacity)?;
        sampler.configure()?;
        Ok(Box::new(sampler))
    }
    #[cfg(not(target_os = "linux"))]
    {
        let _ = slot_capacity;
        Err(SamplerError::Open {
            path: path.to_string(),
            source: std::io::Error::new(
                std::io::ErrorKind::Unsupported,
                "no touch backend for this platform",
            ),
        })
    }
}
