#![cfg(target_os = "linux")]

//! Linux evdev multi-touch sampler.
//!
//! [`EvdevSampler`] reads a `/dev/input/eventN` node through the `evdev`
//! crate and assembles protocol-B multi-touch events into per-slot sample
//! frames:
//! - `ABS_MT_SLOT` selects the slot subsequent events apply to
//! - `ABS_MT_TRACKING_ID` marks contact down (id >= 0) and lift (-1)
//! - `ABS_MT_POSITION_X`/`ABS_MT_POSITION_Y` update the slot position
//! - `ABS_MT_PRESSURE` updates pressure where the panel reports it; panels
//!   without a pressure axis get a synthetic full-scale value while a
//!   contact is down
//! - `SYN_REPORT` delimits a frame
//!
//! The device fd is switched to non-blocking at open; reads are bounded by
//! poll(2) so a session's worker can re-check its stop flag on a timeout
//! instead of parking inside the kernel indefinitely.

use crate::metadata::DeviceMeta;
use crate::sampler::{ReadStatus, SamplerError, TouchSample, TouchSampler};
use evdev::{AbsoluteAxisCode, BusType, Device, EventType, SynchronizationCode};
use std::io;
use std::os::fd::{AsRawFd, RawFd};
use std::time::{Duration, Instant};

/// Pressure reported for held contacts on panels without `ABS_MT_PRESSURE`.
const SYNTHETIC_PRESSURE: i32 = 255;

/// Per-slot decode state accumulated between frames.
#[derive(Clone, Copy, Default)]
struct SlotDecode {
    x: i32,
    y: i32,
    pressure: i32,
    touching: bool,
    /// Slot saw an update since the last emitted frame.
    dirty: bool,
}

pub struct EvdevSampler {
    device: Device,
    path: String,
    slots: Vec<SlotDecode>,
    current_slot: usize,
    has_pressure: bool,
}

impl EvdevSampler {
    /// Open a device node, tracking up to `slot_capacity` contacts.
    pub fn open(path: &str, slot_capacity: usize) -> Result<Self, SamplerError> {
        let device = Device::open(path).map_err(|source| SamplerError::Open {
            path: path.to_string(),
            source,
        })?;

        set_nonblocking(device.as_raw_fd()).map_err(|source| SamplerError::Open {
            path: path.to_string(),
            source,
        })?;

        Ok(Self {
            device,
            path: path.to_string(),
            slots: vec![SlotDecode::default(); slot_capacity],
            current_slot: 0,
            has_pressure: false,
        })
    }

    /// Metadata snapshot from the kernel-reported identity.
    pub fn meta(&self) -> DeviceMeta {
        let id = self.device.input_id();
        DeviceMeta {
            path: self.path.clone(),
            name: self.device.name().map(str::to_string),
            phys: self.device.physical_path().map(str::to_string),
            bus: Some(bus_name(id.bus_type()).to_string()),
            vendor_id: Some(id.vendor()),
            product_id: Some(id.product()),
        }
    }

    /// Copy decoded slot states into `out`, consuming the dirty marks.
    fn emit(&mut self, out: &mut [TouchSample]) {
        for (slot, sample) in self.slots.iter_mut().zip(out.iter_mut()) {
            let pressure = if self.has_pressure {
                if slot.touching { slot.pressure } else { 0 }
            } else if slot.touching {
                SYNTHETIC_PRESSURE
            } else {
                0
            };
            *sample = TouchSample {
                x: slot.x,
                y: slot.y,
                pressure,
                valid: slot.dirty,
            };
            slot.dirty = false;
        }
    }
}

impl TouchSampler for EvdevSampler {
    /// Verify the node speaks protocol-B multi-touch.
    fn configure(&mut self) -> Result<(), SamplerError> {
        let has_abs = self.device.supported_events().contains(EventType::ABSOLUTE);
        let axes = self.device.supported_absolute_axes();
        let has_mt = axes.as_ref().map_or(false, |a| {
            a.contains(AbsoluteAxisCode::ABS_MT_SLOT)
                && a.contains(AbsoluteAxisCode::ABS_MT_POSITION_X)
                && a.contains(AbsoluteAxisCode::ABS_MT_POSITION_Y)
        });
        if !has_abs || !has_mt {
            return Err(SamplerError::NotMultitouch {
                path: self.path.clone(),
            });
        }

        self.has_pressure = axes
            .as_ref()
            .map_or(false, |a| a.contains(AbsoluteAxisCode::ABS_MT_PRESSURE));

        Ok(())
    }

    fn read_frame(
        &mut self,
        out: &mut [TouchSample],
        timeout: Duration,
    ) -> Result<ReadStatus, SamplerError> {
        let deadline = Instant::now() + timeout;

        loop {
            let now = Instant::now();
            if now >= deadline {
                return Ok(ReadStatus::TimedOut);
            }
            if !wait_readable(self.device.as_raw_fd(), deadline - now)? {
                return Ok(ReadStatus::TimedOut);
            }

            let mut frame_complete = false;
            match self.device.fetch_events() {
                Ok(events) => {
                    for ev in events {
                        fold_event(
                            &mut self.slots,
                            &mut self.current_slot,
                            ev.event_type(),
                            ev.code(),
                            ev.value(),
                            &mut frame_complete,
                        );
                    }
                }
                // poll can wake us spuriously; wait again with what's left.
                Err(err) if err.kind() == io::ErrorKind::WouldBlock => continue,
                Err(err) => return Err(SamplerError::Read(err)),
            }

            if frame_complete {
                self.emit(out);
                return Ok(ReadStatus::Frame);
            }
        }
    }
}

/// Fold one kernel event into the slot decode state.
fn fold_event(
    slots: &mut [SlotDecode],
    current_slot: &mut usize,
    event_type: EventType,
    code: u16,
    value: i32,
    frame_complete: &mut bool,
) {
    if event_type == EventType::SYNCHRONIZATION {
        if code == SynchronizationCode::SYN_REPORT.0 {
            *frame_complete = true;
        }
        return;
    }
    if event_type != EventType::ABSOLUTE {
        return;
    }

    match AbsoluteAxisCode(code) {
        AbsoluteAxisCode::ABS_MT_SLOT => {
            *current_slot = value.max(0) as usize;
        }
        AbsoluteAxisCode::ABS_MT_TRACKING_ID => {
            if let Some(slot) = slots.get_mut(*current_slot) {
                slot.touching = value >= 0;
                if !slot.touching {
                    slot.pressure = 0;
                }
                slot.dirty = true;
            }
        }
        AbsoluteAxisCode::ABS_MT_POSITION_X => {
            if let Some(slot) = slots.get_mut(*current_slot) {
                slot.x = value;
                slot.dirty = true;
            }
        }
        AbsoluteAxisCode::ABS_MT_POSITION_Y => {
            if let Some(slot) = slots.get_mut(*current_slot) {
                slot.y = value;
                slot.dirty = true;
            }
        }
        AbsoluteAxisCode::ABS_MT_PRESSURE => {
            if let Some(slot) = slots.get_mut(*current_slot) {
                slot.pressure = value;
                slot.dirty = true;
            }
        }
        _ => {}
    }
}

fn bus_name(bus: BusType) -> &'static str {
    if bus == BusType::BUS_USB {
        "usb"
    } else if bus == BusType::BUS_BLUETOOTH {
        "bluetooth"
    } else if bus == BusType::BUS_I2C {
        "i2c"
    } else if bus == BusType::BUS_SPI {
        "spi"
    } else if bus == BusType::BUS_HOST {
        "host"
    } else {
        "other"
    }
}

fn set_nonblocking(fd: RawFd) -> io::Result<()> {
    // SAFETY: plain fcntl on a fd we own; no memory is passed.
    let flags = unsafe { libc::fcntl(fd, libc::F_GETFL) };
    if flags < 0 {
        return Err(io::Error::last_os_error());
    }
    let rc = unsafe { libc::fcntl(fd, libc::F_SETFL, flags | libc::O_NONBLOCK) };
    if rc < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

/// poll(2) the fd for readability, bounded by `timeout`.
///
/// `Ok(false)` means the timeout elapsed. Error or hangup conditions on the
/// fd are reported as errors so callers treat the stream as over.
fn wait_readable(fd: RawFd, timeout: Duration) -> io::Result<bool> {
    let mut pfd = libc::pollfd {
        fd,
        events: libc::POLLIN,
        revents: 0,
    };
    let ms = timeout.as_millis().clamp(1, i32::MAX as u128) as libc::c_int;

    loop {
        // SAFETY: pfd outlives the call and nfds matches.
        let rc = unsafe { libc::poll(&mut pfd, 1, ms) };
        if rc < 0 {
            let err = io::Error::last_os_error();
            if err.kind() == io::ErrorKind::Interrupted {
                continue;
            }
            return Err(err);
        }
        if rc == 0 {
            return Ok(false);
        }
        if pfd.revents & (libc::POLLERR | libc::POLLHUP | libc::POLLNVAL) != 0 {
            return Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "device stream closed",
            ));
        }
        return Ok(true);
    }
}
