//! The sampling contract between sessions and hardware backends.
//!
//! A [`TouchSampler`] produces complete per-slot sample frames. Sessions
//! drive it from their worker thread; the enumeration probe opens one
//! briefly to validate a candidate path. Keeping the contract a trait keeps
//! session translation logic independent of the concrete backend (and
//! scriptable in tests).

use std::time::Duration;

/// One slot's sample within a frame.
///
/// `valid` marks slots that carry new data in this frame; invalid slots
/// must be skipped entirely by consumers. A lifted contact is reported as a
/// valid sample with zero pressure.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TouchSample {
    pub x: i32,
    pub y: i32,
    pub pressure: i32,
    pub valid: bool,
}

/// Outcome of a bounded frame read.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReadStatus {
    /// `out` holds a complete frame.
    Frame,
    /// No frame arrived within the timeout; `out` is untouched.
    TimedOut,
}

/// Backend-level failures.
#[derive(Debug, thiserror::Error)]
pub enum SamplerError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: String,
        source: std::io::Error,
    },

    /// The configure step found no usable multi-touch protocol.
    #[error("{path} is not a multi-touch device")]
    NotMultitouch { path: String },

    #[error("device read failed: {0}")]
    Read(#[from] std::io::Error),
}

/// A configured source of multi-touch sample frames.
pub trait TouchSampler: Send {
    /// Validate and prepare the device. Must be called once before the
    /// first [`read_frame`](Self::read_frame); a probe calls it and drops
    /// the sampler.
    fn configure(&mut self) -> Result<(), SamplerError>;

    /// Wait up to `timeout` for one complete frame covering at most
    /// `out.len()` slots.
    ///
    /// Returns [`ReadStatus::TimedOut`] when the deadline passes without a
    /// frame so callers can re-check their stop condition. Any error means
    /// the sample stream is over.
    fn read_frame(
        &mut self,
        out: &mut [TouchSample],
        timeout: Duration,
    ) -> Result<ReadStatus, SamplerError>;
}
