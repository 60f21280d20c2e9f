use std::time::Duration;

use crate::error::{AbrError, AbrResult};

/// One timed byte-transfer observation.
///
/// Construction validates the timing: a sample with zero elapsed time is
/// rejected with [`AbrError::InvalidSample`] rather than silently divided.
/// Negative byte counts and negative durations are unrepresentable by type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ThroughputSample {
    bytes: u64,
    elapsed: Duration,
}

impl ThroughputSample {
    /// Build a sample from transferred bytes and the wall-clock time the
    /// transfer took.
    ///
    /// # Errors
    ///
    /// Returns [`AbrError::InvalidSample`] when `elapsed` is zero.
    pub fn new(bytes: u64, elapsed: Duration) -> AbrResult<Self> {
        if elapsed.is_zero() {
            return Err(AbrError::InvalidSample(format!(
                "elapsed time must be positive, got {elapsed:?} for {bytes} bytes"
            )));
        }
        Ok(Self { bytes, elapsed })
    }

    /// Bytes transferred.
    #[must_use]
    pub fn bytes(&self) -> u64 {
        self.bytes
    }

    /// Transfer duration. Always positive.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Unsmoothed throughput of this single sample, in bits per second.
    ///
    /// Finite and non-negative for every constructible sample.
    #[must_use]
    #[expect(clippy::cast_precision_loss)] // bitrate precision loss is negligible for ABR
    pub fn instantaneous_bps(&self) -> f64 {
        (self.bytes as f64) * 8.0 / self.elapsed.as_secs_f64()
    }
}

/// Configuration for [`ThroughputEstimator`](crate::ThroughputEstimator).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EstimatorOptions {
    /// EWMA smoothing factor in `(0, 1]`. Higher values weigh the newest
    /// sample more (responsive); lower values favor history (stable).
    pub alpha: f64,
    /// Number of most recent samples retained, at least 1. Older samples
    /// fall out of the estimate entirely.
    pub window: usize,
}

impl Default for EstimatorOptions {
    fn default() -> Self {
        Self {
            alpha: 0.5,
            window: 4,
        }
    }
}

/// Source of representation bandwidth requirements for selection.
///
/// Abstracts the selector from any concrete manifest schema. Index order must
/// be the manifest's declared order; it is the tie-break order for
/// [`select`](crate::select).
pub trait RepresentationSource {
    /// Total number of declared representations.
    fn representation_count(&self) -> usize;

    /// Required sustained bitrate (bits per second) of the representation at
    /// `index`, or `None` if the index is out of bounds.
    fn representation_bandwidth(&self, index: usize) -> Option<u64>;
}

// Bare bandwidth lists act as a source, mainly for tests and benches.
impl RepresentationSource for [u64] {
    fn representation_count(&self) -> usize {
        self.len()
    }

    fn representation_bandwidth(&self, index: usize) -> Option<u64> {
        self.get(index).copied()
    }
}

impl RepresentationSource for Vec<u64> {
    fn representation_count(&self) -> usize {
        self.as_slice().representation_count()
    }

    fn representation_bandwidth(&self, index: usize) -> Option<u64> {
        self.as_slice().representation_bandwidth(index)
    }
}
