use std::collections::VecDeque;

use crate::types::{EstimatorOptions, ThroughputSample};

/// Trait for throughput estimation strategies.
///
/// The session driver is generic over this seam, so alternative policies
/// (or test doubles) can replace the default EWMA estimator.
pub trait Estimator {
    /// Smoothed throughput estimate in bits per second, or `None` before the
    /// first sample has been observed.
    fn estimate_bps(&self) -> Option<u64>;

    /// Record a new throughput observation.
    fn push_sample(&mut self, sample: ThroughputSample);

    /// Forget all history (for example after a long stall that makes old
    /// measurements meaningless).
    fn reset(&mut self);
}

/// EWMA throughput estimator over a short rolling sample history.
///
/// Keeps the instantaneous rates of the last `window` samples and reports an
/// exponentially-weighted moving average across them, seeded from the oldest
/// retained rate: `e_t = alpha * inst_t + (1 - alpha) * e_{t-1}`. A single
/// unsmoothed measurement can swing wildly on small segments or TCP
/// slow-start; the window damps that while still letting stale rates age out
/// completely.
///
/// State is one instance per streaming session. Never share an instance
/// across unrelated sessions: their transfers would corrupt each other's
/// history.
#[derive(Clone, Debug)]
pub struct ThroughputEstimator {
    opts: EstimatorOptions,
    /// Instantaneous rates (bits/sec) of the most recent samples, oldest first.
    rates: VecDeque<f64>,
}

impl ThroughputEstimator {
    #[must_use]
    pub fn new(opts: EstimatorOptions) -> Self {
        let capacity = opts.window.max(1);
        Self {
            opts,
            rates: VecDeque::with_capacity(capacity),
        }
    }

    /// Record a sample. Invalid timing is unrepresentable here: rejection
    /// happens in [`ThroughputSample::new`], so every sample that reaches the
    /// estimator divides cleanly.
    pub fn push_sample(&mut self, sample: ThroughputSample) {
        let bps = sample.instantaneous_bps();
        self.rates.push_back(bps);
        while self.rates.len() > self.opts.window.max(1) {
            self.rates.pop_front();
        }
        tracing::debug!(
            bytes = sample.bytes(),
            elapsed_ms = sample.elapsed().as_millis() as u64,
            instantaneous_bps = bps,
            history_len = self.rates.len(),
            "throughput sample recorded"
        );
    }

    /// Smoothed estimate in bits per second, `None` before the first sample.
    ///
    /// Never negative and never NaN: every retained rate is finite and
    /// non-negative, and the EWMA is a convex combination of them.
    #[must_use]
    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    // estimate is finite and non-negative by construction
    pub fn estimate_bps(&self) -> Option<u64> {
        let mut rates = self.rates.iter();
        let seed = *rates.next()?;
        let smoothed = rates.fold(seed, |acc, &rate| {
            self.opts.alpha * rate + (1.0 - self.opts.alpha) * acc
        });
        Some(smoothed.round() as u64)
    }

    /// Drop all retained samples.
    pub fn reset(&mut self) {
        self.rates.clear();
    }
}

impl Estimator for ThroughputEstimator {
    fn estimate_bps(&self) -> Option<u64> {
        self.estimate_bps()
    }

    fn push_sample(&mut self, sample: ThroughputSample) {
        self.push_sample(sample);
    }

    fn reset(&mut self) {
        self.reset();
    }
}
