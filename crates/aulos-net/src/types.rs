use std::{
    cmp::min,
    time::{Duration, Instant},
};

use bytes::Bytes;

/// Result of a timed fetch: the payload plus how long the transfer took.
///
/// This is the raw material of bandwidth estimation. `elapsed` is wall-clock
/// time of the successful transfer only; retried attempts never contribute.
#[derive(Clone, Debug)]
pub struct FetchTiming {
    pub bytes: Bytes,
    pub elapsed: Duration,
}

impl FetchTiming {
    /// Measure `elapsed` for a payload fetched starting at `started`.
    #[must_use]
    pub fn measured_from(bytes: Bytes, started: Instant) -> Self {
        Self {
            bytes,
            elapsed: started.elapsed(),
        }
    }

    /// Payload size in bytes.
    #[must_use]
    pub fn len(&self) -> u64 {
        self.bytes.len() as u64
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Exponential-backoff retry schedule.
#[derive(Clone, Debug)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    #[must_use]
    pub fn new(max_retries: u32, base_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
            max_delay,
        }
    }

    /// Delay before the given attempt (attempt 0 is the initial try).
    #[must_use]
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }
        let exponential_delay = self.base_delay * 2_u32.pow(attempt.saturating_sub(1));
        min(exponential_delay, self.max_delay)
    }
}

/// Configuration for [`HttpClient`](crate::HttpClient).
#[derive(Clone, Debug)]
pub struct NetOptions {
    pub request_timeout: Duration,
    pub retry_policy: RetryPolicy,
    /// Max idle connections per host. Set to 0 to disable pooling and reduce memory.
    pub pool_max_idle_per_host: usize,
}

impl Default for NetOptions {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            retry_policy: RetryPolicy::default(),
            pool_max_idle_per_host: 0,
        }
    }
}
