//! Adaptive Bitrate (ABR) decision core.
//!
//! This crate turns noisy, per-transfer throughput measurements into a smoothed
//! bandwidth estimate and deterministically picks the representation (quality
//! tier) that estimate can sustain. It is protocol-agnostic: manifests are
//! exposed to the selector through the [`RepresentationSource`] trait, so the
//! same logic works over DASH, HLS, or any schema that yields an ordered list
//! of bandwidth requirements.
//!
//! Both halves are pure computations. The estimator owns the only state (a
//! short rolling sample history, one instance per streaming session); the
//! selector carries none.
//!
//! ## Example
//!
//! ```rust
//! use std::time::Duration;
//!
//! use aulos_abr::{select, EstimatorOptions, ThroughputEstimator, ThroughputSample};
//!
//! let mut estimator = ThroughputEstimator::new(EstimatorOptions::default());
//!
//! // 250 KB in one second = 2 Mbit/s.
//! let sample = ThroughputSample::new(250_000, Duration::from_secs(1)).unwrap();
//! estimator.push_sample(sample);
//! let estimate = estimator.estimate_bps().unwrap();
//!
//! // Highest tier the estimate can sustain, by declared order.
//! let bandwidths: Vec<u64> = vec![500_000, 1_000_000, 2_500_000];
//! let choice = select(&bandwidths, estimate, 1.0).unwrap();
//! assert_eq!(choice, Some(1));
//! ```

#![forbid(unsafe_code)]

mod error;
mod estimator;
mod selector;
mod types;

pub use error::{AbrError, AbrResult};
pub use estimator::{Estimator, ThroughputEstimator};
pub use selector::select;
pub use types::{EstimatorOptions, RepresentationSource, ThroughputSample};
