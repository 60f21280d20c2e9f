//! Streaming session driver.
//!
//! Composes the workspace layers into the adaptive loop: fetch and decode the
//! manifest, then per segment — time a transfer, feed the measurement to the
//! estimator, select the representation the estimate can sustain, fetch it,
//! and reuse that transfer's timing for the next decision.
//!
//! The loop is strictly sequential: one fetch and one decision in flight, so
//! each estimate reflects the conditions observed while fetching the previous
//! segment. Every session owns its estimator; concurrent sessions never share
//! measurement state.

#![forbid(unsafe_code)]

mod error;
mod options;
mod session;

pub use error::{SessionError, SessionResult};
pub use options::{FallbackPolicy, SessionOptions};
pub use session::{SegmentReport, SelectedRepresentation, Session};
