//! HTTP fetch layer for the aulos streaming client.
//!
//! Implements the two primitives the decision core consumes but never owns:
//! fetching a resource's bytes, and fetching them *timed* so the transfer can
//! feed bandwidth estimation. Retry/backoff policy lives here too — the core
//! performs no retries, and a failed fetch surfaces as an error, never as a
//! fabricated zero-duration sample.

#![forbid(unsafe_code)]

mod client;
mod error;
mod retry;
mod traits;
mod types;

pub use crate::{
    client::HttpClient,
    error::{NetError, NetResult},
    retry::RetryNet,
    traits::{Net, NetExt},
    types::{FetchTiming, NetOptions, RetryPolicy},
};
