use thiserror::Error;

/// Errors produced by the ABR decision core.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AbrError {
    /// A throughput sample carried timing that cannot be divided by.
    ///
    /// Always a caller bug (for example treating a timed-out transfer as a
    /// zero-duration one); never retried here.
    #[error("invalid throughput sample: {0}")]
    InvalidSample(String),

    /// The manifest declared no representations at all.
    ///
    /// Distinct from "no representation qualifies", which is the normal
    /// `Ok(None)` outcome of [`select`](crate::select).
    #[error("manifest contains no representations")]
    EmptyManifest,
}

pub type AbrResult<T> = Result<T, AbrError>;
