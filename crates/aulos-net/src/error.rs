use thiserror::Error;

/// Centralized error type for aulos-net.
#[derive(Debug, Error, Clone)]
pub enum NetError {
    /// Transport-level failure (connect, reset, body read).
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// The server answered with a non-success status.
    #[error("HTTP {status} for URL: {url}")]
    HttpStatus { status: u16, url: String },

    /// The request exceeded its configured timeout.
    #[error("request timed out")]
    Timeout,

    /// A retryable failure persisted through every allowed attempt.
    #[error("request failed after {max_retries} retries: {source}")]
    RetryExhausted {
        max_retries: u32,
        source: Box<NetError>,
    },
}

impl NetError {
    /// Whether a retry could plausibly succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            // Transport failures (connection refused/reset, truncated body)
            // are transient more often than not.
            NetError::Http(_) | NetError::Timeout => true,
            // 5xx server errors, 429 Too Many Requests, 408 Request Timeout.
            NetError::HttpStatus { status, .. } => {
                *status >= 500 || *status == 429 || *status == 408
            }
            NetError::RetryExhausted { .. } => false,
        }
    }

    /// HTTP status code, when the server produced one.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            NetError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for NetError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else {
            Self::Http(error.to_string())
        }
    }
}

pub type NetResult<T> = Result<T, NetError>;
