use async_trait::async_trait;
use bytes::Bytes;
use tokio::time::sleep;
use url::Url;

use crate::{
    error::{NetError, NetResult},
    traits::Net,
    types::{FetchTiming, RetryPolicy},
};

/// Retry decorator for [`Net`] implementations.
///
/// Retries retryable failures with exponential backoff. Non-retryable errors
/// (4xx other than 408/429) surface immediately.
pub struct RetryNet<N> {
    inner: N,
    policy: RetryPolicy,
}

impl<N: Net> RetryNet<N> {
    pub fn new(inner: N, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    fn give_up(&self, error: NetError) -> NetError {
        if error.is_retryable() {
            NetError::RetryExhausted {
                max_retries: self.policy.max_retries,
                source: Box::new(error),
            }
        } else {
            error
        }
    }
}

#[async_trait]
impl<N: Net> Net for RetryNet<N> {
    async fn get_bytes(&self, url: Url) -> NetResult<Bytes> {
        let mut attempt = 0;
        loop {
            match self.inner.get_bytes(url.clone()).await {
                Ok(bytes) => return Ok(bytes),
                Err(error) => {
                    if !error.is_retryable() || attempt >= self.policy.max_retries {
                        return Err(self.give_up(error));
                    }
                    attempt += 1;
                    let delay = self.policy.delay_for_attempt(attempt);
                    tracing::debug!(%url, attempt, ?delay, %error, "retrying fetch");
                    sleep(delay).await;
                }
            }
        }
    }

    // Each attempt is timed individually by the inner client, so a slow
    // failing attempt never inflates the elapsed reported for the one that
    // eventually succeeds.
    async fn get_timed(&self, url: Url) -> NetResult<FetchTiming> {
        let mut attempt = 0;
        loop {
            match self.inner.get_timed(url.clone()).await {
                Ok(timing) => return Ok(timing),
                Err(error) => {
                    if !error.is_retryable() || attempt >= self.policy.max_retries {
                        return Err(self.give_up(error));
                    }
                    attempt += 1;
                    let delay = self.policy.delay_for_attempt(attempt);
                    tracing::debug!(%url, attempt, ?delay, %error, "retrying timed fetch");
                    sleep(delay).await;
                }
            }
        }
    }
}
