use std::time::Instant;

use async_trait::async_trait;
use bytes::Bytes;
#[cfg(test)]
use mockall::automock;
use url::Url;

use crate::{
    error::NetResult,
    retry::RetryNet,
    types::{FetchTiming, RetryPolicy},
};

/// Generic byte-fetch collaborator.
///
/// The decision core treats any failure here as "no sample available for this
/// attempt"; implementations must never report a zero-duration transfer in
/// place of an error.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Net: Send + Sync {
    /// Fetch all bytes from a URL.
    async fn get_bytes(&self, url: Url) -> NetResult<Bytes>;

    /// Fetch all bytes from a URL and measure the transfer.
    ///
    /// The default implementation times a single [`get_bytes`](Net::get_bytes)
    /// call. Decorators that add attempts (retry) override this so the
    /// reported elapsed covers only the transfer that succeeded.
    async fn get_timed(&self, url: Url) -> NetResult<FetchTiming> {
        let started = Instant::now();
        let bytes = self.get_bytes(url).await?;
        Ok(FetchTiming::measured_from(bytes, started))
    }
}

pub trait NetExt: Net + Sized {
    /// Add a retry layer with exponential backoff.
    fn with_retry(self, policy: RetryPolicy) -> RetryNet<Self> {
        RetryNet::new(self, policy)
    }
}

impl<T: Net> NetExt for T {}
