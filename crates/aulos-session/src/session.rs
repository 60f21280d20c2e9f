use aulos_abr::{select, Estimator, ThroughputEstimator, ThroughputSample};
use aulos_manifest::Manifest;
use aulos_net::{FetchTiming, HttpClient, Net, NetExt, RetryNet};
use tracing::{debug, info, warn};

use crate::{
    error::SessionResult,
    options::{FallbackPolicy, SessionOptions},
};

/// The representation chosen for one segment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectedRepresentation {
    /// Position in the manifest's declared order.
    pub index: usize,
    pub id: String,
    /// Required sustained bitrate in bits per second.
    pub bandwidth: u64,
}

/// Outcome of one iteration of the streaming loop.
#[derive(Clone, Debug)]
pub struct SegmentReport {
    /// Zero-based segment counter within this session.
    pub segment_index: usize,
    /// The estimate this decision was made under, bits per second.
    pub estimate_bps: u64,
    /// The chosen representation, or `None` when nothing qualified and the
    /// fallback policy is [`FallbackPolicy::Abort`].
    pub selected: Option<SelectedRepresentation>,
    /// Whether `selected` came from the fallback policy rather than a
    /// qualifying tier.
    pub fallback_applied: bool,
    /// Payload and timing of the segment fetch, `None` when nothing was
    /// fetched. Persisting the bytes is the caller's business.
    pub fetched: Option<FetchTiming>,
}

/// One adaptive streaming session over a single manifest.
///
/// Owns the bandwidth estimator, so independent sessions never contaminate
/// each other's measurements. Generic over the fetch collaborator and the
/// estimation strategy.
#[derive(Debug)]
pub struct Session<N: Net, E: Estimator = ThroughputEstimator> {
    net: N,
    manifest: Manifest,
    estimator: E,
    opts: SessionOptions,
    segment_index: usize,
}

impl<N: Net> Session<N> {
    /// Fetch and decode the manifest, readying the session with the default
    /// EWMA estimator.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Net`](crate::SessionError::Net) when the
    /// manifest fetch fails and
    /// [`SessionError::Manifest`](crate::SessionError::Manifest) when it does
    /// not decode to a non-empty manifest.
    pub async fn open(net: N, opts: SessionOptions) -> SessionResult<Self> {
        let estimator = ThroughputEstimator::new(opts.estimator);
        Self::open_with_estimator(net, estimator, opts).await
    }
}

impl Session<RetryNet<HttpClient>> {
    /// Open a session over a retrying HTTP client built from the session's
    /// network options.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Session::open`].
    pub async fn connect(opts: SessionOptions) -> SessionResult<Self> {
        let retry = opts.net.retry_policy.clone();
        let net = HttpClient::new(opts.net.clone()).with_retry(retry);
        Self::open(net, opts).await
    }
}

impl<N: Net, E: Estimator> Session<N, E> {
    /// [`Session::open`] with a caller-provided estimation strategy.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Session::open`].
    pub async fn open_with_estimator(
        net: N,
        estimator: E,
        opts: SessionOptions,
    ) -> SessionResult<Self> {
        let raw = net.get_bytes(opts.manifest_url.clone()).await?;
        let manifest = Manifest::from_json_bytes(&raw)?;
        info!(
            url = %opts.manifest_url,
            representations = manifest.representations().len(),
            "session opened"
        );
        Ok(Self {
            net,
            manifest,
            estimator,
            opts,
            segment_index: 0,
        })
    }

    /// The decoded manifest this session streams from.
    #[must_use]
    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Latest smoothed estimate, `None` before the first measurement.
    #[must_use]
    pub fn estimate_bps(&self) -> Option<u64> {
        self.estimator.estimate_bps()
    }

    /// Run one iteration of the loop: measure, estimate, select, fetch.
    ///
    /// The first call probes by timing a fetch of the first-listed
    /// representation's segment, since no measurement exists yet. Every
    /// fetched segment's timing becomes the sample behind the *next*
    /// decision.
    ///
    /// # Errors
    ///
    /// Fetch failures propagate as
    /// [`SessionError::Net`](crate::SessionError::Net); no sample is recorded
    /// for a failed transfer.
    pub async fn next_segment(&mut self) -> SessionResult<SegmentReport> {
        if self.estimator.estimate_bps().is_none() {
            // Manifest decode guarantees at least one representation.
            let probe_url = self.manifest.representations()[0].segment_url.clone();
            debug!(url = %probe_url, "probing bandwidth");
            let timing = self.net.get_timed(probe_url).await?;
            self.record_timing(&timing);
        }

        let estimate_bps = self.estimator.estimate_bps().unwrap_or(0);
        let choice = select(&self.manifest, estimate_bps, self.opts.safety_margin)?;

        let (index, fallback_applied) = match choice {
            Some(index) => (Some(index), false),
            None => match self.opts.fallback {
                FallbackPolicy::LowestTier => {
                    let lowest = self.manifest.lowest_bandwidth_index();
                    warn!(
                        estimate_bps,
                        lowest, "no representation qualifies, falling back to cheapest tier"
                    );
                    (Some(lowest), true)
                }
                FallbackPolicy::Abort => {
                    warn!(estimate_bps, "no representation qualifies, skipping fetch");
                    (None, false)
                }
            },
        };

        let segment_index = self.segment_index;
        self.segment_index += 1;

        let Some(index) = index else {
            return Ok(SegmentReport {
                segment_index,
                estimate_bps,
                selected: None,
                fallback_applied,
                fetched: None,
            });
        };

        // In range: select() and lowest_bandwidth_index() both stay inside
        // the manifest.
        let rep = &self.manifest.representations()[index];
        let selected = SelectedRepresentation {
            index,
            id: rep.id.clone(),
            bandwidth: rep.bandwidth,
        };
        info!(
            segment_index,
            estimate_bps,
            id = %selected.id,
            bandwidth = selected.bandwidth,
            fallback_applied,
            "representation selected"
        );

        let timing = self.net.get_timed(rep.segment_url.clone()).await?;
        self.record_timing(&timing);

        Ok(SegmentReport {
            segment_index,
            estimate_bps,
            selected: Some(selected),
            fallback_applied,
            fetched: Some(timing),
        })
    }

    fn record_timing(&mut self, timing: &FetchTiming) {
        match ThroughputSample::new(timing.len(), timing.elapsed) {
            Ok(sample) => self.estimator.push_sample(sample),
            // A zero-elapsed measurement cannot be divided into a rate.
            // Keep the previous estimate; the transfer itself still counts.
            Err(error) => warn!(%error, "discarding unusable timing"),
        }
    }
}
