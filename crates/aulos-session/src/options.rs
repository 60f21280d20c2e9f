use aulos_abr::EstimatorOptions;
use aulos_net::NetOptions;
use url::Url;

/// What to do when no representation qualifies under the current estimate.
///
/// `Ok(None)` from selection is an expected outcome, not a fault; this policy
/// decides the driver's response.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FallbackPolicy {
    /// Fetch the cheapest tier anyway to avoid stalling playback.
    #[default]
    LowestTier,
    /// Fetch nothing and report the miss to the caller.
    Abort,
}

/// Configuration for a streaming session.
#[derive(Clone, Debug)]
pub struct SessionOptions {
    /// Manifest URL.
    pub manifest_url: Url,
    /// Bandwidth estimator tuning.
    pub estimator: EstimatorOptions,
    /// Multiplier applied to each representation's bandwidth requirement
    /// before comparing it with the estimate. Values above 1.0 absorb
    /// estimation noise.
    pub safety_margin: f64,
    /// Response to the no-qualifying-representation outcome.
    pub fallback: FallbackPolicy,
    /// Network configuration for the default HTTP client.
    pub net: NetOptions,
}

impl SessionOptions {
    /// Create session config for a manifest URL.
    pub fn new(manifest_url: Url) -> Self {
        Self {
            manifest_url,
            estimator: EstimatorOptions::default(),
            safety_margin: 1.2,
            fallback: FallbackPolicy::default(),
            net: NetOptions::default(),
        }
    }

    /// Set estimator tuning.
    #[must_use]
    pub fn with_estimator(mut self, estimator: EstimatorOptions) -> Self {
        self.estimator = estimator;
        self
    }

    /// Set the selection safety margin.
    #[must_use]
    pub fn with_safety_margin(mut self, safety_margin: f64) -> Self {
        self.safety_margin = safety_margin;
        self
    }

    /// Set the fallback policy.
    #[must_use]
    pub fn with_fallback(mut self, fallback: FallbackPolicy) -> Self {
        self.fallback = fallback;
        self
    }

    /// Set network options.
    #[must_use]
    pub fn with_net(mut self, net: NetOptions) -> Self {
        self.net = net;
        self
    }
}
