//! Manifest data model for the aulos streaming client.
//!
//! A manifest describes the quality tiers ("representations") one video is
//! encoded at. Decoding accepts the JSON shape served by the reference
//! manifest server:
//!
//! ```json
//! {
//!   "video": {
//!     "representations": [
//!       { "id": "360p", "bandwidth": 500000, "url": "http://host/seg_360p.mp4" }
//!     ]
//!   }
//! }
//! ```
//!
//! A decoded [`Manifest`] always holds at least one representation, and its
//! declared order is authoritative: it is the tie-break order the selector in
//! `aulos-abr` uses.

#![forbid(unsafe_code)]

use aulos_abr::RepresentationSource;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

/// Manifest decoding errors.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("manifest decode failed: {0}")]
    Decode(#[from] serde_json::Error),

    /// Structurally invalid: a manifest with nothing to select from.
    #[error("manifest declares no representations")]
    NoRepresentations,
}

pub type ManifestResult<T> = Result<T, ManifestError>;

/// One encoded quality tier.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct Representation {
    /// Opaque identifier, unique within the manifest.
    pub id: String,
    /// Required sustained bitrate in bits per second. This is the rate the
    /// tier demands from the network, not an estimate of what is available.
    pub bandwidth: u64,
    /// Locator for this tier's next media segment.
    #[serde(rename = "url")]
    pub segment_url: Url,
}

/// Ordered collection of representations for a single video track.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Manifest {
    representations: Vec<Representation>,
}

#[derive(Deserialize)]
struct ManifestDocument {
    video: VideoTrack,
}

#[derive(Deserialize)]
struct VideoTrack {
    representations: Vec<Representation>,
}

impl Manifest {
    /// Build a manifest from already-decoded representations.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::NoRepresentations`] for an empty list.
    pub fn new(representations: Vec<Representation>) -> ManifestResult<Self> {
        if representations.is_empty() {
            return Err(ManifestError::NoRepresentations);
        }
        Ok(Self { representations })
    }

    /// Decode a manifest from raw JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::Decode`] for malformed JSON and
    /// [`ManifestError::NoRepresentations`] for an empty representation list.
    pub fn from_json_bytes(bytes: &[u8]) -> ManifestResult<Self> {
        let document: ManifestDocument = serde_json::from_slice(bytes)?;
        Self::new(document.video.representations)
    }

    /// Representations in declared order. Never empty.
    #[must_use]
    pub fn representations(&self) -> &[Representation] {
        &self.representations
    }

    /// Representation at `index` in declared order.
    #[must_use]
    pub fn representation(&self, index: usize) -> Option<&Representation> {
        self.representations.get(index)
    }

    /// Look up a representation by its identifier.
    #[must_use]
    pub fn representation_by_id(&self, id: &str) -> Option<&Representation> {
        self.representations.iter().find(|rep| rep.id == id)
    }

    /// Index of the cheapest tier (minimum bandwidth, earliest on ties).
    /// The usual stall-avoidance fallback when nothing qualifies.
    #[must_use]
    pub fn lowest_bandwidth_index(&self) -> usize {
        let mut lowest = 0;
        for (index, rep) in self.representations.iter().enumerate() {
            if rep.bandwidth < self.representations[lowest].bandwidth {
                lowest = index;
            }
        }
        lowest
    }
}

impl RepresentationSource for Manifest {
    fn representation_count(&self) -> usize {
        self.representations.len()
    }

    fn representation_bandwidth(&self, index: usize) -> Option<u64> {
        self.representations.get(index).map(|rep| rep.bandwidth)
    }
}
