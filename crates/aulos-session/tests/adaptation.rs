#![forbid(unsafe_code)]

//! Deterministic end-to-end runs of the streaming loop against a scripted
//! fetch collaborator with fixed transfer timings.

use std::{collections::VecDeque, sync::Mutex, time::Duration};

use async_trait::async_trait;
use aulos_net::{FetchTiming, Net, NetError, NetResult};
use aulos_session::{FallbackPolicy, SegmentReport, Session, SessionError, SessionOptions};
use aulos_test_utils::manifest_json;
use bytes::Bytes;
use rstest::rstest;
use url::Url;

const MANIFEST_URL: &str = "http://origin.test/manifest.json";

fn three_tier_manifest() -> String {
    manifest_json(&[
        ("360p", 500_000, "http://origin.test/seg_360p.mp4"),
        ("720p", 1_500_000, "http://origin.test/seg_720p.mp4"),
        ("1080p", 4_000_000, "http://origin.test/seg_1080p.mp4"),
    ])
}

/// Fetch collaborator that serves a fixed manifest and replays scripted
/// `(bytes, elapsed)` transfer timings in order.
#[derive(Debug)]
struct ScriptedNet {
    manifest: String,
    timings: Mutex<VecDeque<(usize, Duration)>>,
}

impl ScriptedNet {
    fn new(manifest: String, timings: &[(usize, Duration)]) -> Self {
        Self {
            manifest,
            timings: Mutex::new(timings.iter().copied().collect()),
        }
    }

}

#[async_trait]
impl Net for ScriptedNet {
    async fn get_bytes(&self, url: Url) -> NetResult<Bytes> {
        if url.path().ends_with("manifest.json") {
            Ok(Bytes::from(self.manifest.clone()))
        } else {
            Err(NetError::HttpStatus {
                status: 404,
                url: url.to_string(),
            })
        }
    }

    async fn get_timed(&self, url: Url) -> NetResult<FetchTiming> {
        let (bytes, elapsed) = self
            .timings
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("no scripted timing left for {url}"));
        Ok(FetchTiming {
            bytes: Bytes::from(vec![0u8; bytes]),
            elapsed,
        })
    }
}

fn options(fallback: FallbackPolicy, safety_margin: f64) -> SessionOptions {
    SessionOptions::new(Url::parse(MANIFEST_URL).unwrap())
        .with_safety_margin(safety_margin)
        .with_fallback(fallback)
}

fn selected_bandwidth(report: &SegmentReport) -> u64 {
    report.selected.as_ref().expect("tier selected").bandwidth
}

#[tokio::test]
async fn improving_network_ratchets_quality_up() {
    let second = Duration::from_secs(1);
    // Probe, then one timing per fetched segment. Instantaneous rates:
    // 500 kbit/s, 1.5 Mbit/s, 4 Mbit/s, 4 Mbit/s.
    let net = ScriptedNet::new(
        three_tier_manifest(),
        &[
            (62_500, second),
            (187_500, second),
            (500_000, second),
            (500_000, second),
        ],
    );
    let mut session = Session::open(net, options(FallbackPolicy::Abort, 1.0))
        .await
        .unwrap();

    let mut reports = Vec::new();
    for _ in 0..3 {
        reports.push(session.next_segment().await.unwrap());
    }

    // EWMA with alpha 0.5 seeded from the probe: 500k, 1M, 2.5M.
    let estimates: Vec<u64> = reports.iter().map(|r| r.estimate_bps).collect();
    assert_eq!(estimates, [500_000, 1_000_000, 2_500_000]);
    assert!(estimates.windows(2).all(|pair| pair[0] < pair[1]));

    let bandwidths: Vec<u64> = reports.iter().map(selected_bandwidth).collect();
    assert_eq!(bandwidths, [500_000, 500_000, 1_500_000]);
    assert!(bandwidths.windows(2).all(|pair| pair[0] <= pair[1]));

    let ids: Vec<&str> = reports
        .iter()
        .map(|r| r.selected.as_ref().unwrap().id.as_str())
        .collect();
    assert_eq!(ids, ["360p", "360p", "720p"]);
}

#[rstest]
#[case::lowest_tier(FallbackPolicy::LowestTier)]
#[case::abort(FallbackPolicy::Abort)]
#[tokio::test]
async fn starved_network_honors_fallback_policy(#[case] policy: FallbackPolicy) {
    let second = Duration::from_secs(1);
    // 8 kbit/s: far below the cheapest tier.
    let net = ScriptedNet::new(three_tier_manifest(), &[(1_000, second), (1_000, second)]);
    let mut session = Session::open(net, options(policy, 1.2)).await.unwrap();

    let report = session.next_segment().await.unwrap();
    match policy {
        FallbackPolicy::LowestTier => {
            assert!(report.fallback_applied);
            let selected = report.selected.expect("fallback still selects a tier");
            assert_eq!(selected.id, "360p");
            assert_eq!(selected.index, 0);
            assert!(report.fetched.is_some());
        }
        FallbackPolicy::Abort => {
            assert!(report.selected.is_none());
            assert!(!report.fallback_applied);
            assert!(report.fetched.is_none());
            // Only the probe consumed a timing; the session keeps its
            // measurement for the next round.
            assert_eq!(session.estimate_bps(), Some(8_000));
        }
    }
}

#[tokio::test]
async fn probe_happens_only_once() {
    let second = Duration::from_secs(1);
    // Probe + three segment fetches: exactly four timed transfers.
    let net = ScriptedNet::new(
        three_tier_manifest(),
        &[
            (62_500, second),
            (62_500, second),
            (62_500, second),
            (62_500, second),
        ],
    );
    let mut session = Session::open(net, options(FallbackPolicy::Abort, 1.0))
        .await
        .unwrap();

    for expected_index in 0..3 {
        let SegmentReport { segment_index, .. } = session.next_segment().await.unwrap();
        assert_eq!(segment_index, expected_index);
    }
    // A fifth timed transfer would have panicked the scripted collaborator.
}

#[tokio::test]
async fn empty_manifest_fails_to_open() {
    let net = ScriptedNet::new(manifest_json(&[]), &[]);
    let err = Session::open(net, options(FallbackPolicy::Abort, 1.0))
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::Manifest(_)));
}

#[tokio::test]
async fn fetch_failure_surfaces_without_fabricating_a_sample() {
    struct FailingNet;

    #[async_trait]
    impl Net for FailingNet {
        async fn get_bytes(&self, url: Url) -> NetResult<Bytes> {
            if url.path().ends_with("manifest.json") {
                Ok(Bytes::from(three_tier_manifest()))
            } else {
                Err(NetError::Timeout)
            }
        }

        async fn get_timed(&self, _url: Url) -> NetResult<FetchTiming> {
            Err(NetError::Timeout)
        }
    }

    let mut session = Session::open(FailingNet, options(FallbackPolicy::Abort, 1.0))
        .await
        .unwrap();

    let err = session.next_segment().await.unwrap_err();
    assert!(matches!(err, SessionError::Net(NetError::Timeout)));
    // The failed probe produced no measurement.
    assert_eq!(session.estimate_bps(), None);
}
