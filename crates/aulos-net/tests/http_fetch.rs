#![forbid(unsafe_code)]

use std::{
    sync::{
        atomic::{AtomicU32, Ordering},
        Arc,
    },
    time::Duration,
};

use aulos_net::{HttpClient, Net, NetExt, NetOptions, RetryPolicy};
use aulos_test_utils::TestHttpServer;
use axum::{extract::State, http::StatusCode, routing::get, Router};

const SEGMENT: &[u8] = &[0xAB; 4096];

fn origin() -> Router {
    Router::new()
        .route("/seg_360p.mp4", get(|| async { SEGMENT.to_vec() }))
        .route(
            "/missing.mp4",
            get(|| async { (StatusCode::NOT_FOUND, "no such segment") }),
        )
}

#[tokio::test]
async fn get_bytes_returns_payload() {
    let server = TestHttpServer::new(origin()).await;
    let client = HttpClient::new(NetOptions::default());

    let bytes = client.get_bytes(server.url("/seg_360p.mp4")).await.unwrap();
    assert_eq!(bytes.len(), SEGMENT.len());
}

#[tokio::test]
async fn non_success_status_is_an_error() {
    let server = TestHttpServer::new(origin()).await;
    let client = HttpClient::new(NetOptions::default());

    let err = client.get_bytes(server.url("/missing.mp4")).await.unwrap_err();
    assert_eq!(err.status_code(), Some(404));
}

#[tokio::test]
async fn timed_fetch_measures_a_real_transfer() {
    let server = TestHttpServer::new(origin()).await;
    let client = HttpClient::new(NetOptions::default());

    let timing = client.get_timed(server.url("/seg_360p.mp4")).await.unwrap();
    assert_eq!(timing.len(), SEGMENT.len() as u64);
    assert!(timing.elapsed > Duration::ZERO);
}

#[tokio::test]
async fn retry_layer_recovers_from_transient_server_errors() {
    let hits = Arc::new(AtomicU32::new(0));
    let router = Router::new()
        .route(
            "/flaky.mp4",
            get(|State(hits): State<Arc<AtomicU32>>| async move {
                if hits.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(StatusCode::SERVICE_UNAVAILABLE)
                } else {
                    Ok(SEGMENT.to_vec())
                }
            }),
        )
        .with_state(hits.clone());
    let server = TestHttpServer::new(router).await;

    let policy = RetryPolicy::new(3, Duration::from_millis(1), Duration::from_millis(4));
    let client = HttpClient::new(NetOptions::default()).with_retry(policy);

    let timing = client.get_timed(server.url("/flaky.mp4")).await.unwrap();
    assert_eq!(timing.len(), SEGMENT.len() as u64);
    assert_eq!(hits.load(Ordering::SeqCst), 3);
}
