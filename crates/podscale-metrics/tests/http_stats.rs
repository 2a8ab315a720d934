//! HTTP stats source against a local stub media server.

use std::time::Duration;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use podscale_metrics::{HttpStatsSource, SessionSource, SessionStats};

/// Serve `router` on an ephemeral port and return its base URL.
async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

fn source(base_url: &str) -> HttpStatsSource {
    HttpStatsSource::new(base_url, Duration::from_millis(500)).unwrap()
}

#[tokio::test]
async fn reads_room_and_participant_counts() {
    let base = serve(Router::new().route(
        "/stats",
        get(|| async { r#"{"num_rooms": 42, "num_participants": 97}"# }),
    ))
    .await;

    let stats = source(&base).fetch().await;
    assert_eq!(
        stats,
        SessionStats {
            active_sessions: 42,
            participants: 97,
        }
    );
}

#[tokio::test]
async fn non_200_reads_as_zero() {
    let base = serve(Router::new().route(
        "/stats",
        get(|| async { (StatusCode::SERVICE_UNAVAILABLE, r#"{"num_rooms": 42}"#) }),
    ))
    .await;

    assert_eq!(source(&base).fetch().await, SessionStats::ZERO);
}

#[tokio::test]
async fn missing_endpoint_reads_as_zero() {
    let base = serve(Router::new()).await;
    assert_eq!(source(&base).fetch().await, SessionStats::ZERO);
}

#[tokio::test]
async fn malformed_body_reads_as_zero() {
    let base = serve(Router::new().route("/stats", get(|| async { "not json" }))).await;
    assert_eq!(source(&base).fetch().await, SessionStats::ZERO);
}

#[tokio::test]
async fn slow_server_times_out_to_zero() {
    let base = serve(Router::new().route(
        "/stats",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            r#"{"num_rooms": 3}"#
        }),
    ))
    .await;

    assert_eq!(source(&base).fetch().await, SessionStats::ZERO);
}
