//! End-to-end tests over a real TCP listener.
//!
//! These prove the gate sees the actual peer address when the router is
//! served with `into_make_service_with_connect_info`. Every request comes
//! from `127.0.0.1`.
//!
//! Run with: `cargo test --test server_tests`
#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::net::SocketAddr;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde_json::Value;
use tokio::net::TcpListener;

use proxy_gate::{AppState, Config, build_router};

/// Start the application on an ephemeral port and return its base URL.
async fn spawn_app(use_proxy: bool, trusted_proxies: &[&str]) -> String {
    let config = Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        use_proxy,
        trusted_proxies: trusted_proxies.iter().map(|s| (*s).to_string()).collect(),
        ..Config::default()
    };

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to ephemeral port");
    let addr = listener.local_addr().expect("Failed to get local address");
    let app = build_router(AppState::new(config));

    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .expect("Server failed");
    });

    format!("http://{addr}")
}

fn client() -> Client {
    Client::builder()
        .timeout(Duration::from_secs(10))
        .no_proxy()
        .build()
        .expect("Failed to create HTTP client")
}

#[tokio::test]
async fn test_trusted_loopback_proxy_reaches_handler() {
    let base_url = spawn_app(true, &["127.0.0.1"]).await;

    let resp = client()
        .get(format!("{base_url}/"))
        .header("X-Forwarded-For", "203.0.113.7")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["forwarded_for"], "203.0.113.7");
    assert_eq!(body["trusted"], true);
}

#[tokio::test]
async fn test_loopback_subnet_is_trusted() {
    let base_url = spawn_app(true, &["bogus", "127.0.0.0/8"]).await;

    let resp = client()
        .get(format!("{base_url}/health"))
        .header("X-Forwarded-For", "203.0.113.7")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["use_proxy"], true);
}

#[tokio::test]
async fn test_untrusted_peer_is_rejected() {
    let base_url = spawn_app(true, &["10.0.0.0/8"]).await;

    let resp = client()
        .get(format!("{base_url}/"))
        .header("X-Forwarded-For", "203.0.113.7")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(resp.text().await.unwrap(), "Untrusted proxy");
}

#[tokio::test]
async fn test_missing_header_with_proxy_expected_is_rejected() {
    let base_url = spawn_app(true, &["127.0.0.1"]).await;

    let resp = client().get(format!("{base_url}/")).send().await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        resp.text().await.unwrap(),
        "Expected a proxy: X-Forwarded-For empty"
    );
}

#[tokio::test]
async fn test_direct_mode_rejects_forwarded_header() {
    let base_url = spawn_app(false, &[]).await;

    let resp = client()
        .get(format!("{base_url}/"))
        .header("X-Forwarded-For", "100.100.100.100")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        resp.text().await.unwrap(),
        "Detected proxy: but application is not configured to use one"
    );
}

#[tokio::test]
async fn test_direct_mode_without_header_reaches_handler() {
    let base_url = spawn_app(false, &[]).await;

    let resp = client().get(format!("{base_url}/")).send().await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["forwarded_for"], Value::Null);
    assert_eq!(body["trusted"], false);
}
