//! Application routing configuration with middleware stack.
//!
//! # Middleware Stack (applied in order)
//!
//! ```text
//! Request
//!    │
//!    ▼
//! ┌──────────────────┐
//! │     Tracing      │ ← HTTP request/response logging
//! └────────┬─────────┘
//!          │
//!          ▼
//! ┌──────────────────┐
//! │   Proxy Trust    │ ← 400 if the proxy chain cannot be trusted
//! └────────┬─────────┘
//!          │
//!          ▼
//!      Handler
//! ```
//!
//! Tracing wraps the gate so rejected requests are logged too.
//!
//! # Routes
//!
//! - `GET /` - Echo of the forwarded-for value the application received
//! - `GET /health` - Liveness (gated like everything else)

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::handlers;
use crate::middleware::{PlainTextReporter, ProxyTrustLayer, RejectionReporter};
use crate::state::AppState;

/// Build the application router with the default plain-text reporter.
pub fn build_router(state: AppState) -> Router {
    build_router_with_reporter(state, PlainTextReporter)
}

/// Build the application router with a custom rejection reporter.
///
/// The gate is always built from `state.config`, so the handlers and the
/// gate agree on whether a proxy is in use.
pub fn build_router_with_reporter<R: RejectionReporter>(state: AppState, reporter: R) -> Router {
    let gate = ProxyTrustLayer::from_config(state.config.proxy_trust(), reporter);
    info!(
        use_proxy = gate.config().use_proxy,
        trusted_proxies = gate.config().trusted_proxies.len(),
        "Proxy trust gate configured"
    );

    Router::new()
        .route("/", get(handlers::forwarded_for))
        .route("/health", get(handlers::health_check))
        .layer(gate)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::middleware::RemoteAddr;
    use axum::body::Body;
    use axum::http::{Request, Response, StatusCode};
    use tower::ServiceExt;

    fn state(use_proxy: bool, trusted: &[&str]) -> AppState {
        AppState::new(Config {
            use_proxy,
            trusted_proxies: trusted.iter().map(|s| (*s).to_string()).collect(),
            ..Config::default()
        })
    }

    #[tokio::test]
    async fn test_health_is_gated() {
        let router = build_router(state(false, &[]));
        let req = Request::builder()
            .uri("/health")
            .header("x-forwarded-for", "1.2.3.4")
            .body(Body::empty())
            .unwrap();

        let resp = router.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_forwarded_for_echo_behind_trusted_proxy() {
        let router = build_router(state(true, &["10.0.0.0/8"]));
        let mut req = Request::builder()
            .uri("/")
            .header("x-forwarded-for", "203.0.113.1")
            .body(Body::empty())
            .unwrap();
        req.extensions_mut()
            .insert(RemoteAddr("10.0.0.5:41000".to_string()));

        let resp = router.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["forwarded_for"], "203.0.113.1");
        assert_eq!(json["trusted"], true);
    }

    #[tokio::test]
    async fn test_custom_reporter_uses_state_config() {
        let reporter = |_: StatusCode, message: &str, _: &Request<Body>| {
            let mut resp = Response::new(Body::from(format!("gate: {message}")));
            *resp.status_mut() = StatusCode::FORBIDDEN;
            resp
        };

        // Direct mode: a forwarded header must be refused by the custom reporter
        let router = build_router_with_reporter(state(false, &[]), reporter);
        let req = Request::builder()
            .uri("/")
            .header("x-forwarded-for", "1.2.3.4")
            .body(Body::empty())
            .unwrap();

        let resp = router.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(
            &body[..],
            b"gate: Detected proxy: but application is not configured to use one"
        );

        // Proxy mode with a trusted origin: the handler reports the same config
        let router = build_router_with_reporter(state(true, &["10.0.0.0/8"]), reporter);
        let mut req = Request::builder()
            .uri("/")
            .header("x-forwarded-for", "203.0.113.1")
            .body(Body::empty())
            .unwrap();
        req.extensions_mut()
            .insert(RemoteAddr("10.1.2.3:5000".to_string()));

        let resp = router.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
