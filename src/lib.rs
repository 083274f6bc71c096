//! # Proxy Gate
//!
//! Trusted reverse-proxy validation for Axum services. Before an
//! application may believe `X-Forwarded-For`, the connection itself must
//! come from a configured proxy address or subnet.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Axum HTTP Server                       │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Trace → ProxyTrustLayer (decide: forward | reject)         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Trust-list matcher (addresses + CIDR ranges)               │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Handlers (forwarded-for echo, health)                      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Using the Gate in Another Service
//!
//! ```rust,no_run
//! use std::net::SocketAddr;
//!
//! use axum::{Router, routing::get};
//! use proxy_gate::middleware::ProxyTrustLayer;
//!
//! #[tokio::main]
//! async fn main() -> std::io::Result<()> {
//!     let app = Router::new()
//!         .route("/", get(|| async { "hello" }))
//!         .layer(ProxyTrustLayer::new(true, vec!["10.0.0.0/8".to_string()]));
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//!     axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await
//! }
//! ```
//!
//! ## Configuration
//!
//! ```bash
//! USE_PROXY=true TRUSTED_PROXIES=10.0.0.0/8,192.168.1.10 cargo run
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;
pub mod utils;

// Re-exports for convenience
pub use config::Config;
pub use error::{AppError, AppResult, Rejection};
pub use middleware::{ProxyTrustLayer, RejectionReporter, is_trusted};
pub use routes::{build_router, build_router_with_reporter};
pub use state::AppState;
