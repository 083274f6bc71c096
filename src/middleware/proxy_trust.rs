//! Proxy trust gate middleware.
//!
//! Decides per request whether `X-Forwarded-For` may be believed, based on
//! whether a proxy is expected and whether the connection actually comes
//! from a trusted proxy address.
//!
//! # Decision Table
//!
//! ```text
//!  use_proxy │ X-Forwarded-For │ origin in trust list │ outcome
//! ───────────┼─────────────────┼──────────────────────┼─────────────────────────
//!  false     │ absent / empty  │ (not checked)        │ forward
//!  false     │ present         │ (not checked)        │ 400 ProxyMisconfigured
//!  true      │ absent / empty  │ (not checked)        │ 400 ProxyExpectedMissing
//!  true      │ present         │ no                   │ 400 UntrustedOrigin
//!  true      │ present         │ yes                  │ forward
//! ```
//!
//! The header value itself is never parsed; only its presence matters. An
//! empty value counts as absent.
//!
//! # Usage
//!
//! ```rust,ignore
//! let app = Router::new()
//!     .route("/", get(handler))
//!     .layer(ProxyTrustLayer::new(true, vec!["10.0.0.0/8".to_string()]));
//!
//! axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;
//! ```

use std::sync::Arc;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::http::{HeaderMap, Request, Response};
use tower::{Layer, Service};
use tracing::{debug, warn};

use super::matcher::is_trusted;
use super::origin::{connection_origin, origin_address};
use super::reporter::{PlainTextReporter, RejectionReporter};
use crate::error::Rejection;
use crate::metrics;

/// The only header consulted by the gate.
pub const X_FORWARDED_FOR: &str = "x-forwarded-for";

/// Related forwarding header. Recognised by name only; it never affects the
/// trust decision.
pub const X_REAL_IP: &str = "x-real-ip";

/// Immutable trust configuration shared by every request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProxyTrustConfig {
    /// Whether a reverse proxy is expected in front of this service.
    pub use_proxy: bool,
    /// Addresses and CIDR ranges of trusted proxies.
    pub trusted_proxies: Vec<String>,
}

impl ProxyTrustConfig {
    pub fn new(use_proxy: bool, trusted_proxies: Vec<String>) -> Self {
        Self {
            use_proxy,
            trusted_proxies,
        }
    }

    /// Decide the outcome for one request.
    ///
    /// `origin` is the raw connection-origin string (`ip:port`, bare address,
    /// or anything the host reported).
    pub fn decide(&self, headers: &HeaderMap, origin: &str) -> GateOutcome {
        let forwarded = has_forwarded_for(headers);

        if !self.use_proxy {
            return if forwarded {
                GateOutcome::Reject(Rejection::ProxyMisconfigured)
            } else {
                GateOutcome::Forward
            };
        }

        if !forwarded {
            return GateOutcome::Reject(Rejection::ProxyExpectedMissing);
        }

        if is_trusted(origin_address(origin), &self.trusted_proxies) {
            GateOutcome::Forward
        } else {
            GateOutcome::Reject(Rejection::UntrustedOrigin)
        }
    }
}

/// Result of a single gate evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    /// Hand the request to the wrapped service unchanged.
    Forward,
    /// Answer through the reporter; the wrapped service is not called.
    Reject(Rejection),
}

/// `X-Forwarded-For` counts as present only with a non-empty value.
fn has_forwarded_for(headers: &HeaderMap) -> bool {
    headers
        .get(X_FORWARDED_FOR)
        .is_some_and(|value| !value.as_bytes().is_empty())
}

/// Proxy trust layer for Tower middleware stack.
#[derive(Clone)]
pub struct ProxyTrustLayer {
    config: Arc<ProxyTrustConfig>,
    reporter: Arc<dyn RejectionReporter>,
}

impl ProxyTrustLayer {
    /// Create a gate with the plain-text reporter.
    ///
    /// # Arguments
    ///
    /// * `use_proxy` - Whether a reverse proxy is expected
    /// * `trusted_proxies` - Trusted proxy addresses and CIDR ranges
    pub fn new(use_proxy: bool, trusted_proxies: Vec<String>) -> Self {
        Self::with_reporter(use_proxy, trusted_proxies, PlainTextReporter)
    }

    /// Create a gate with a custom rejection reporter.
    pub fn with_reporter<R>(use_proxy: bool, trusted_proxies: Vec<String>, reporter: R) -> Self
    where
        R: RejectionReporter,
    {
        Self::from_config(ProxyTrustConfig::new(use_proxy, trusted_proxies), reporter)
    }

    /// Create a gate from an existing configuration value.
    pub fn from_config<R>(config: ProxyTrustConfig, reporter: R) -> Self
    where
        R: RejectionReporter,
    {
        Self {
            config: Arc::new(config),
            reporter: Arc::new(reporter),
        }
    }

    /// The configuration this gate enforces.
    pub fn config(&self) -> &ProxyTrustConfig {
        &self.config
    }
}

impl<S> Layer<S> for ProxyTrustLayer {
    type Service = ProxyTrustService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ProxyTrustService {
            inner,
            config: self.config.clone(),
            reporter: self.reporter.clone(),
        }
    }
}

/// Proxy trust service wrapper.
#[derive(Clone)]
pub struct ProxyTrustService<S> {
    inner: S,
    config: Arc<ProxyTrustConfig>,
    reporter: Arc<dyn RejectionReporter>,
}

impl<S> Service<Request<Body>> for ProxyTrustService<S>
where
    S: Service<Request<Body>, Response = Response<Body>> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response<Body>;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let origin = connection_origin(&req);
        let outcome = self.config.decide(req.headers(), &origin);

        match outcome {
            GateOutcome::Forward => {
                debug!(origin = %origin, "Proxy trust check passed");
                drop(origin);
                metrics::record_forwarded();

                // The clone may not be ready; keep the driven instance for this call
                let clone = self.inner.clone();
                let mut inner = std::mem::replace(&mut self.inner, clone);
                Box::pin(async move { inner.call(req).await })
            }
            GateOutcome::Reject(rejection) => {
                warn!(
                    reason = rejection.reason(),
                    origin = %origin,
                    path = %req.uri().path(),
                    "Rejected request at proxy trust gate"
                );
                metrics::record_rejected(rejection.reason());

                let message = rejection.to_string();
                let response = self
                    .reporter
                    .report(rejection.status_code(), &message, &req);
                Box::pin(async move { Ok(response) })
            }
        }
    }
}
