//! Rejection reporting for the proxy trust gate.
//!
//! The gate decides; a [`RejectionReporter`] turns the decision into the
//! response that goes back to the caller. It is called exactly once per
//! rejected request and never for forwarded ones.
//!
//! Closures with the matching signature implement the trait, so a custom
//! reporter can be passed inline:
//!
//! ```rust,ignore
//! let layer = ProxyTrustLayer::with_reporter(true, proxies, |status, message: &str, _req: &Request<Body>| {
//!     (status, axum::Json(serde_json::json!({ "error": message }))).into_response()
//! });
//! ```

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};

/// Builds the response for a rejected request.
pub trait RejectionReporter: Send + Sync + 'static {
    /// Produce the response for a rejection.
    ///
    /// `request` is the rejected request, untouched, for context such as the
    /// path or request ID.
    fn report(&self, status: StatusCode, message: &str, request: &Request<Body>) -> Response<Body>;
}

impl<F> RejectionReporter for F
where
    F: Fn(StatusCode, &str, &Request<Body>) -> Response<Body> + Send + Sync + 'static,
{
    fn report(&self, status: StatusCode, message: &str, request: &Request<Body>) -> Response<Body> {
        self(status, message, request)
    }
}

/// Default reporter: the status code plus the message as the whole body.
///
/// No trailing newline and no headers beyond what the server adds itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextReporter;

impl RejectionReporter for PlainTextReporter {
    fn report(&self, status: StatusCode, message: &str, _request: &Request<Body>) -> Response<Body> {
        let mut response = Response::new(Body::from(message.to_owned()));
        *response.status_mut() = status;
        response
    }
}
