use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

/// Application-wide error types with appropriate HTTP status codes.
///
/// These cover process startup and the host's own handlers. Proxy trust
/// decisions are reported through [`Rejection`] instead and never produce a
/// JSON body.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Failed to bind listener: {0}")]
    BindError(String),

    #[error("Metrics exporter error: {0}")]
    MetricsError(String),
}

/// Error response body for API endpoints.
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "Request failed");

        let (status, error_type, message) = match &self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.as_str()),

            // Never expose internal details to clients
            AppError::ConfigError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "config_error",
                "Service configuration error.",
            ),
            AppError::BindError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "bind_error",
                "An internal error occurred.",
            ),
            AppError::MetricsError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "metrics_error",
                "An internal error occurred.",
            ),
        };

        let body = ErrorResponse {
            error: error_type.to_string(),
            message: message.to_string(),
        };

        (status, axum::Json(body)).into_response()
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

/// Why the proxy trust gate refused a request.
///
/// The `Display` text is the exact response body written by the default
/// reporter.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// `X-Forwarded-For` arrived but no proxy is configured.
    #[error("Detected proxy: but application is not configured to use one")]
    ProxyMisconfigured,

    /// A proxy is configured but `X-Forwarded-For` is missing or empty.
    #[error("Expected a proxy: X-Forwarded-For empty")]
    ProxyExpectedMissing,

    /// The connection origin is not in the trust list.
    #[error("Untrusted proxy")]
    UntrustedOrigin,
}

impl Rejection {
    /// HTTP status for this rejection. All are client errors.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Rejection::ProxyMisconfigured
            | Rejection::ProxyExpectedMissing
            | Rejection::UntrustedOrigin => StatusCode::BAD_REQUEST,
        }
    }

    /// Stable label for logs and metrics.
    pub fn reason(&self) -> &'static str {
        match self {
            Rejection::ProxyMisconfigured => "proxy_misconfigured",
            Rejection::ProxyExpectedMissing => "proxy_expected_missing",
            Rejection::UntrustedOrigin => "untrusted_origin",
        }
    }
}
