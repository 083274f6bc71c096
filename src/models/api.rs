use serde::Serialize;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always "healthy" once the server is answering
    pub status: String,
    /// Application version
    pub version: String,
    /// Whether a reverse proxy is expected in front of this service
    pub use_proxy: bool,
}

/// What the application sees once the proxy trust gate has let a request
/// through.
#[derive(Debug, Serialize)]
pub struct ForwardedForResponse {
    /// Raw `X-Forwarded-For` value, if the request carried one
    pub forwarded_for: Option<String>,
    /// Whether that value came through a trusted proxy
    pub trusted: bool,
}
