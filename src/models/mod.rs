mod api;

pub use api::{ForwardedForResponse, HealthResponse};
