//! Shared application state for Axum handlers.
//!
//! Configuration is immutable after startup and shared behind an `Arc`, so
//! cloning the state per request is cheap and needs no locking.

use std::sync::Arc;

use crate::config::Config;

/// Shared application state for Axum handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Create new application state from configuration.
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}
