//! HTTP middleware for reverse-proxy trust validation.
//!
//! - **Matcher**: trust-list parsing and address membership
//! - **Origin**: connection-origin lookup and `host:port` splitting
//! - **Reporter**: pluggable rejection responses
//! - **Proxy Trust**: the Tower layer that ties them together
//!
//! # Architecture
//!
//! ```text
//! Request → ProxyTrustLayer ──forward──► Handler → Response
//!                  │
//!                  └──reject──► RejectionReporter → 400 Response
//! ```

pub mod matcher;
pub mod origin;
pub mod proxy_trust;
pub mod reporter;

pub use matcher::{CidrRange, TrustEntry, is_trusted};
pub use origin::{RemoteAddr, connection_origin, origin_address, split_host_port};
pub use proxy_trust::{
    GateOutcome, ProxyTrustConfig, ProxyTrustLayer, ProxyTrustService, X_FORWARDED_FOR, X_REAL_IP,
};
pub use reporter::{PlainTextReporter, RejectionReporter};
