//! Connection-origin lookup for the proxy trust gate.
//!
//! The origin is the address of the immediate peer (the proxy, when there is
//! one), not the client described by `X-Forwarded-For`. It is read as a raw
//! string so that whatever the host reports, including malformed values,
//! reaches the trust check unchanged.
//!
//! # Lookup Order
//!
//! 1. [`RemoteAddr`] request extension, if the host inserted one
//! 2. Axum's `ConnectInfo<SocketAddr>` (requires
//!    `into_make_service_with_connect_info::<SocketAddr>()`)
//! 3. Empty string, which is never trusted

use std::borrow::Cow;
use std::net::SocketAddr;

use axum::extract::ConnectInfo;
use axum::http::Request;

/// Raw connection-origin string supplied by the host.
///
/// Takes precedence over `ConnectInfo`. Useful when the server layer knows
/// the peer in a form other than a `SocketAddr` (unix sockets, tests).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteAddr(pub String);

/// Read the raw connection-origin string for a request.
pub fn connection_origin<B>(req: &Request<B>) -> Cow<'_, str> {
    if let Some(RemoteAddr(raw)) = req.extensions().get::<RemoteAddr>() {
        return Cow::Borrowed(raw.as_str());
    }

    if let Some(ConnectInfo(peer)) = req.extensions().get::<ConnectInfo<SocketAddr>>() {
        return Cow::Owned(peer.to_string());
    }

    Cow::Borrowed("")
}

/// Split `host:port` and return the host.
///
/// Accepts bracketed IPv6 (`[::1]:8080`). Returns `None` when the text is
/// not in `host:port` form, e.g. a bare IPv4 address, a bare IPv6 address
/// (too many colons) or arbitrary text.
pub fn split_host_port(origin: &str) -> Option<&str> {
    let (host, port) = origin.rsplit_once(':')?;

    if port.contains(['[', ']']) {
        return None;
    }

    match host.strip_prefix('[') {
        Some(inner) => {
            let inner = inner.strip_suffix(']')?;
            if inner.contains(['[', ']']) {
                return None;
            }
            Some(inner)
        }
        None if host.contains([':', '[', ']']) => None,
        None => Some(host),
    }
}

/// Extract the origin address to check against the trust list.
///
/// Uses the host part of `host:port`, or the raw text verbatim when it
/// cannot be split.
#[inline]
pub fn origin_address(origin: &str) -> &str {
    split_host_port(origin).unwrap_or(origin)
}
