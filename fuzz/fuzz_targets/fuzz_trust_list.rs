//! Fuzz testing for trust-list matching and origin splitting.
//!
//! Ensures that for arbitrary text:
//!
//! - `is_trusted` and `TrustEntry::parse` never panic
//! - `origin_address` never panics and always returns a substring of its input
//! - an unparseable candidate is never trusted
//!
//! ```bash
//! cargo +nightly fuzz run fuzz_trust_list -- -max_total_time=60
//! ```

#![no_main]

use std::net::IpAddr;

use libfuzzer_sys::fuzz_target;
use proxy_gate::middleware::{TrustEntry, is_trusted, origin_address};

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };

    // First line is the candidate/origin, the rest are trust entries
    let mut lines = s.split('\n');
    let candidate = lines.next().unwrap_or_default();
    let entries: Vec<&str> = lines.collect();

    for entry in &entries {
        let _ = TrustEntry::parse(entry);
    }

    let trusted = is_trusted(candidate, &entries);
    if candidate.parse::<IpAddr>().is_err() {
        assert!(!trusted);
    }

    let host = origin_address(candidate);
    assert!(candidate.contains(host));
    let _ = is_trusted(host, &entries);
});
