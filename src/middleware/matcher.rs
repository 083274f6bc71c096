//! Trust-list matching for proxy origin addresses.
//!
//! A trust list is a sequence of plain strings, each either a bare address
//! (`10.0.0.1`, `::1`) or a CIDR range (`10.0.0.0/8`, `fd00::/8`). Entries
//! are parsed on every evaluation into a [`TrustEntry`] and matched
//! explicitly. Nothing here ever fails: a malformed entry is inert and a
//! malformed candidate is never trusted.
//!
//! ```text
//!  "10.0.0.0/8"  ──► Subnet(10.0.0.0/8)   ── contains(candidate)
//!  "10.1.0.1"    ──► Single(10.1.0.1)     ── == candidate
//!  "10.0.0.0/99" ──► Unparseable          ── never matches
//! ```

use std::net::IpAddr;

/// Parsed CIDR network range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CidrRange {
    /// Network address as written (host bits are masked on comparison)
    network: IpAddr,
    /// Prefix length (e.g., 24 for /24)
    prefix_len: u8,
}

impl CidrRange {
    /// Parse strict CIDR notation (`<address>/<prefix>`).
    ///
    /// Returns `None` when there is no `/`, the address is invalid, or the
    /// prefix is not a plain decimal within the family's bit width.
    ///
    /// An IPv4-mapped network (`::ffff:a.b.c.d`) with a prefix of at least 96
    /// is stored as the equivalent IPv4 range, matching how candidates are
    /// canonicalised.
    pub fn parse(cidr: &str) -> Option<Self> {
        let (addr, prefix) = cidr.split_once('/')?;

        if prefix.is_empty() || !prefix.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }

        let network: IpAddr = addr.parse().ok()?;
        let prefix_len: u8 = prefix.parse().ok()?;

        if prefix_len > max_prefix_len(&network) {
            return None;
        }

        if let IpAddr::V6(v6) = network
            && let Some(v4) = v6.to_ipv4_mapped()
            && prefix_len >= 96
        {
            return Some(Self {
                network: IpAddr::V4(v4),
                prefix_len: prefix_len - 96,
            });
        }

        Some(Self {
            network,
            prefix_len,
        })
    }

    /// Prefix length of this range.
    pub fn prefix_len(&self) -> u8 {
        self.prefix_len
    }

    /// Check if an IP address is contained within this CIDR range.
    ///
    /// Addresses of the other family are never contained.
    pub fn contains(&self, ip: &IpAddr) -> bool {
        match (&self.network, ip) {
            (IpAddr::V4(net), IpAddr::V4(addr)) => {
                let mask = u32::MAX
                    .checked_shl(32 - u32::from(self.prefix_len))
                    .unwrap_or(0);
                (u32::from(*net) & mask) == (u32::from(*addr) & mask)
            }
            (IpAddr::V6(net), IpAddr::V6(addr)) => {
                let mask = u128::MAX
                    .checked_shl(128 - u32::from(self.prefix_len))
                    .unwrap_or(0);
                (u128::from(*net) & mask) == (u128::from(*addr) & mask)
            }
            _ => false,
        }
    }
}

fn max_prefix_len(ip: &IpAddr) -> u8 {
    match ip {
        IpAddr::V4(_) => 32,
        IpAddr::V6(_) => 128,
    }
}

/// One trust-list entry, classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrustEntry {
    /// A CIDR range; matches by containment.
    Subnet(CidrRange),
    /// A bare address; matches by equality.
    Single(IpAddr),
    /// Neither form. Never matches.
    Unparseable,
}

impl TrustEntry {
    /// Classify a configured string.
    ///
    /// CIDR is tried first. Any CIDR failure, whether the text has no `/` at
    /// all or carries a malformed address or prefix, falls back to reading
    /// the whole text as a bare address.
    pub fn parse(text: &str) -> Self {
        if let Some(range) = CidrRange::parse(text) {
            return TrustEntry::Subnet(range);
        }

        match text.parse::<IpAddr>() {
            Ok(ip) => TrustEntry::Single(ip.to_canonical()),
            Err(_) => TrustEntry::Unparseable,
        }
    }

    /// Check whether `ip` is covered by this entry.
    pub fn matches(&self, ip: &IpAddr) -> bool {
        match self {
            TrustEntry::Subnet(range) => range.contains(ip),
            TrustEntry::Single(addr) => addr == ip,
            TrustEntry::Unparseable => false,
        }
    }

    /// Whether the entry is usable at all (for configuration diagnostics).
    pub fn is_valid(&self) -> bool {
        !matches!(self, TrustEntry::Unparseable)
    }
}

/// Check whether `candidate` is an address covered by any entry in
/// `trust_list`.
///
/// `candidate` must be a bare address without a port. It is compared in
/// canonical form, so `::ffff:10.0.0.1` is treated as `10.0.0.1`.
///
/// Returns `false` for an unparseable candidate or an empty list.
pub fn is_trusted<S: AsRef<str>>(candidate: &str, trust_list: &[S]) -> bool {
    let ip = match candidate.parse::<IpAddr>() {
        Ok(ip) => ip.to_canonical(),
        Err(_) => return false,
    };

    trust_list
        .iter()
        .any(|entry| TrustEntry::parse(entry.as_ref()).matches(&ip))
}
