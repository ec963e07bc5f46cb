//! Scan target resolution.
//!
//! A target is given as a literal IPv4/IPv6 address or a hostname. Hostnames
//! are resolved once, before any port is queued; the resulting
//! [`ScanTarget`] is immutable for the rest of the scan.

use crate::error::{ScanError, ScanResult};
use std::fmt;
use std::net::IpAddr;
use trust_dns_resolver::config::{ResolverConfig, ResolverOpts};
use trust_dns_resolver::TokioAsyncResolver;

/// A target host that has been resolved to an address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScanTarget {
    /// The target as the user wrote it.
    pub hostname: String,
    /// The resolved address.
    pub ip: IpAddr,
}

impl ScanTarget {
    /// Create a scan target from an already known address.
    pub fn new(hostname: impl Into<String>, ip: IpAddr) -> Self {
        Self {
            hostname: hostname.into(),
            ip,
        }
    }

    /// Resolve `host` to a scan target.
    ///
    /// Literal addresses (optionally bracketed for IPv6) are accepted without
    /// a lookup. Hostnames go through the system resolver configuration and
    /// the hosts file; an IPv4 answer is preferred when both families are
    /// returned.
    pub async fn resolve(host: &str) -> ScanResult<Self> {
        let trimmed = host.trim();
        let literal = trimmed
            .strip_prefix('[')
            .and_then(|s| s.strip_suffix(']'))
            .unwrap_or(trimmed);

        if let Ok(ip) = literal.parse::<IpAddr>() {
            return Ok(Self::new(trimmed, ip));
        }

        if !is_valid_hostname(trimmed) {
            return Err(ScanError::resolution(trimmed, "not a valid hostname"));
        }

        let resolver = TokioAsyncResolver::tokio_from_system_conf().unwrap_or_else(|e| {
            tracing::debug!(error = %e, "system resolver config unavailable, using defaults");
            TokioAsyncResolver::tokio(ResolverConfig::default(), ResolverOpts::default())
        });

        let response = resolver
            .lookup_ip(trimmed)
            .await
            .map_err(|e| ScanError::resolution(trimmed, e.to_string()))?;

        let addrs: Vec<IpAddr> = response.iter().collect();
        let ip = addrs
            .iter()
            .find(|ip| ip.is_ipv4())
            .or_else(|| addrs.first())
            .copied()
            .ok_or_else(|| ScanError::resolution(trimmed, "no addresses found"))?;

        tracing::debug!(host = trimmed, %ip, candidates = addrs.len(), "resolved target");
        Ok(Self::new(trimmed, ip))
    }
}

impl fmt::Display for ScanTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.hostname, self.ip)
    }
}

/// Check if a string is plausibly a hostname. Underscores are allowed since
/// some resolvers serve such names; whether they exist is the resolver's call.
fn is_valid_hostname(s: &str) -> bool {
    if s.is_empty() || s.len() > 253 {
        return false;
    }

    s.trim_end_matches('.').split('.').all(|label| {
        !label.is_empty()
            && label.len() <= 63
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
            && !label.starts_with('-')
            && !label.ends_with('-')
    })
}
