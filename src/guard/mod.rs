//! Destination guard.
//!
//! Decides whether a hostname may be fetched, so the relay cannot be used to
//! reach loopback or private-network targets.
//!
//! # Modes
//! - [`GuardMode::Prefix`]: literal string rules. `172.2` is matched as a plain
//!   prefix, which blocks `172.20`-`172.29` but also `172.2` and `172.200`-`172.299`,
//!   and leaves `172.30`/`172.31` open.
//! - [`GuardMode::Network`]: name rules for `localhost` and `*.local`, plus real
//!   range checks on IP literals (full `172.16.0.0/12`, link-local, IPv6 local).
//!
//! The verdict is a pure function of the hostname; nothing is cached.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use url::Url;

pub use crate::config::GuardMode;

/// Hostname rules shared by both modes.
fn is_local_name(host: &str) -> bool {
    host == "localhost" || host.ends_with(".local")
}

/// Classify a hostname with the literal string rules.
pub fn is_blocked_host(host: &str) -> bool {
    let h = host.to_ascii_lowercase();
    is_local_name(&h)
        || h == "127.0.0.1"
        || h.starts_with("10.")
        || h.starts_with("192.168.")
        || h.starts_with("172.16.")
        || h.starts_with("172.17.")
        || h.starts_with("172.18.")
        || h.starts_with("172.19.")
        || h.starts_with("172.2")
}

/// Classify a hostname by the address range of IP literals.
pub fn is_blocked_network_host(host: &str) -> bool {
    let h = host.to_ascii_lowercase();
    if is_local_name(&h) {
        return true;
    }

    let literal = h
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .unwrap_or(&h);

    match literal.parse::<IpAddr>() {
        Ok(IpAddr::V4(ip)) => is_internal_v4(ip),
        Ok(IpAddr::V6(ip)) => match ip.to_ipv4_mapped() {
            Some(v4) => is_internal_v4(v4),
            None => is_internal_v6(ip),
        },
        Err(_) => false,
    }
}

fn is_internal_v4(ip: Ipv4Addr) -> bool {
    ip.is_loopback() || ip.is_private() || ip.is_link_local() || ip.is_unspecified()
}

fn is_internal_v6(ip: Ipv6Addr) -> bool {
    let first = ip.segments()[0];
    ip.is_loopback()
        || ip.is_unspecified()
        // fc00::/7
        || (first & 0xfe00) == 0xfc00
        // fe80::/10
        || (first & 0xffc0) == 0xfe80
}

/// Guard applied to every relay target.
#[derive(Debug, Clone, Copy, Default)]
pub struct DestinationGuard {
    mode: GuardMode,
}

impl DestinationGuard {
    pub fn new(mode: GuardMode) -> Self {
        Self { mode }
    }

    /// Whether `host` is a blocked destination under this guard's mode.
    pub fn is_blocked(&self, host: &str) -> bool {
        match self.mode {
            GuardMode::Prefix => is_blocked_host(host),
            GuardMode::Network => is_blocked_network_host(host),
        }
    }

    /// Scheme check plus hostname verdict for a parsed target.
    ///
    /// A URL without a host is judged as the empty hostname.
    pub fn permits(&self, url: &Url) -> bool {
        matches!(url.scheme(), "http" | "https") && !self.is_blocked(url.host_str().unwrap_or(""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_rules_block_internal_hosts() {
        for host in [
            "localhost",
            "LOCALHOST",
            "127.0.0.1",
            "printer.local",
            "10.0.0.1",
            "192.168.1.20",
            "172.16.0.1",
            "172.17.5.5",
            "172.18.0.9",
            "172.19.255.255",
            "172.20.0.1",
            "172.29.1.1",
        ] {
            assert!(is_blocked_host(host), "{host} should be blocked");
        }
    }

    #[test]
    fn prefix_rules_allow_public_hosts() {
        for host in ["example.com", "news.ycombinator.com", "8.8.8.8", "172.15.0.1", "localhost.example.com"] {
            assert!(!is_blocked_host(host), "{host} should be allowed");
        }
    }

    #[test]
    fn prefix_rule_for_172_2_is_literal() {
        // Matches anything spelled with that prefix, not the /12 range.
        assert!(is_blocked_host("172.2"));
        assert!(is_blocked_host("172.250.0.1"));
        assert!(!is_blocked_host("172.31.0.1"));
    }

    #[test]
    fn network_mode_uses_address_ranges() {
        for host in [
            "localhost",
            "db.local",
            "127.0.0.2",
            "10.1.2.3",
            "172.31.0.1",
            "172.16.0.1",
            "192.168.0.1",
            "169.254.169.254",
            "0.0.0.0",
            "[::1]",
            "[fd00::1]",
            "[fe80::1]",
            "[::ffff:127.0.0.1]",
        ] {
            assert!(is_blocked_network_host(host), "{host} should be blocked");
        }

        for host in ["172.200.1.1", "172.32.0.1", "10.example.com", "example.com", "[2606:4700::1111]"] {
            assert!(!is_blocked_network_host(host), "{host} should be allowed");
        }
    }

    #[test]
    fn permits_checks_scheme_and_host() {
        let guard = DestinationGuard::default();
        let ok = Url::parse("https://example.com/feed.xml").unwrap();
        let ftp = Url::parse("ftp://example.com/feed").unwrap();
        let local = Url::parse("http://localhost/feed").unwrap();
        let mailto = Url::parse("mailto:someone@example.com").unwrap();

        assert!(guard.permits(&ok));
        assert!(!guard.permits(&ftp));
        assert!(!guard.permits(&local));
        assert!(!guard.permits(&mailto));
    }

    #[test]
    fn verdict_follows_mode() {
        let prefix = DestinationGuard::new(GuardMode::Prefix);
        let network = DestinationGuard::new(GuardMode::Network);

        assert!(prefix.is_blocked("172.250.0.1"));
        assert!(!network.is_blocked("172.250.0.1"));
        assert!(!prefix.is_blocked("172.31.0.1"));
        assert!(network.is_blocked("172.31.0.1"));
    }
}
