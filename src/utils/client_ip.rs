//! Client IP resolution for click deduplication.

use axum::http::HeaderMap;
use std::net::{IpAddr, SocketAddr};

/// Resolves the source IP of a click.
///
/// Without a trusted proxy the socket peer address is authoritative. When
/// `behind_proxy` is set, the first parseable `X-Forwarded-For` entry is used,
/// then `X-Real-IP`, then the peer address. IPv4-mapped IPv6 addresses are
/// reduced to plain IPv4 on every path.
///
/// # Examples
///
/// ```ignore
/// let peer: SocketAddr = "10.0.0.1:5555".parse().unwrap();
/// let mut headers = HeaderMap::new();
/// headers.insert("x-forwarded-for", "203.0.113.7, 10.0.0.1".parse().unwrap());
///
/// assert_eq!(resolve_client_ip(&headers, peer, true), "203.0.113.7");
/// assert_eq!(resolve_client_ip(&headers, peer, false), "10.0.0.1");
/// ```
pub fn resolve_client_ip(headers: &HeaderMap, peer: SocketAddr, behind_proxy: bool) -> String {
    if behind_proxy
        && let Some(ip) = forwarded_for(headers).or_else(|| real_ip(headers))
    {
        return ip.to_canonical().to_string();
    }

    peer.ip().to_canonical().to_string()
}

fn forwarded_for(headers: &HeaderMap) -> Option<IpAddr> {
    headers
        .get("x-forwarded-for")?
        .to_str()
        .ok()?
        .split(',')
        .next()
        .and_then(|first| first.trim().parse().ok())
}

fn real_ip(headers: &HeaderMap) -> Option<IpAddr> {
    headers
        .get("x-real-ip")?
        .to_str()
        .ok()
        .and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn peer() -> SocketAddr {
        "10.0.0.1:5555".parse().unwrap()
    }

    #[test]
    fn test_peer_address_without_proxy() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("203.0.113.7"));

        assert_eq!(resolve_client_ip(&headers, peer(), false), "10.0.0.1");
    }

    #[test]
    fn test_first_forwarded_entry_behind_proxy() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.7, 198.51.100.2"),
        );

        assert_eq!(resolve_client_ip(&headers, peer(), true), "203.0.113.7");
    }

    #[test]
    fn test_real_ip_fallback() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("garbage"));
        headers.insert("x-real-ip", HeaderValue::from_static("198.51.100.2"));

        assert_eq!(resolve_client_ip(&headers, peer(), true), "198.51.100.2");
    }

    #[test]
    fn test_peer_fallback_when_headers_missing() {
        assert_eq!(
            resolve_client_ip(&HeaderMap::new(), peer(), true),
            "10.0.0.1"
        );
    }

    #[test]
    fn test_ipv4_mapped_ipv6_peer_is_canonicalized() {
        let mapped: SocketAddr = "[::ffff:192.0.2.1]:80".parse().unwrap();
        assert_eq!(
            resolve_client_ip(&HeaderMap::new(), mapped, false),
            "192.0.2.1"
        );
    }

    #[test]
    fn test_ipv4_mapped_forwarded_address_is_canonicalized() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("::ffff:203.0.113.9"),
        );
        assert_eq!(resolve_client_ip(&headers, peer(), true), "203.0.113.9");

        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("::ffff:198.51.100.2"));
        assert_eq!(resolve_client_ip(&headers, peer(), true), "198.51.100.2");
    }
}
