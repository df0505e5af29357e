//! Rate limiting middleware using token bucket algorithm.

use axum::body::Body;
use axum::http::Request;
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::net::IpAddr;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer,
    errors::GovernorError,
    governor::GovernorConfigBuilder,
    key_extractor::{KeyExtractor, PeerIpKeyExtractor, SmartIpKeyExtractor},
};

/// Keys requests by client IP.
///
/// Uses the socket peer address, or the proxy headers
/// (`X-Forwarded-For`, `X-Real-IP`, `Forwarded`) when `behind_proxy` is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientIpKeyExtractor {
    behind_proxy: bool,
}

impl ClientIpKeyExtractor {
    pub const fn new(behind_proxy: bool) -> Self {
        Self { behind_proxy }
    }
}

impl KeyExtractor for ClientIpKeyExtractor {
    type Key = IpAddr;

    fn extract<T>(&self, req: &Request<T>) -> Result<Self::Key, GovernorError> {
        if self.behind_proxy {
            SmartIpKeyExtractor.extract(req)
        } else {
            PeerIpKeyExtractor.extract(req)
        }
    }
}

type ClientIpGovernorLayer = GovernorLayer<ClientIpKeyExtractor, NoOpMiddleware<QuantaInstant>, Body>;

/// Creates the rate limiter for the management API.
///
/// # Limits
///
/// - **Rate**: 1 request per second
/// - **Burst**: 10 requests
///
/// Requests exceeding the limit receive `429 Too Many Requests`. The click
/// endpoint is not rate limited.
///
/// # Example
///
/// ```rust,ignore
/// let api = Router::new()
///     .route("/placements", post(create_placement_handler))
///     .layer(rate_limit::secure_layer(false));
/// ```
pub fn secure_layer(behind_proxy: bool) -> ClientIpGovernorLayer {
    let governor_conf = GovernorConfigBuilder::default()
        .per_second(1)
        .burst_size(10)
        .key_extractor(ClientIpKeyExtractor::new(behind_proxy))
        .finish()
        .expect("valid governor config");

    GovernorLayer::new(Arc::new(governor_conf))
}
