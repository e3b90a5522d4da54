//! Per-IP rate limiting for creation endpoints.

use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer, governor::GovernorConfigBuilder, key_extractor::PeerIpKeyExtractor,
};

/// Sustained creation rate per client IP, in requests per second.
pub const CREATE_PER_SECOND: u64 = 5;

/// Interval after which one spent token returns to the bucket.
pub const CREATE_REPLENISH_MS: u64 = 1000 / CREATE_PER_SECOND;

/// Creation burst allowance per client IP.
pub const CREATE_BURST: u32 = 50;

/// Creates the rate limiter guarding `POST /generate_url` and
/// `POST /generate_custom_url`.
///
/// Token bucket keyed by the socket peer address, so the router must be
/// served with `into_make_service_with_connect_info::<SocketAddr>()`.
/// Requests over the limit receive `429 Too Many Requests`. Resolution is
/// not limited.
pub fn creation_layer()
-> GovernorLayer<PeerIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body> {
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_millisecond(CREATE_REPLENISH_MS)
            .burst_size(CREATE_BURST)
            .finish()
            .expect("rate limit period and burst are non-zero"),
    );

    GovernorLayer::new(governor_conf)
}
