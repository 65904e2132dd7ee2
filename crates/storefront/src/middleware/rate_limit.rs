//! Rate limiting middleware using governor and `tower_governor`.
//!
//! Review submission and removal are the only anonymous-abuse-prone writes,
//! so they get a dedicated limiter keyed on the caller.

use std::net::IpAddr;
use std::sync::Arc;

use axum::http::Request;
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use tower_governor::{GovernorError, GovernorLayer, governor::GovernorConfigBuilder};

use super::auth::USER_ID_HEADER;

/// Rate limit key: the forwarded user, the client IP, or a shared bucket.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CallerKey {
    User(String),
    Ip(IpAddr),
    Anonymous,
}

/// Key extractor that prefers the gateway's user ID, then proxy IP headers.
///
/// Never fails: callers without any identifying header share one bucket
/// instead of being rejected outright.
#[derive(Debug, Clone, Copy)]
pub struct CallerKeyExtractor;

impl tower_governor::key_extractor::KeyExtractor for CallerKeyExtractor {
    type Key = CallerKey;

    fn extract<T>(&self, req: &Request<T>) -> Result<Self::Key, GovernorError> {
        let headers = req.headers();
        let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());

        if let Some(user) = header(USER_ID_HEADER).map(str::trim).filter(|s| !s.is_empty()) {
            return Ok(CallerKey::User(user.to_owned()));
        }

        // X-Forwarded-For (first IP in the chain), then X-Real-IP
        if let Some(ip) = header("x-forwarded-for")
            .and_then(|s| s.split(',').next())
            .and_then(|s| s.trim().parse::<IpAddr>().ok())
        {
            return Ok(CallerKey::Ip(ip));
        }

        if let Some(ip) = header("x-real-ip").and_then(|s| s.trim().parse::<IpAddr>().ok()) {
            return Ok(CallerKey::Ip(ip));
        }

        Ok(CallerKey::Anonymous)
    }
}

/// Rate limiter layer type for Axum.
pub type RateLimiterLayer =
    GovernorLayer<CallerKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Create rate limiter for review writes: ~30 requests per minute per caller.
///
/// Configuration: 1 request every 2 seconds (replenish), burst of 10.
///
/// # Panics
///
/// This function will not panic. The configuration uses only valid positive
/// integers (`per_second(2)` and `burst_size(10)`), which are always accepted
/// by `GovernorConfigBuilder`.
#[must_use]
pub fn review_rate_limiter() -> RateLimiterLayer {
    let config = GovernorConfigBuilder::default()
        .key_extractor(CallerKeyExtractor)
        .per_second(2)
        .burst_size(10)
        .finish()
        .expect("rate limiter config with per_second(2) and burst_size(10) is valid");
    GovernorLayer::new(Arc::new(config))
}
