// src/presentation/http/middleware/rate_limit.rs
use ::governor::middleware::NoOpMiddleware;
use axum::body::Body;
use tower_governor::{
    GovernorLayer, governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor,
};

pub type AdminRateLimitLayer = GovernorLayer<SmartIpKeyExtractor, NoOpMiddleware, Body>;

/// Token bucket applied per client to the operator endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitSettings {
    /// Seconds before one spent request is returned to the bucket.
    pub replenish_secs: u64,
    pub burst_size: u32,
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            replenish_secs: 2,
            burst_size: 30,
        }
    }
}

/// Per-client limiter for operator endpoints, keyed by forwarded or peer IP.
///
/// Returns `None` when either setting is zero.
pub fn admin_rate_limit_layer(settings: RateLimitSettings) -> Option<AdminRateLimitLayer> {
    let mut builder = GovernorConfigBuilder::default();
    builder.per_second(settings.replenish_secs);
    builder.burst_size(settings.burst_size);
    let config = builder.key_extractor(SmartIpKeyExtractor).finish()?;

    Some(GovernorLayer::new(config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_settings_yield_no_layer() {
        assert!(admin_rate_limit_layer(RateLimitSettings::default()).is_some());
        assert!(
            admin_rate_limit_layer(RateLimitSettings {
                replenish_secs: 0,
                ..RateLimitSettings::default()
            })
            .is_none()
        );
        assert!(
            admin_rate_limit_layer(RateLimitSettings {
                burst_size: 0,
                ..RateLimitSettings::default()
            })
            .is_none()
        );
    }
}
