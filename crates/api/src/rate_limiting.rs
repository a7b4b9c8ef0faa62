use std::env::var;

use actix_governor::governor::middleware::NoOpMiddleware;
use actix_governor::{GovernorConfig, GovernorConfigBuilder, PeerIpKeyExtractor};

pub fn build_rate_limiting_conf() -> GovernorConfig<PeerIpKeyExtractor, NoOpMiddleware> {
    GovernorConfigBuilder::default()
        .per_second(
            var("RATE_LIMITING_PER_SECOND")
                .unwrap_or_else(|_| "10".to_owned())
                .parse()
                .unwrap(),
        )
        .burst_size(
            var("RATE_LIMITING_BURST_SIZE")
                .unwrap_or_else(|_| "100".to_owned())
                .parse()
                .unwrap(),
        )
        .finish()
        .unwrap()
}
