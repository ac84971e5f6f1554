//! Per-client rate limiting
//!
//! Requests are keyed by peer IP, read from the `ConnectInfo<SocketAddr>`
//! extension that `main` installs through
//! `into_make_service_with_connect_info`. Each IP may send
//! `RateLimit::max_requests` requests in a burst; the budget refills evenly
//! over `RateLimit::window`. Requests over budget get a 429 `ApiError` with
//! `retry-after` set.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    response::{IntoResponse, Response},
    Router,
};
use tower_governor::{governor::GovernorConfigBuilder, GovernorError, GovernorLayer};

use crate::backend::error::ApiError;
use crate::backend::server::config::RateLimit;

/// How often idle client entries are dropped from the limiter
const CLEANUP_INTERVAL: Duration = Duration::from_secs(60);

/// Wrap `router` in a per-IP rate limiter
pub fn rate_limit<S>(router: Router<S>, limit: &RateLimit) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let period = limit
        .window
        .checked_div(limit.max_requests)
        .unwrap_or_default()
        .max(Duration::from_nanos(1));
    let Some(config) = GovernorConfigBuilder::default()
        .period(period)
        .burst_size(limit.max_requests)
        .finish()
    else {
        tracing::error!(?limit, "Invalid rate limit; requests are not limited");
        return router;
    };
    let config = Arc::new(config);

    // Only a weak handle, so the task ends with the router
    let limiter = Arc::downgrade(config.limiter());
    if let Ok(runtime) = tokio::runtime::Handle::try_current() {
        runtime.spawn(async move {
            let mut interval = tokio::time::interval(CLEANUP_INTERVAL);
            loop {
                interval.tick().await;
                let Some(limiter) = limiter.upgrade() else {
                    break;
                };
                limiter.retain_recent();
            }
        });
    }

    router.layer(GovernorLayer::new(config).error_handler(rate_limit_response))
}

fn rate_limit_response(error: GovernorError) -> Response {
    match error {
        GovernorError::TooManyRequests { wait_time, headers } => {
            tracing::warn!(wait_time, "Rate limit exceeded");
            let mut response = ApiError::RateLimited.into_response();
            if let Some(headers) = headers {
                response.headers_mut().extend(headers);
            }
            response
        }
        other => ApiError::internal(format!("rate limiter: {other}")).into_response(),
    }
}
