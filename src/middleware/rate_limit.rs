// Process-wide request throttle.
//
// A single in-memory token bucket covers the whole API; limits come from
// RATE_LIMIT_PER_SECOND / RATE_LIMIT_BURST. Health checks bypass it.

use axum::{
    body::Body,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use once_cell::sync::Lazy;
use std::num::NonZeroU32;

use crate::utils::ApiError;

type GlobalLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

static LIMITER: Lazy<GlobalLimiter> = Lazy::new(|| {
    let security = &crate::app_config::config().security;
    let per_second = NonZeroU32::new(security.rate_limit_per_second.max(1))
        .unwrap_or(NonZeroU32::MIN);
    let burst = NonZeroU32::new(security.rate_limit_burst.max(1)).unwrap_or(NonZeroU32::MIN);

    RateLimiter::direct(Quota::per_second(per_second).allow_burst(burst))
});

pub async fn rate_limit_middleware(request: Request<Body>, next: Next) -> Response {
    if request.uri().path() == "/health" {
        return next.run(request).await;
    }

    if LIMITER.check().is_err() {
        tracing::warn!(path = %request.uri().path(), "request rate limited");
        return ApiError::RateLimited.into_response();
    }

    next.run(request).await
}
