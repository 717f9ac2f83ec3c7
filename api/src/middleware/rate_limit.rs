//! Rate limiting middleware
//!
//! Runs after the tenant resolver: authenticated traffic is keyed by user
//! id at the authenticated quota, anonymous traffic by client IP at the
//! default quota, so the two tiers never share a bucket. Every admitted
//! response carries `X-RateLimit-*` headers; rejections are HTTP 429 with
//! `Retry-After`.

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{HeaderName, HeaderValue},
    Error, HttpMessage, HttpResponse,
};
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    rc::Rc,
    sync::Arc,
    task::{Context, Poll},
};

use vt_core::services::rate_limit::{
    RateLimitDecision, RateLimitKey, RateLimitQuota, RateLimiter,
};
use vt_shared::config::rate_limit::RateLimitConfig;
use vt_shared::types::response::ErrorResponse;

use super::tenant::TenantContext;

fn header_limit() -> HeaderName {
    HeaderName::from_static("x-ratelimit-limit")
}

fn header_remaining() -> HeaderName {
    HeaderName::from_static("x-ratelimit-remaining")
}

fn header_reset() -> HeaderName {
    HeaderName::from_static("x-ratelimit-reset")
}

/// Rate limiter middleware factory
pub struct RateLimit {
    limiter: Arc<dyn RateLimiter>,
    config: RateLimitConfig,
}

impl RateLimit {
    /// Creates the middleware around a limiter and tier configuration
    pub fn new(limiter: Arc<dyn RateLimiter>, config: RateLimitConfig) -> Self {
        Self { limiter, config }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service: Rc::new(service),
            limiter: Arc::clone(&self.limiter),
            config: self.config.clone(),
        }))
    }
}

/// Rate limiter middleware service
pub struct RateLimitMiddleware<S> {
    service: Rc<S>,
    limiter: Arc<dyn RateLimiter>,
    config: RateLimitConfig,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let limiter = Arc::clone(&self.limiter);
        let config = self.config.clone();

        Box::pin(async move {
            if !config.enabled {
                let res = service.call(req).await?;
                return Ok(res.map_into_left_body());
            }

            // Tier selection happens after the tenant resolver has run, so
            // authenticated and anonymous traffic never share a bucket
            let tenant = req.extensions().get::<TenantContext>().cloned();
            let (key, quota) = match tenant {
                Some(context) => (
                    RateLimitKey::User(context.user_id),
                    RateLimitQuota::new(
                        config.authenticated_limit,
                        config.authenticated_window_seconds,
                    ),
                ),
                None => (
                    RateLimitKey::Ip(client_ip(&req)),
                    RateLimitQuota::new(config.default_limit, config.default_window_seconds),
                ),
            };

            let decision = limiter.check(&key, quota).await;

            if !decision.allowed {
                log::warn!(
                    "Rate limit exceeded for {} on {}",
                    key.storage_key(),
                    req.path()
                );
                return Ok(reject(req, &decision));
            }

            let res = service.call(req).await?;
            let mut res = res.map_into_left_body();
            apply_headers(res.headers_mut(), &decision);

            Ok(res)
        })
    }
}

/// Build the 429 rejection response
fn reject<B>(req: ServiceRequest, decision: &RateLimitDecision) -> ServiceResponse<EitherBody<B>> {
    let retry_after = decision.retry_after.unwrap_or(0);

    let mut builder = HttpResponse::TooManyRequests();
    builder
        .insert_header((header_limit(), HeaderValue::from(decision.limit)))
        .insert_header((header_remaining(), HeaderValue::from(0u32)))
        .insert_header((header_reset(), HeaderValue::from(decision.reset_at)))
        .insert_header(("Retry-After", HeaderValue::from(retry_after)));

    let response = builder.json(
        ErrorResponse::new(
            "rate_limit_exceeded",
            "Rate limit exceeded. Please try again later.",
        )
        .add_detail("retry_after", retry_after),
    );

    req.into_response(response).map_into_right_body()
}

/// Attach rate limit headers to an admitted response
fn apply_headers(headers: &mut actix_web::http::header::HeaderMap, decision: &RateLimitDecision) {
    headers.insert(header_limit(), HeaderValue::from(decision.limit));
    headers.insert(header_remaining(), HeaderValue::from(decision.remaining));
    headers.insert(header_reset(), HeaderValue::from(decision.reset_at));
}

/// Get client IP address from request
fn client_ip(req: &ServiceRequest) -> String {
    // Prefer forwarding headers set by the reverse proxy
    if let Some(forwarded_for) = req.headers().get("X-Forwarded-For") {
        if let Ok(forwarded_str) = forwarded_for.to_str() {
            if let Some(ip) = forwarded_str.split(',').next() {
                let ip = ip.trim();
                if !ip.is_empty() {
                    return ip.to_string();
                }
            }
        }
    }

    if let Some(real_ip) = req.headers().get("X-Real-IP") {
        if let Ok(ip_str) = real_ip.to_str() {
            return ip_str.to_string();
        }
    }

    req.connection_info()
        .peer_addr()
        .unwrap_or("unknown")
        .to_string()
}
