//! Integration tests for the rate limiting middleware

mod common;

use actix_web::{test, web, App, HttpResponse};
use std::sync::Arc;
use uuid::Uuid;

use vt_api::middleware::rate_limit::RateLimit;
use vt_api::middleware::tenant::TenantResolver;
use vt_core::services::rate_limit::MemoryRateLimiter;
use vt_core::services::token::{TokenConfig, TokenService};
use vt_shared::config::rate_limit::RateLimitConfig;

use common::InMemoryRevocationStore;

async fn ok() -> HttpResponse {
    HttpResponse::Ok().finish()
}

fn tight_config() -> RateLimitConfig {
    RateLimitConfig {
        default_limit: 5,
        default_window_seconds: 60,
        authenticated_limit: 50,
        authenticated_window_seconds: 60,
        ..RateLimitConfig::default()
    }
}

fn header_value(resp: &actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>, name: &str) -> String {
    resp.headers()
        .get(name)
        .expect("header missing")
        .to_str()
        .unwrap()
        .to_string()
}

#[actix_web::test]
async fn test_five_allowed_then_429_with_retry_after() {
    let app = test::init_service(
        App::new()
            .wrap(RateLimit::new(
                Arc::new(MemoryRateLimiter::new()),
                tight_config(),
            ))
            .route("/data", web::get().to(ok)),
    )
    .await;

    for expected_remaining in ["4", "3", "2", "1", "0"] {
        let resp =
            test::call_service(&app, test::TestRequest::get().uri("/data").to_request()).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(header_value(&resp, "x-ratelimit-limit"), "5");
        assert_eq!(header_value(&resp, "x-ratelimit-remaining"), expected_remaining);
    }

    let resp = test::call_service(&app, test::TestRequest::get().uri("/data").to_request()).await;
    assert_eq!(resp.status(), 429);
    assert_eq!(header_value(&resp, "x-ratelimit-remaining"), "0");
    let retry_after: u64 = header_value(&resp, "retry-after").parse().unwrap();
    assert!(retry_after > 0);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "rate_limit_exceeded");
    assert!(body["details"]["retry_after"].as_u64().unwrap() > 0);
}

#[actix_web::test]
async fn test_authenticated_and_anonymous_tiers_do_not_share_buckets() {
    let token_service = Arc::new(TokenService::new(
        InMemoryRevocationStore::new(),
        TokenConfig::default(),
    ));
    let pair = token_service
        .create_pair(Uuid::new_v4(), Uuid::new_v4(), "user@example.com", false)
        .unwrap();

    let mut config = tight_config();
    config.default_limit = 1;

    let app = test::init_service(
        App::new()
            .wrap(RateLimit::new(Arc::new(MemoryRateLimiter::new()), config))
            .wrap(TenantResolver::new(token_service))
            .route("/data", web::get().to(ok)),
    )
    .await;

    // Anonymous budget is one request
    let first = test::call_service(&app, test::TestRequest::get().uri("/data").to_request()).await;
    assert_eq!(first.status(), 200);
    let second = test::call_service(&app, test::TestRequest::get().uri("/data").to_request()).await;
    assert_eq!(second.status(), 429);

    // Authenticated traffic is keyed by user at its own ceiling
    let authed = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/data")
            .insert_header(("Authorization", format!("Bearer {}", pair.access_token)))
            .to_request(),
    )
    .await;
    assert_eq!(authed.status(), 200);
    assert_eq!(header_value(&authed, "x-ratelimit-limit"), "50");
}

#[actix_web::test]
async fn test_forwarded_ips_get_separate_buckets() {
    let mut config = tight_config();
    config.default_limit = 1;

    let app = test::init_service(
        App::new()
            .wrap(RateLimit::new(Arc::new(MemoryRateLimiter::new()), config))
            .route("/data", web::get().to(ok)),
    )
    .await;

    for ip in ["203.0.113.1", "203.0.113.2", "203.0.113.3"] {
        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/data")
                .insert_header(("X-Forwarded-For", ip))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), 200);
    }

    // The first identity is exhausted, others are untouched
    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/data")
            .insert_header(("X-Forwarded-For", "203.0.113.1"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 429);
}

#[actix_web::test]
async fn test_disabled_middleware_passes_everything() {
    let config = RateLimitConfig {
        enabled: false,
        ..tight_config()
    };

    let app = test::init_service(
        App::new()
            .wrap(RateLimit::new(Arc::new(MemoryRateLimiter::new()), config))
            .route("/data", web::get().to(ok)),
    )
    .await;

    for _ in 0..20 {
        let resp =
            test::call_service(&app, test::TestRequest::get().uri("/data").to_request()).await;
        assert_eq!(resp.status(), 200);
        assert!(resp.headers().get("x-ratelimit-limit").is_none());
    }
}

/// Limiter stub that reports the store as unreachable
struct UnreachableStoreLimiter {
    fail_open: bool,
}

#[async_trait::async_trait]
impl vt_core::services::rate_limit::RateLimiter for UnreachableStoreLimiter {
    async fn check(
        &self,
        _key: &vt_core::services::rate_limit::RateLimitKey,
        quota: vt_core::services::rate_limit::RateLimitQuota,
    ) -> vt_core::services::rate_limit::RateLimitDecision {
        let now = chrono::Utc::now().timestamp();
        if self.fail_open {
            vt_core::services::rate_limit::RateLimitDecision::fail_open(quota, now)
        } else {
            vt_core::services::rate_limit::RateLimitDecision::fail_closed(quota, now)
        }
    }
}

#[actix_web::test]
async fn test_unreachable_store_fails_open() {
    let app = test::init_service(
        App::new()
            .wrap(RateLimit::new(
                Arc::new(UnreachableStoreLimiter { fail_open: true }),
                tight_config(),
            ))
            .route("/data", web::get().to(ok)),
    )
    .await;

    // Far more requests than the limit, all admitted with no throttling
    for _ in 0..20 {
        let resp =
            test::call_service(&app, test::TestRequest::get().uri("/data").to_request()).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(header_value(&resp, "x-ratelimit-remaining"), "5");
    }
}

#[actix_web::test]
async fn test_unreachable_store_fails_closed_when_configured() {
    let app = test::init_service(
        App::new()
            .wrap(RateLimit::new(
                Arc::new(UnreachableStoreLimiter { fail_open: false }),
                tight_config(),
            ))
            .route("/data", web::get().to(ok)),
    )
    .await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/data").to_request()).await;
    assert_eq!(resp.status(), 429);
}
