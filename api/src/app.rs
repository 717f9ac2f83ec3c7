//! Application factory
//!
//! Wires middleware and routes. The processing chain, outermost first:
//! logging, CORS, tenant resolution, rate limiting, route handlers. Tenant
//! resolution runs before the rate limiter so authenticated traffic is
//! keyed and budgeted by user rather than by IP.

use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    middleware::Logger,
    web, App, Error, HttpResponse,
};
use std::sync::Arc;

use vt_core::repositories::{OrganizationRepository, RevocationStore, UserRepository};
use vt_core::services::rate_limit::RateLimiter;
use vt_shared::config::rate_limit::RateLimitConfig;

use crate::middleware::cors::create_cors;
use crate::middleware::rate_limit::RateLimit;
use crate::middleware::tenant::{AccessTokenValidator, TenantResolver};
use crate::routes::auth::{login::login, logout::logout, me::me, refresh::refresh, register::register};
use crate::routes::AppState;

/// Create and configure the application with all dependencies
pub fn create_app<U, O, R>(
    app_state: web::Data<AppState<U, O, R>>,
    validator: Arc<dyn AccessTokenValidator>,
    limiter: Arc<dyn RateLimiter>,
    rate_limit_config: RateLimitConfig,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
>
where
    U: UserRepository + 'static,
    O: OrganizationRepository + 'static,
    R: RevocationStore + 'static,
{
    let cors = create_cors();

    App::new()
        // Add application state
        .app_data(app_state)
        // Middleware execute bottom-up: Logger first, rate limiting last
        // before the handlers
        .wrap(RateLimit::new(limiter, rate_limit_config))
        .wrap(TenantResolver::new(validator))
        .wrap(cors)
        .wrap(Logger::default())
        // Health check endpoint
        .route("/health", web::get().to(health_check))
        // API v1 routes
        .service(
            web::scope("/api/v1").service(
                web::scope("/auth")
                    .route("/register", web::post().to(register::<U, O, R>))
                    .route("/login", web::post().to(login::<U, O, R>))
                    .route("/refresh", web::post().to(refresh::<U, O, R>))
                    .route("/logout", web::post().to(logout::<U, O, R>))
                    .route("/me", web::get().to(me::<U, O, R>)),
            ),
        )
        // Default 404 handler
        .default_service(web::route().to(not_found))
}

/// Health check endpoint handler
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "vantage-api",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({
        "error": "not_found",
        "message": "The requested resource was not found"
    }))
}
