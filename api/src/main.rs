use actix_web::{web, HttpServer};
use log::{error, info, warn};
use std::sync::Arc;

mod app;
mod config;
mod dto;
mod handlers;
mod middleware;
mod routes;

use vt_core::services::auth::AuthService;
use vt_core::services::rate_limit::RateLimiter;
use vt_core::services::token::{TokenConfig, TokenService};
use vt_infra::cache::RedisClient;
use vt_infra::database::{create_pool, PgOrganizationRepository, PgUserRepository};
use vt_infra::services::{RedisRateLimiter, RedisRevocationStore};

use app::create_app;
use middleware::tenant::AccessTokenValidator;
use routes::AppState;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    info!("Starting Vantage API server");

    // Load configuration
    let app_config = config::AppConfig::from_env();
    if let Err(message) = config::validate(&app_config) {
        error!("{}", message);
        std::process::exit(1);
    }

    let token_config = match TokenConfig::from_jwt_config(&app_config.jwt) {
        Ok(token_config) => token_config,
        Err(e) => {
            error!("Invalid token configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Row store is required
    let pool = match create_pool(&app_config.database).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            std::process::exit(1);
        }
    };

    let users = Arc::new(PgUserRepository::new(pool.clone()));
    let organizations = Arc::new(PgOrganizationRepository::new(pool));

    // Redis is optional: without it the revocation store and the rate
    // limiter run disabled, trading enforcement for availability
    let (revocation_store, rate_limiter) = match RedisClient::connect(&app_config.cache).await {
        Ok(client) => (
            RedisRevocationStore::new(client.clone()),
            RedisRateLimiter::new(client, app_config.rate_limit.fail_open),
        ),
        Err(e) => {
            warn!(
                "Redis unreachable, token revocation and rate limiting disabled: {}",
                e
            );
            (
                RedisRevocationStore::disabled(),
                RedisRateLimiter::disabled(app_config.rate_limit.fail_open),
            )
        }
    };

    let token_service = Arc::new(TokenService::new(revocation_store, token_config));
    let validator: Arc<dyn AccessTokenValidator> = token_service.clone();
    let limiter: Arc<dyn RateLimiter> = Arc::new(rate_limiter);

    let auth_service = AuthService::new(users, organizations, token_service);
    let app_state = web::Data::new(AppState { auth_service });

    let bind_address = app_config.server.bind_address();
    info!("Server will bind to: {}", bind_address);

    let rate_limit_config = app_config.rate_limit.clone();
    HttpServer::new(move || {
        create_app(
            app_state.clone(),
            Arc::clone(&validator),
            Arc::clone(&limiter),
            rate_limit_config.clone(),
        )
    })
    .bind(&bind_address)?
    .run()
    .await
}
