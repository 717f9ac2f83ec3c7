//! Database module - PostgreSQL implementations using SQLx

pub mod postgres;

pub use postgres::{PgOrganizationRepository, PgUserRepository};

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;

use vt_shared::config::database::DatabaseConfig;

use crate::InfrastructureError;

/// Create a PostgreSQL connection pool from configuration
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, InfrastructureError> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout))
        .connect(&config.url)
        .await
        .map_err(InfrastructureError::Database)
}
