//! # Infrastructure Layer
//!
//! Concrete implementations of the core layer's external collaborators:
//! - **Database**: PostgreSQL repositories using SQLx
//! - **Cache**: Redis client backing token revocation and rate limiting
//! - **Services**: Redis revocation store and sliding-window rate limiter

pub mod cache;
pub mod database;
pub mod services;

use thiserror::Error;

/// Infrastructure-level errors
#[derive(Error, Debug)]
pub enum InfrastructureError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}
