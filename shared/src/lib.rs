//! Shared utilities and common types for the Vantage server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types
//! - Common response structures

pub mod config;
pub mod types;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, CacheConfig, DatabaseConfig, Environment, JwtConfig, RateLimitConfig,
    ServerConfig,
};
pub use types::response::ErrorResponse;
