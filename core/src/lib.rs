//! # Vantage Core
//!
//! Core business logic and domain layer for the Vantage backend.
//! This crate contains domain entities, the token lifecycle and rate-limit
//! services, repository interfaces, and error types that form the foundation
//! of the application architecture.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use errors::{AuthError, DomainError, DomainResult, StoreError, TokenError};
pub use repositories::{OrganizationRepository, RevocationStore, UserRepository};
pub use services::auth::AuthService;
pub use services::rate_limit::{RateLimitDecision, RateLimitKey, RateLimitQuota, RateLimiter};
pub use services::token::{TokenCodec, TokenConfig, TokenService};
