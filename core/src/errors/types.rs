//! Error type definitions for authentication, token management and the
//! revocation store.
//!
//! Token failure reasons are distinguished here so they can be logged, but
//! the API layer collapses all of them into a single unauthorized signal so
//! callers cannot probe revocation state.

use thiserror::Error;

/// Authentication-related errors
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Incorrect email or password")]
    InvalidCredentials,

    #[error("User account is inactive")]
    AccountInactive,

    #[error("Email already registered")]
    EmailAlreadyRegistered,

    #[error("User not found")]
    UserNotFound,

    #[error("Organization not found")]
    OrganizationNotFound,

    #[error("Organization is inactive")]
    OrganizationInactive,

    #[error("Authentication required")]
    AuthenticationRequired,
}

/// Token-related errors
#[derive(Error, Debug)]
pub enum TokenError {
    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token format")]
    InvalidTokenFormat,

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Invalid claims")]
    InvalidClaims,

    #[error("Wrong token type, expected {expected}")]
    WrongTokenType { expected: String },

    #[error("Token revoked")]
    TokenRevoked,

    #[error("Token generation failed")]
    TokenGenerationFailed,
}

/// Revocation store errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Revocation store is disabled")]
    Disabled,

    #[error("Revocation store unavailable: {message}")]
    Unavailable { message: String },
}
