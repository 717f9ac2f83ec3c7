//! Token service module for the session token lifecycle
//!
//! This module handles all token-related operations:
//! - JWT signing and verification (codec)
//! - Token pair issuance and refresh-with-rotation
//! - Revocation of individual tokens and of all tokens of a user

mod codec;
mod config;
mod service;

#[cfg(test)]
mod tests;

pub use codec::TokenCodec;
pub use config::TokenConfig;
pub use service::TokenService;
