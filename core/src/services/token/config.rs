//! Configuration for the token service

use chrono::Duration;
use jsonwebtoken::Algorithm;

use crate::errors::DomainError;

/// Configuration for the token service
#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// JWT signing secret
    pub secret: String,
    /// JWT signing algorithm
    pub algorithm: Algorithm,
    /// Access token expiry in minutes
    pub access_token_expire_minutes: i64,
    /// Refresh token expiry in days
    pub refresh_token_expire_days: i64,
    /// Availability policy for revocation reads: when the store errors at
    /// check time, `true` treats the token as not revoked, `false`
    /// propagates the failure.
    pub revocation_fail_open: bool,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            secret: "development-secret-please-change-in-production".to_string(),
            algorithm: Algorithm::HS256,
            access_token_expire_minutes: 30,
            refresh_token_expire_days: 7,
            revocation_fail_open: true,
        }
    }
}

impl TokenConfig {
    /// Build from the shared JWT configuration
    ///
    /// Fails when the configured algorithm name is not recognized; a
    /// misconfigured signing setup must prevent the process from serving
    /// traffic.
    pub fn from_jwt_config(config: &vt_shared::JwtConfig) -> Result<Self, DomainError> {
        let algorithm = config
            .algorithm
            .parse::<Algorithm>()
            .map_err(|_| DomainError::Validation {
                message: format!("Unknown JWT algorithm: {}", config.algorithm),
            })?;

        Ok(Self {
            secret: config.secret.clone(),
            algorithm,
            access_token_expire_minutes: config.access_token_expire_minutes,
            refresh_token_expire_days: config.refresh_token_expire_days,
            revocation_fail_open: std::env::var("REVOCATION_FAIL_OPEN")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
        })
    }

    /// Access token lifetime
    pub fn access_validity(&self) -> Duration {
        Duration::minutes(self.access_token_expire_minutes)
    }

    /// Refresh token lifetime
    pub fn refresh_validity(&self) -> Duration {
        Duration::days(self.refresh_token_expire_days)
    }
}
