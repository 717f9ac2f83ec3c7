//! Authentication configuration

use serde::{Deserialize, Serialize};

/// Minimum acceptable length for the JWT signing secret
pub const MIN_SECRET_LENGTH: usize = 32;

/// JWT signing configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// JWT secret key for signing tokens
    pub secret: String,

    /// Access token expiry time in minutes
    pub access_token_expire_minutes: i64,

    /// Refresh token expiry time in days
    pub refresh_token_expire_days: i64,

    /// JWT issuer claim
    pub issuer: String,

    /// JWT audience claim
    pub audience: String,

    /// Algorithm for JWT signing (default: HS256)
    #[serde(default = "default_algorithm")]
    pub algorithm: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::from("development-secret-please-change-in-production"),
            access_token_expire_minutes: 30,
            refresh_token_expire_days: 7,
            issuer: String::from("vantage"),
            audience: String::from("vantage-api"),
            algorithm: default_algorithm(),
        }
    }
}

impl JwtConfig {
    /// Create a new JWT configuration with secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    /// Create from environment variables
    pub fn from_env() -> Self {
        let secret = std::env::var("JWT_SECRET")
            .unwrap_or_else(|_| "development-secret-please-change-in-production".to_string());
        let access_token_expire_minutes = std::env::var("ACCESS_TOKEN_EXPIRE_MINUTES")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .unwrap_or(30);
        let refresh_token_expire_days = std::env::var("REFRESH_TOKEN_EXPIRE_DAYS")
            .unwrap_or_else(|_| "7".to_string())
            .parse()
            .unwrap_or(7);
        let algorithm =
            std::env::var("JWT_ALGORITHM").unwrap_or_else(|_| default_algorithm());

        Self {
            secret,
            access_token_expire_minutes,
            refresh_token_expire_days,
            algorithm,
            ..Default::default()
        }
    }

    /// Set access token expiry in minutes
    pub fn with_access_expiry_minutes(mut self, minutes: i64) -> Self {
        self.access_token_expire_minutes = minutes;
        self
    }

    /// Set refresh token expiry in days
    pub fn with_refresh_expiry_days(mut self, days: i64) -> Self {
        self.refresh_token_expire_days = days;
        self
    }

    /// Access token lifetime in seconds
    pub fn access_token_expiry_seconds(&self) -> i64 {
        self.access_token_expire_minutes * 60
    }

    /// Refresh token lifetime in seconds
    pub fn refresh_token_expiry_seconds(&self) -> i64 {
        self.refresh_token_expire_days * 86400
    }

    /// Check if using default secret (security warning)
    pub fn is_using_default_secret(&self) -> bool {
        self.secret == "development-secret-please-change-in-production"
    }

    /// Check whether the secret is strong enough to serve traffic
    pub fn has_valid_secret(&self) -> bool {
        !self.is_using_default_secret() && self.secret.len() >= MIN_SECRET_LENGTH
    }
}

fn default_algorithm() -> String {
    String::from("HS256")
}
