//! Token entities for JWT-based authentication.

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT issuer
pub const JWT_ISSUER: &str = "vantage";

/// JWT audience
pub const JWT_AUDIENCE: &str = "vantage-api";

/// Kind of session token, embedded in the claims and immutable once issued
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// Short-lived credential authorizing API calls
    Access,
    /// Long-lived credential exchanged for a new token pair; single-use
    Refresh,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::Access => write!(f, "access"),
            TokenKind::Refresh => write!(f, "refresh"),
        }
    }
}

/// Claims structure for the JWT payload
///
/// Access and refresh tokens carry identical subject/tenant claims; only
/// `type`, `exp` and `jti` differ between the two tokens of a pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,

    /// Tenant (organization) ID
    pub org_id: String,

    /// User email
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Whether the subject is a superuser
    #[serde(default)]
    pub is_superuser: bool,

    /// Token kind
    #[serde(rename = "type")]
    pub kind: TokenKind,

    /// Issued at timestamp (epoch seconds)
    pub iat: i64,

    /// Expiration timestamp (epoch seconds)
    pub exp: i64,

    /// Issuer
    pub iss: String,

    /// Audience
    pub aud: String,

    /// JWT ID (unique identifier for the token)
    pub jti: String,
}

impl Claims {
    /// Creates new claims for a token of the given kind
    ///
    /// # Arguments
    ///
    /// * `user_id` - The user's UUID
    /// * `org_id` - The tenant organization's UUID
    /// * `email` - The user's email address
    /// * `is_superuser` - Whether the user is a superuser
    /// * `kind` - Access or refresh
    /// * `validity` - Lifetime of the token from now
    pub fn new(
        user_id: Uuid,
        org_id: Uuid,
        email: Option<String>,
        is_superuser: bool,
        kind: TokenKind,
        validity: Duration,
    ) -> Self {
        let now = Utc::now();
        let expiry = now + validity;

        Self {
            sub: user_id.to_string(),
            org_id: org_id.to_string(),
            email,
            is_superuser,
            kind,
            iat: now.timestamp(),
            exp: expiry.timestamp(),
            iss: JWT_ISSUER.to_string(),
            aud: JWT_AUDIENCE.to_string(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// Gets the user ID from the claims
    pub fn user_id(&self) -> Result<Uuid, uuid::Error> {
        Uuid::parse_str(&self.sub)
    }

    /// Gets the organization ID from the claims
    pub fn organization_id(&self) -> Result<Uuid, uuid::Error> {
        Uuid::parse_str(&self.org_id)
    }

    /// Checks if the claims have expired
    pub fn is_expired(&self) -> bool {
        let now = Utc::now().timestamp();
        now >= self.exp
    }

    /// Remaining validity from now, floored at zero
    ///
    /// Used as the TTL for blacklist entries so they never outlive the token
    /// they refer to.
    pub fn remaining_validity(&self) -> Duration {
        let remaining = self.exp - Utc::now().timestamp();
        if remaining > 0 {
            Duration::seconds(remaining)
        } else {
            Duration::zero()
        }
    }
}

/// Token pair returned to the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// JWT access token
    pub access_token: String,

    /// JWT refresh token
    pub refresh_token: String,

    /// Token type for the Authorization header
    pub token_type: String,

    /// Access token expiry time in seconds
    pub expires_in: i64,
}

impl TokenPair {
    /// Creates a new token pair
    pub fn new(access_token: String, refresh_token: String, expires_in: i64) -> Self {
        Self {
            access_token,
            refresh_token,
            token_type: "bearer".to_string(),
            expires_in,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_token_claims() {
        let user_id = Uuid::new_v4();
        let org_id = Uuid::new_v4();
        let claims = Claims::new(
            user_id,
            org_id,
            Some("user@example.com".to_string()),
            false,
            TokenKind::Access,
            Duration::minutes(30),
        );

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.org_id, org_id.to_string());
        assert_eq!(claims.iss, JWT_ISSUER);
        assert_eq!(claims.aud, JWT_AUDIENCE);
        assert_eq!(claims.kind, TokenKind::Access);
        assert_eq!(claims.exp - claims.iat, 30 * 60);
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_refresh_token_claims() {
        let user_id = Uuid::new_v4();
        let org_id = Uuid::new_v4();
        let claims = Claims::new(
            user_id,
            org_id,
            Some("user@example.com".to_string()),
            true,
            TokenKind::Refresh,
            Duration::days(7),
        );

        assert_eq!(claims.kind, TokenKind::Refresh);
        assert!(claims.is_superuser);
        assert_eq!(claims.exp - claims.iat, 7 * 86400);
    }

    #[test]
    fn test_claims_id_parsing() {
        let user_id = Uuid::new_v4();
        let org_id = Uuid::new_v4();
        let claims = Claims::new(user_id, org_id, None, false, TokenKind::Access, Duration::minutes(1));

        assert_eq!(claims.user_id().unwrap(), user_id);
        assert_eq!(claims.organization_id().unwrap(), org_id);
    }

    #[test]
    fn test_claims_expiration() {
        let mut claims = Claims::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            None,
            false,
            TokenKind::Access,
            Duration::minutes(1),
        );

        claims.exp = Utc::now().timestamp() - 1;

        assert!(claims.is_expired());
        assert_eq!(claims.remaining_validity(), Duration::zero());
    }

    #[test]
    fn test_token_kind_wire_format() {
        let access = serde_json::to_string(&TokenKind::Access).unwrap();
        let refresh = serde_json::to_string(&TokenKind::Refresh).unwrap();

        assert_eq!(access, "\"access\"");
        assert_eq!(refresh, "\"refresh\"");
    }

    #[test]
    fn test_claims_serialization_uses_type_field() {
        let claims = Claims::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            Some("user@example.com".to_string()),
            false,
            TokenKind::Refresh,
            Duration::days(7),
        );

        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["type"], "refresh");

        let roundtrip: Claims = serde_json::from_value(json).unwrap();
        assert_eq!(roundtrip, claims);
    }

    #[test]
    fn test_token_pair_creation() {
        let pair = TokenPair::new("access".to_string(), "refresh".to_string(), 1800);

        assert_eq!(pair.token_type, "bearer");
        assert_eq!(pair.expires_in, 1800);
    }
}
