//! Stateless signing and verification of session tokens

use chrono::Duration;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::domain::entities::token::{Claims, TokenKind, JWT_AUDIENCE, JWT_ISSUER};
use crate::errors::TokenError;

use super::config::TokenConfig;

/// Signs and verifies compact session tokens
///
/// Pure aside from the clock and jti randomness; all revocation state lives
/// in the [`TokenService`](super::TokenService) above it.
pub struct TokenCodec {
    algorithm: jsonwebtoken::Algorithm,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    /// Creates a codec from the token configuration
    pub fn new(config: &TokenConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        let mut validation = Validation::new(config.algorithm);
        validation.set_issuer(&[JWT_ISSUER]);
        validation.set_audience(&[JWT_AUDIENCE]);
        validation.validate_exp = true;
        // Expiry is exact: a token is invalid the second its exp passes.
        validation.leeway = 0;

        Self {
            algorithm: config.algorithm,
            encoding_key,
            decoding_key,
            validation,
        }
    }

    /// Issues a signed token of the given kind
    ///
    /// Embeds `iat = now`, `exp = now + validity` and a fresh unique `jti`.
    pub fn issue(
        &self,
        user_id: Uuid,
        org_id: Uuid,
        email: Option<String>,
        is_superuser: bool,
        kind: TokenKind,
        validity: Duration,
    ) -> Result<String, TokenError> {
        let claims = Claims::new(user_id, org_id, email, is_superuser, kind, validity);
        self.encode(&claims)
    }

    /// Encodes prepared claims into a signed token
    ///
    /// Crate-visible so tests can mint tokens with doctored timestamps.
    pub(crate) fn encode(&self, claims: &Claims) -> Result<String, TokenError> {
        let header = Header::new(self.algorithm);
        encode(&header, claims, &self.encoding_key)
            .map_err(|_| TokenError::TokenGenerationFailed)
    }

    /// Verifies a token and returns its claims
    ///
    /// Rejects on signature mismatch, expiry, issuer/audience mismatch and
    /// kind mismatch. The distinct error variants are for logging only;
    /// callers must surface them as one uniform unauthorized outcome.
    pub fn verify(&self, token: &str, expected_kind: TokenKind) -> Result<Claims, TokenError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::TokenExpired,
                    jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                        TokenError::InvalidSignature
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidIssuer
                    | jsonwebtoken::errors::ErrorKind::InvalidAudience => {
                        TokenError::InvalidClaims
                    }
                    _ => TokenError::InvalidTokenFormat,
                }
            })?;

        if token_data.claims.kind != expected_kind {
            return Err(TokenError::WrongTokenType {
                expected: expected_kind.to_string(),
            });
        }

        Ok(token_data.claims)
    }
}
