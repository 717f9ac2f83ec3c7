//! Token lifecycle service: issuance, refresh-with-rotation, revocation

use tracing::warn;
use uuid::Uuid;

use crate::domain::entities::token::{Claims, TokenKind, TokenPair};
use crate::errors::{DomainError, DomainResult, TokenError};
use crate::repositories::RevocationStore;

use super::codec::TokenCodec;
use super::config::TokenConfig;

/// Service managing the session token lifecycle
///
/// Per token the lifecycle is `issued → valid → {blacklisted | expired |
/// revoked-by-marker}`; terminal states are never revisited. The revocation
/// store is resolved at construction time and never swapped afterwards.
pub struct TokenService<R: RevocationStore> {
    codec: TokenCodec,
    store: R,
    config: TokenConfig,
}

impl<R: RevocationStore> TokenService<R> {
    /// Creates a new token service with its revocation store dependency
    pub fn new(store: R, config: TokenConfig) -> Self {
        let codec = TokenCodec::new(&config);
        Self {
            codec,
            store,
            config,
        }
    }

    /// The underlying codec
    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    /// Issues an access + refresh token pair for a user
    ///
    /// Both tokens carry identical subject/tenant claims; `expires_in`
    /// reports the access token lifetime in seconds.
    pub fn create_pair(
        &self,
        user_id: Uuid,
        org_id: Uuid,
        email: &str,
        is_superuser: bool,
    ) -> DomainResult<TokenPair> {
        let access_token = self.codec.issue(
            user_id,
            org_id,
            Some(email.to_string()),
            is_superuser,
            TokenKind::Access,
            self.config.access_validity(),
        )?;

        let refresh_token = self.codec.issue(
            user_id,
            org_id,
            Some(email.to_string()),
            is_superuser,
            TokenKind::Refresh,
            self.config.refresh_validity(),
        )?;

        Ok(TokenPair::new(
            access_token,
            refresh_token,
            self.config.access_validity().num_seconds(),
        ))
    }

    /// Exchanges a refresh token for a new pair, rotating it
    ///
    /// The presented token is blacklisted for its remaining validity BEFORE
    /// the new pair is issued: a refresh token is single-use, and any reuse
    /// of an already-rotated token fails purely through the blacklist even
    /// though its signature and expiry are still technically valid.
    pub async fn refresh(
        &self,
        refresh_token: &str,
        email: &str,
        is_superuser: bool,
    ) -> DomainResult<TokenPair> {
        let claims = self.codec.verify(refresh_token, TokenKind::Refresh)?;

        if self.store.is_enabled() {
            if self.check_blacklisted(refresh_token).await? {
                return Err(TokenError::TokenRevoked.into());
            }
            if self.check_revoked_by_marker(&claims).await? {
                return Err(TokenError::TokenRevoked.into());
            }

            // Rotation. If this write fails the refresh fails with it: a new
            // pair must never exist while the old token is still usable.
            self.store
                .blacklist(refresh_token, claims.remaining_validity())
                .await?;
        }

        let user_id = claims.user_id().map_err(|_| TokenError::InvalidClaims)?;
        let org_id = claims
            .organization_id()
            .map_err(|_| TokenError::InvalidClaims)?;

        self.create_pair(user_id, org_id, email, is_superuser)
    }

    /// Revokes a single token by blacklisting it for its remaining lifetime
    ///
    /// Returns `false` when the revocation store cannot honor the write
    /// (disabled or unreachable): an explicit revoke fails closed.
    pub async fn revoke(&self, token: &str, kind: TokenKind) -> DomainResult<bool> {
        if !self.store.is_enabled() {
            return Ok(false);
        }

        let claims = self.codec.verify(token, kind)?;

        match self
            .store
            .blacklist(token, claims.remaining_validity())
            .await
        {
            Ok(()) => Ok(true),
            Err(e) => {
                warn!("Token revocation failed: {}", e);
                Ok(false)
            }
        }
    }

    /// Revokes every outstanding token of a user
    ///
    /// Writes a revoke-all marker at the current time; tokens issued
    /// strictly before the marker are invalid at their next validation,
    /// tokens issued at or after it keep their standing. Returns `false`
    /// when the store cannot honor the write.
    pub async fn revoke_all(&self, user_id: Uuid) -> DomainResult<bool> {
        if !self.store.is_enabled() {
            return Ok(false);
        }

        match self
            .store
            .revoke_all(user_id, self.config.refresh_validity())
            .await
        {
            Ok(()) => Ok(true),
            Err(e) => {
                warn!(user_id = %user_id, "Revoke-all failed: {}", e);
                Ok(false)
            }
        }
    }

    /// Validates a token of the given kind against every revocation source
    ///
    /// Checks short-circuit cheapest first: signature/expiry/kind (pure
    /// CPU), then the blacklist, then the revoke-all marker.
    pub async fn validate(&self, token: &str, kind: TokenKind) -> DomainResult<Claims> {
        let claims = self.codec.verify(token, kind)?;

        if self.store.is_enabled() {
            if self.check_blacklisted(token).await? {
                return Err(TokenError::TokenRevoked.into());
            }
            if self.check_revoked_by_marker(&claims).await? {
                return Err(TokenError::TokenRevoked.into());
            }
        }

        Ok(claims)
    }

    /// Blacklist lookup honoring the configured availability policy
    async fn check_blacklisted(&self, token: &str) -> DomainResult<bool> {
        match self.store.is_blacklisted(token).await {
            Ok(hit) => Ok(hit),
            Err(e) if self.config.revocation_fail_open => {
                warn!("Blacklist check failed, treating token as not revoked: {}", e);
                Ok(false)
            }
            Err(e) => Err(DomainError::Store(e)),
        }
    }

    /// Revoke-all marker lookup honoring the configured availability policy
    async fn check_revoked_by_marker(&self, claims: &Claims) -> DomainResult<bool> {
        let user_id = claims.user_id().map_err(|_| TokenError::InvalidClaims)?;

        match self.store.revoked_since(user_id).await {
            // The marker keeps millisecond precision while iat truncates to
            // whole seconds, so a token issued earlier in the same second as
            // the revocation is still caught.
            Ok(Some(marker)) => Ok(claims.iat * 1000 < marker.timestamp_millis()),
            Ok(None) => Ok(false),
            Err(e) if self.config.revocation_fail_open => {
                warn!("Revoke-all check failed, treating token as not revoked: {}", e);
                Ok(false)
            }
            Err(e) => Err(DomainError::Store(e)),
        }
    }
}
