//! Revocation store trait tracking blacklisted tokens and revoke-all markers.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::errors::StoreError;

/// Remote key-value store tracking token revocation state
///
/// Two kinds of entries are kept:
/// - blacklist entries for individual tokens, living exactly as long as the
///   token they refer to (self-expiring, never cleaned up explicitly)
/// - a per-user "revoke-all-before" timestamp invalidating every token
///   issued before it, living as long as the longest possible refresh token
///
/// Implementations must support a disabled mode: when the backing store is
/// unreachable, read checks answer "not revoked" (availability over strict
/// enforcement) while writes fail so explicit revocation can fail closed.
#[async_trait]
pub trait RevocationStore: Send + Sync {
    /// Whether the store can currently honor revocation writes
    fn is_enabled(&self) -> bool;

    /// Record a token as revoked for `ttl`
    ///
    /// `ttl` is the remaining lifetime of the token, so the entry never
    /// outlives the token it refers to.
    async fn blacklist(&self, token: &str, ttl: Duration) -> Result<(), StoreError>;

    /// Check whether a token has been blacklisted
    async fn is_blacklisted(&self, token: &str) -> Result<bool, StoreError>;

    /// Mark every token of the user issued before now as revoked
    ///
    /// `ttl` is the maximum configured refresh-token lifetime, guaranteeing
    /// the marker outlives any token it could affect.
    async fn revoke_all(&self, user_id: Uuid, ttl: Duration) -> Result<(), StoreError>;

    /// Return the revoke-all marker for the user, if one is set
    async fn revoked_since(
        &self,
        user_id: Uuid,
    ) -> Result<Option<DateTime<Utc>>, StoreError>;
}
