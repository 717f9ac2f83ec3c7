//! Redis-backed revocation store
//!
//! Tracks blacklisted tokens under `blacklist:<digest>` and per-user
//! revoke-all markers under `user_revoke_all:<user_id>`. Every entry carries
//! a TTL sized to the token lifetime it covers, so the store cleans itself
//! up and never needs an explicit sweep.

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use redis::AsyncCommands;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use vt_core::errors::StoreError;
use vt_core::repositories::RevocationStore;

use crate::cache::RedisClient;

/// Redis implementation of the revocation store
///
/// Constructed in disabled mode when Redis is unreachable at startup: read
/// checks then answer "not revoked" while writes report
/// [`StoreError::Disabled`], so explicit revocation fails closed. This is
/// the documented availability-over-enforcement trade-off.
pub struct RedisRevocationStore {
    client: Option<RedisClient>,
}

impl RedisRevocationStore {
    /// Create a store backed by a live Redis connection
    pub fn new(client: RedisClient) -> Self {
        Self {
            client: Some(client),
        }
    }

    /// Create a disabled store for when Redis is unavailable
    pub fn disabled() -> Self {
        Self { client: None }
    }

    /// Blacklist keys are token digests, keeping raw credentials out of the
    /// store and key sizes bounded
    fn blacklist_key(token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        format!("blacklist:{:x}", hasher.finalize())
    }

    fn revoke_all_key(user_id: Uuid) -> String {
        format!("user_revoke_all:{}", user_id)
    }

    fn unavailable(e: redis::RedisError) -> StoreError {
        StoreError::Unavailable {
            message: e.to_string(),
        }
    }
}

#[async_trait]
impl RevocationStore for RedisRevocationStore {
    fn is_enabled(&self) -> bool {
        self.client.is_some()
    }

    async fn blacklist(&self, token: &str, ttl: Duration) -> Result<(), StoreError> {
        let Some(client) = &self.client else {
            return Err(StoreError::Disabled);
        };

        let mut conn = client.get_connection();
        // A token on its last second still gets a one-second entry
        let ttl_seconds = ttl.num_seconds().max(1) as u64;

        conn.set_ex::<_, _, ()>(Self::blacklist_key(token), "1", ttl_seconds)
            .await
            .map_err(Self::unavailable)
    }

    async fn is_blacklisted(&self, token: &str) -> Result<bool, StoreError> {
        let Some(client) = &self.client else {
            return Ok(false);
        };

        let mut conn = client.get_connection();
        conn.exists(Self::blacklist_key(token))
            .await
            .map_err(Self::unavailable)
    }

    async fn revoke_all(&self, user_id: Uuid, ttl: Duration) -> Result<(), StoreError> {
        let Some(client) = &self.client else {
            return Err(StoreError::Disabled);
        };

        let mut conn = client.get_connection();
        let ttl_seconds = ttl.num_seconds().max(1) as u64;
        // Millisecond precision: tokens issued earlier in the same second as
        // the marker must still be caught
        let marker = Utc::now().timestamp_millis();

        conn.set_ex::<_, _, ()>(Self::revoke_all_key(user_id), marker, ttl_seconds)
            .await
            .map_err(Self::unavailable)
    }

    async fn revoked_since(
        &self,
        user_id: Uuid,
    ) -> Result<Option<DateTime<Utc>>, StoreError> {
        let Some(client) = &self.client else {
            return Ok(None);
        };

        let mut conn = client.get_connection();
        let marker: Option<i64> = conn
            .get(Self::revoke_all_key(user_id))
            .await
            .map_err(Self::unavailable)?;

        Ok(marker.and_then(|ms| Utc.timestamp_millis_opt(ms).single()))
    }
}
