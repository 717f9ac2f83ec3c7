//! Mock implementation of RevocationStore for testing

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::StoreError;

use super::r#trait::RevocationStore;

/// In-memory revocation store for tests
///
/// TTLs are accepted but not enforced; tests never run long enough for a
/// blacklist entry to expire.
pub struct MockRevocationStore {
    enabled: bool,
    blacklisted: Arc<RwLock<HashSet<String>>>,
    revoke_markers: Arc<RwLock<HashMap<Uuid, DateTime<Utc>>>>,
}

impl MockRevocationStore {
    /// Create an enabled mock store
    pub fn new() -> Self {
        Self {
            enabled: true,
            blacklisted: Arc::new(RwLock::new(HashSet::new())),
            revoke_markers: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Create a disabled mock store, as when Redis is unreachable at startup
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::new()
        }
    }

    /// Backdate (or otherwise overwrite) a revoke-all marker
    pub async fn set_marker(&self, user_id: Uuid, at: DateTime<Utc>) {
        self.revoke_markers.write().await.insert(user_id, at);
    }
}

impl Default for MockRevocationStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RevocationStore for MockRevocationStore {
    fn is_enabled(&self) -> bool {
        self.enabled
    }

    async fn blacklist(&self, token: &str, _ttl: Duration) -> Result<(), StoreError> {
        if !self.enabled {
            return Err(StoreError::Disabled);
        }
        self.blacklisted.write().await.insert(token.to_string());
        Ok(())
    }

    async fn is_blacklisted(&self, token: &str) -> Result<bool, StoreError> {
        if !self.enabled {
            return Ok(false);
        }
        Ok(self.blacklisted.read().await.contains(token))
    }

    async fn revoke_all(&self, user_id: Uuid, _ttl: Duration) -> Result<(), StoreError> {
        if !self.enabled {
            return Err(StoreError::Disabled);
        }
        self.revoke_markers.write().await.insert(user_id, Utc::now());
        Ok(())
    }

    async fn revoked_since(
        &self,
        user_id: Uuid,
    ) -> Result<Option<DateTime<Utc>>, StoreError> {
        if !self.enabled {
            return Ok(None);
        }
        Ok(self.revoke_markers.read().await.get(&user_id).copied())
    }
}
