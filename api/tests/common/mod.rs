//! Shared fixtures for API integration tests
//!
//! In-memory implementations of the repository and store interfaces so the
//! full middleware + route stack can be exercised without Postgres or Redis.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use vt_core::domain::entities::organization::Organization;
use vt_core::domain::entities::user::User;
use vt_core::errors::{AuthError, DomainError, StoreError};
use vt_core::repositories::{OrganizationRepository, RevocationStore, UserRepository};
use vt_core::services::auth::AuthService;
use vt_core::services::token::{TokenConfig, TokenService};

/// In-memory user repository
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<Uuid, User>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(DomainError::Auth(AuthError::EmailAlreadyRegistered));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update_last_login(
        &self,
        id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        match self.users.write().await.get_mut(&id) {
            Some(user) => {
                user.last_login_at = Some(at);
                Ok(())
            }
            None => Err(DomainError::Auth(AuthError::UserNotFound)),
        }
    }
}

/// In-memory organization repository
#[derive(Default)]
pub struct InMemoryOrganizationRepository {
    organizations: RwLock<HashMap<Uuid, Organization>>,
}

#[async_trait]
impl OrganizationRepository for InMemoryOrganizationRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Organization>, DomainError> {
        Ok(self.organizations.read().await.get(&id).cloned())
    }

    async fn create(&self, organization: Organization) -> Result<Organization, DomainError> {
        self.organizations
            .write()
            .await
            .insert(organization.id, organization.clone());
        Ok(organization)
    }
}

/// In-memory revocation store with an optional disabled mode
pub struct InMemoryRevocationStore {
    enabled: bool,
    blacklisted: RwLock<HashSet<String>>,
    markers: RwLock<HashMap<Uuid, DateTime<Utc>>>,
}

impl InMemoryRevocationStore {
    pub fn new() -> Self {
        Self {
            enabled: true,
            blacklisted: RwLock::new(HashSet::new()),
            markers: RwLock::new(HashMap::new()),
        }
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::new()
        }
    }
}

#[async_trait]
impl RevocationStore for InMemoryRevocationStore {
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
        self.markers.write().await.insert(user_id, Utc::now());
        Ok(())
    }

    async fn revoked_since(
        &self,
        user_id: Uuid,
    ) -> Result<Option<DateTime<Utc>>, StoreError> {
        if !self.enabled {
            return Ok(None);
        }
        Ok(self.markers.read().await.get(&user_id).copied())
    }
}

pub type TestAppState = vt_api::routes::AppState<
    InMemoryUserRepository,
    InMemoryOrganizationRepository,
    InMemoryRevocationStore,
>;

pub type TestTokenService = TokenService<InMemoryRevocationStore>;

/// Build an app state plus a handle on its token service
pub fn test_state(store: InMemoryRevocationStore) -> (TestAppState, Arc<TestTokenService>) {
    let users = Arc::new(InMemoryUserRepository::default());
    let organizations = Arc::new(InMemoryOrganizationRepository::default());
    let token_service = Arc::new(TokenService::new(store, TokenConfig::default()));

    let auth_service = AuthService::new(users, organizations, Arc::clone(&token_service));

    (TestAppState { auth_service }, token_service)
}
