//! Mock implementation of OrganizationRepository for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::organization::Organization;
use crate::errors::DomainError;

use super::r#trait::OrganizationRepository;

/// Mock organization repository for testing
pub struct MockOrganizationRepository {
    organizations: Arc<RwLock<HashMap<Uuid, Organization>>>,
}

impl MockOrganizationRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        Self {
            organizations: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for MockOrganizationRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OrganizationRepository for MockOrganizationRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Organization>, DomainError> {
        let organizations = self.organizations.read().await;
        Ok(organizations.get(&id).cloned())
    }

    async fn create(&self, organization: Organization) -> Result<Organization, DomainError> {
        let mut organizations = self.organizations.write().await;
        organizations.insert(organization.id, organization.clone());
        Ok(organization)
    }
}
