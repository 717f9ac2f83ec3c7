//! Organization repository trait defining the interface to the row store.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::organization::Organization;
use crate::errors::DomainError;

/// Repository trait for Organization entity persistence operations
#[async_trait]
pub trait OrganizationRepository: Send + Sync {
    /// Find an organization by its unique identifier
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Organization>, DomainError>;

    /// Persist a new organization
    async fn create(&self, organization: Organization) -> Result<Organization, DomainError>;
}
