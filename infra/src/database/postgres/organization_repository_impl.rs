//! PostgreSQL implementation of the OrganizationRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use vt_core::domain::entities::organization::Organization;
use vt_core::errors::DomainError;
use vt_core::repositories::OrganizationRepository;

/// PostgreSQL implementation of OrganizationRepository
pub struct PgOrganizationRepository {
    /// Database connection pool
    pool: PgPool,
}

impl PgOrganizationRepository {
    /// Create a new PostgreSQL organization repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Row shape of the `organizations` table
#[derive(sqlx::FromRow)]
struct OrganizationRow {
    id: Uuid,
    name: String,
    slug: String,
    is_active: bool,
    created_at: DateTime<Utc>,
}

impl From<OrganizationRow> for Organization {
    fn from(row: OrganizationRow) -> Self {
        Organization {
            id: row.id,
            name: row.name,
            slug: row.slug,
            is_active: row.is_active,
            created_at: row.created_at,
        }
    }
}

fn internal(context: &str, e: sqlx::Error) -> DomainError {
    DomainError::Internal {
        message: format!("{}: {}", context, e),
    }
}

#[async_trait]
impl OrganizationRepository for PgOrganizationRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Organization>, DomainError> {
        let row = sqlx::query_as::<_, OrganizationRow>(
            "SELECT id, name, slug, is_active, created_at FROM organizations WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| internal("Failed to find organization", e))?;

        Ok(row.map(Organization::from))
    }

    async fn create(&self, organization: Organization) -> Result<Organization, DomainError> {
        sqlx::query(
            "INSERT INTO organizations (id, name, slug, is_active, created_at) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(organization.id)
        .bind(&organization.name)
        .bind(&organization.slug)
        .bind(organization.is_active)
        .bind(organization.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| internal("Failed to create organization", e))?;

        Ok(organization)
    }
}
