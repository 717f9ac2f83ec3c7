//! Organization entity, the tenant boundary of the platform.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Tenant organization owning users and their data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    /// Unique identifier for the organization
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// URL-safe identifier derived from the name
    pub slug: String,

    /// Whether the organization may be used
    pub is_active: bool,

    /// Timestamp when the organization was created
    pub created_at: DateTime<Utc>,
}

impl Organization {
    /// Creates a new active organization, deriving the slug from the name
    pub fn new(name: String) -> Self {
        let slug = name.trim().to_lowercase().replace(' ', "-");
        Self {
            id: Uuid::new_v4(),
            name,
            slug,
            is_active: true,
            created_at: Utc::now(),
        }
    }
}
