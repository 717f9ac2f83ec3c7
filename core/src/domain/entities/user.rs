//! User entity representing a registered account in a tenant organization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User entity scoped to a tenant organization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier for the user
    pub id: Uuid,

    /// Organization this user belongs to
    pub organization_id: Uuid,

    /// Email address, unique across the platform
    pub email: String,

    /// Bcrypt hash of the user's password
    #[serde(skip_serializing)]
    pub hashed_password: String,

    /// Display name
    pub full_name: Option<String>,

    /// Whether the account may authenticate
    pub is_active: bool,

    /// Whether the user has platform-wide privileges
    pub is_superuser: bool,

    /// Timestamp when the user was created
    pub created_at: DateTime<Utc>,

    /// Timestamp of the user's last successful login
    pub last_login_at: Option<DateTime<Utc>>,
}

impl User {
    /// Creates a new active, non-superuser account
    pub fn new(
        organization_id: Uuid,
        email: String,
        hashed_password: String,
        full_name: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            organization_id,
            email,
            hashed_password,
            full_name,
            is_active: true,
            is_superuser: false,
            created_at: Utc::now(),
            last_login_at: None,
        }
    }

    /// Updates the last login timestamp
    pub fn touch_last_login(&mut self) {
        self.last_login_at = Some(Utc::now());
    }

    /// Deactivates the account
    pub fn deactivate(&mut self) {
        self.is_active = false;
    }
}
