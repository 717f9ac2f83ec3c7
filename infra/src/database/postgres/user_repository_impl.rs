//! PostgreSQL implementation of the UserRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use vt_core::domain::entities::user::User;
use vt_core::errors::{AuthError, DomainError};
use vt_core::repositories::UserRepository;

/// PostgreSQL implementation of UserRepository
pub struct PgUserRepository {
    /// Database connection pool
    pool: PgPool,
}

impl PgUserRepository {
    /// Create a new PostgreSQL user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Row shape of the `users` table
#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    organization_id: Uuid,
    email: String,
    hashed_password: String,
    full_name: Option<String>,
    is_active: bool,
    is_superuser: bool,
    created_at: DateTime<Utc>,
    last_login_at: Option<DateTime<Utc>>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            organization_id: row.organization_id,
            email: row.email,
            hashed_password: row.hashed_password,
            full_name: row.full_name,
            is_active: row.is_active,
            is_superuser: row.is_superuser,
            created_at: row.created_at,
            last_login_at: row.last_login_at,
        }
    }
}

const USER_COLUMNS: &str = "id, organization_id, email, hashed_password, full_name, \
     is_active, is_superuser, created_at, last_login_at";

fn internal(context: &str, e: sqlx::Error) -> DomainError {
    DomainError::Internal {
        message: format!("{}: {}", context, e),
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        let query = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);

        let row = sqlx::query_as::<_, UserRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| internal("Failed to find user by id", e))?;

        Ok(row.map(User::from))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let query = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);

        let row = sqlx::query_as::<_, UserRow>(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| internal("Failed to find user by email", e))?;

        Ok(row.map(User::from))
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        let query = "INSERT INTO users (id, organization_id, email, hashed_password, \
             full_name, is_active, is_superuser, created_at, last_login_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)";

        sqlx::query(query)
            .bind(user.id)
            .bind(user.organization_id)
            .bind(&user.email)
            .bind(&user.hashed_password)
            .bind(&user.full_name)
            .bind(user.is_active)
            .bind(user.is_superuser)
            .bind(user.created_at)
            .bind(user.last_login_at)
            .execute(&self.pool)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db) if db.is_unique_violation() => {
                    DomainError::Auth(AuthError::EmailAlreadyRegistered)
                }
                _ => internal("Failed to create user", e),
            })?;

        Ok(user)
    }

    async fn update_last_login(
        &self,
        id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        sqlx::query("UPDATE users SET last_login_at = $2 WHERE id = $1")
            .bind(id)
            .bind(at)
            .execute(&self.pool)
            .await
            .map_err(|e| internal("Failed to update last login", e))?;

        Ok(())
    }
}
