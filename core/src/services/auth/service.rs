//! Authentication service implementation

use chrono::Utc;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::domain::entities::organization::Organization;
use crate::domain::entities::token::{TokenKind, TokenPair};
use crate::domain::entities::user::User;
use crate::errors::{AuthError, DomainResult, TokenError};
use crate::repositories::{OrganizationRepository, RevocationStore, UserRepository};
use crate::services::token::TokenService;

use super::password;

/// Result of a successful registration or login
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user: User,
    pub tokens: TokenPair,
}

/// Service for account registration, login and session management
///
/// All dependencies are resolved at construction time and shared through
/// `Arc`; the service owns no mutable state of its own.
pub struct AuthService<U, O, R>
where
    U: UserRepository,
    O: OrganizationRepository,
    R: RevocationStore,
{
    users: Arc<U>,
    organizations: Arc<O>,
    tokens: Arc<TokenService<R>>,
}

impl<U, O, R> AuthService<U, O, R>
where
    U: UserRepository,
    O: OrganizationRepository,
    R: RevocationStore,
{
    /// Creates a new authentication service
    pub fn new(users: Arc<U>, organizations: Arc<O>, tokens: Arc<TokenService<R>>) -> Self {
        Self {
            users,
            organizations,
            tokens,
        }
    }

    /// The token service backing this auth service
    pub fn token_service(&self) -> Arc<TokenService<R>> {
        Arc::clone(&self.tokens)
    }

    /// Register a new account and its organization, issuing a first pair
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        full_name: Option<String>,
        organization_name: &str,
    ) -> DomainResult<AuthenticatedUser> {
        if self.users.find_by_email(email).await?.is_some() {
            return Err(AuthError::EmailAlreadyRegistered.into());
        }

        let organization = self
            .organizations
            .create(Organization::new(organization_name.to_string()))
            .await?;

        let hashed_password = password::hash_password(password)?;
        let user = self
            .users
            .create(User::new(
                organization.id,
                email.to_string(),
                hashed_password,
                full_name,
            ))
            .await?;

        info!(user_id = %user.id, org_id = %organization.id, "Registered new account");

        let tokens = self.tokens.create_pair(
            user.id,
            user.organization_id,
            &user.email,
            user.is_superuser,
        )?;

        Ok(AuthenticatedUser { user, tokens })
    }

    /// Authenticate with email and password, issuing a fresh pair
    ///
    /// Unknown email and wrong password produce the same error so the
    /// endpoint cannot be used to probe which addresses exist.
    pub async fn login(&self, email: &str, password: &str) -> DomainResult<AuthenticatedUser> {
        let mut user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !password::verify_password(password, &user.hashed_password) {
            return Err(AuthError::InvalidCredentials.into());
        }

        if !user.is_active {
            return Err(AuthError::AccountInactive.into());
        }

        let now = Utc::now();
        self.users.update_last_login(user.id, now).await?;
        user.last_login_at = Some(now);

        let tokens = self.tokens.create_pair(
            user.id,
            user.organization_id,
            &user.email,
            user.is_superuser,
        )?;

        Ok(AuthenticatedUser { user, tokens })
    }

    /// Exchange a refresh token for a new pair
    ///
    /// The subject is reloaded so the new pair carries current email and
    /// superuser state, and deactivated accounts cannot refresh their way
    /// back in.
    pub async fn refresh(&self, refresh_token: &str) -> DomainResult<TokenPair> {
        let claims = self.tokens.validate(refresh_token, TokenKind::Refresh).await?;
        let user_id = claims.user_id().map_err(|_| TokenError::InvalidClaims)?;

        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !user.is_active {
            return Err(AuthError::AccountInactive.into());
        }

        self.tokens
            .refresh(refresh_token, &user.email, user.is_superuser)
            .await
    }

    /// Log the user out everywhere by revoking all outstanding tokens
    ///
    /// Returns `false` when the revocation store cannot honor the request.
    pub async fn logout(&self, user_id: Uuid) -> DomainResult<bool> {
        let revoked = self.tokens.revoke_all(user_id).await?;
        if revoked {
            info!(user_id = %user_id, "Revoked all sessions");
        }
        Ok(revoked)
    }

    /// Load the profile of an authenticated user
    pub async fn current_user(&self, user_id: Uuid) -> DomainResult<User> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AuthError::UserNotFound.into())
    }
}
