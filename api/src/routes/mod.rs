//! Route handlers

pub mod auth;

use vt_core::repositories::{OrganizationRepository, RevocationStore, UserRepository};
use vt_core::services::auth::AuthService;

/// Application state shared across route handlers
pub struct AppState<U, O, R>
where
    U: UserRepository,
    O: OrganizationRepository,
    R: RevocationStore,
{
    pub auth_service: AuthService<U, O, R>,
}
