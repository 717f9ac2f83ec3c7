use actix_web::{web, HttpResponse};

use vt_core::repositories::{OrganizationRepository, RevocationStore, UserRepository};

use crate::dto::user::UserResponse;
use crate::handlers::handle_domain_error;
use crate::middleware::tenant::TenantContext;
use crate::routes::AppState;

/// Handler for GET /api/v1/auth/me
///
/// Returns the authenticated user's profile.
///
/// # Responses
/// - 200 OK: the profile
/// - 401 Unauthorized: missing or invalid access token
pub async fn me<U, O, R>(
    state: web::Data<AppState<U, O, R>>,
    context: TenantContext,
) -> HttpResponse
where
    U: UserRepository + 'static,
    O: OrganizationRepository + 'static,
    R: RevocationStore + 'static,
{
    match state.auth_service.current_user(context.user_id).await {
        Ok(user) => HttpResponse::Ok().json(UserResponse::from(user)),
        Err(error) => handle_domain_error(error),
    }
}
