use actix_web::{web, HttpResponse};

use vt_core::domain::entities::token::TokenKind;
use vt_core::repositories::{OrganizationRepository, RevocationStore, UserRepository};

use crate::dto::auth::LogoutRequest;
use crate::dto::ErrorResponse;
use crate::handlers::handle_domain_error;
use crate::middleware::tenant::TenantContext;
use crate::routes::AppState;

/// Handler for POST /api/v1/auth/logout
///
/// Revokes every outstanding token of the authenticated user; outstanding
/// access tokens are rejected at their next validation even though their
/// embedded expiry has not elapsed. A refresh token supplied in the body is
/// additionally blacklisted on its own.
///
/// # Responses
/// - 204 No Content: all sessions revoked
/// - 401 Unauthorized: missing or invalid access token
/// - 500 Internal Server Error: revocation store cannot honor the request
pub async fn logout<U, O, R>(
    state: web::Data<AppState<U, O, R>>,
    context: TenantContext,
    request: Option<web::Json<LogoutRequest>>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    O: OrganizationRepository + 'static,
    R: RevocationStore + 'static,
{
    let token_service = state.auth_service.token_service();

    if let Some(refresh_token) = request
        .as_ref()
        .and_then(|body| body.refresh_token.as_deref())
    {
        // Best effort: the revoke-all marker below covers this token too
        let _ = token_service.revoke(refresh_token, TokenKind::Refresh).await;
    }

    match state.auth_service.logout(context.user_id).await {
        Ok(true) => HttpResponse::NoContent().finish(),
        Ok(false) => HttpResponse::InternalServerError().json(ErrorResponse::new(
            "logout_failed",
            "Logout failed - revocation store unavailable",
        )),
        Err(error) => handle_domain_error(error),
    }
}
