use actix_web::{web, HttpResponse};

use vt_core::repositories::{OrganizationRepository, RevocationStore, UserRepository};

use crate::dto::auth::{RefreshTokenRequest, TokenResponse};
use crate::handlers::handle_domain_error;
use crate::routes::AppState;

/// Handler for POST /api/v1/auth/refresh
///
/// Exchanges a refresh token for a new pair. The presented token is rotated
/// out: a second exchange with the same token fails.
///
/// # Responses
/// - 200 OK: returns the new token pair
/// - 401 Unauthorized: invalid, expired, rotated or revoked refresh token
/// - 403 Forbidden: account has been deactivated since issuance
pub async fn refresh<U, O, R>(
    state: web::Data<AppState<U, O, R>>,
    request: web::Json<RefreshTokenRequest>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    O: OrganizationRepository + 'static,
    R: RevocationStore + 'static,
{
    match state.auth_service.refresh(&request.refresh_token).await {
        Ok(pair) => HttpResponse::Ok().json(TokenResponse::from(pair)),
        Err(error) => handle_domain_error(error),
    }
}
