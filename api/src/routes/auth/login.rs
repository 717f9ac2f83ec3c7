use actix_web::{web, HttpResponse};
use validator::Validate;

use vt_core::repositories::{OrganizationRepository, RevocationStore, UserRepository};

use crate::dto::auth::{LoginRequest, LoginResponse};
use crate::handlers::{handle_domain_error, handle_validation_errors};
use crate::routes::AppState;

/// Handler for POST /api/v1/auth/login
///
/// Authenticates with email and password and issues a token pair.
///
/// # Responses
/// - 200 OK: returns tokens and profile
/// - 401 Unauthorized: unknown email or wrong password (indistinguishable)
/// - 403 Forbidden: account is inactive
pub async fn login<U, O, R>(
    state: web::Data<AppState<U, O, R>>,
    request: web::Json<LoginRequest>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    O: OrganizationRepository + 'static,
    R: RevocationStore + 'static,
{
    if let Err(errors) = request.validate() {
        return handle_validation_errors(errors);
    }

    match state
        .auth_service
        .login(&request.email, &request.password)
        .await
    {
        Ok(authenticated) => HttpResponse::Ok().json(LoginResponse::new(
            authenticated.tokens,
            authenticated.user.into(),
        )),
        Err(error) => handle_domain_error(error),
    }
}
