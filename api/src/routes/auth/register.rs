use actix_web::{web, HttpResponse};
use validator::Validate;

use vt_core::repositories::{OrganizationRepository, RevocationStore, UserRepository};

use crate::dto::auth::{LoginResponse, RegisterRequest};
use crate::handlers::{handle_domain_error, handle_validation_errors};
use crate::routes::AppState;

/// Handler for POST /api/v1/auth/register
///
/// Creates an organization and its first user, then issues a token pair.
///
/// # Responses
/// - 201 Created: account created, returns tokens and profile
/// - 400 Bad Request: invalid email or password shorter than 8 characters
/// - 409 Conflict: email already registered
pub async fn register<U, O, R>(
    state: web::Data<AppState<U, O, R>>,
    request: web::Json<RegisterRequest>,
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
        .register(
            &request.email,
            &request.password,
            request.full_name.clone(),
            &request.organization_name,
        )
        .await
    {
        Ok(authenticated) => HttpResponse::Created().json(LoginResponse::new(
            authenticated.tokens,
            authenticated.user.into(),
        )),
        Err(error) => handle_domain_error(error),
    }
}
