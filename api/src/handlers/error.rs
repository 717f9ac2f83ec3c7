//! Domain error to HTTP response mapping
//!
//! Token failures of every flavor (malformed, expired, blacklisted,
//! revoked-by-marker) map to one identical 401 so the API does not leak
//! revocation state; the specific reason is only logged.

use actix_web::HttpResponse;
use validator::ValidationErrors;

use vt_core::errors::{AuthError, DomainError};

use crate::dto::ErrorResponse;

/// Handle domain errors and convert them to appropriate HTTP responses
pub fn handle_domain_error(error: DomainError) -> HttpResponse {
    match error {
        DomainError::Auth(auth_error) => match auth_error {
            AuthError::InvalidCredentials => HttpResponse::Unauthorized().json(
                ErrorResponse::new("invalid_credentials", "Incorrect email or password"),
            ),
            AuthError::AccountInactive => HttpResponse::Forbidden().json(
                ErrorResponse::new("account_inactive", "User account is inactive"),
            ),
            AuthError::EmailAlreadyRegistered => HttpResponse::Conflict().json(
                ErrorResponse::new("email_already_registered", "Email already registered"),
            ),
            AuthError::UserNotFound => HttpResponse::NotFound()
                .json(ErrorResponse::new("user_not_found", "User not found")),
            AuthError::OrganizationNotFound => HttpResponse::NotFound().json(
                ErrorResponse::new("organization_not_found", "Organization not found"),
            ),
            AuthError::OrganizationInactive => HttpResponse::Forbidden().json(
                ErrorResponse::new("organization_inactive", "Organization is inactive"),
            ),
            AuthError::AuthenticationRequired => HttpResponse::Unauthorized().json(
                ErrorResponse::new("authentication_required", "Authentication required"),
            ),
        },
        DomainError::Token(token_error) => {
            log::debug!("Token rejected: {}", token_error);
            HttpResponse::Unauthorized()
                .json(ErrorResponse::new("invalid_token", "Invalid or expired token"))
        }
        DomainError::Store(store_error) => {
            log::error!("Revocation store error surfaced to handler: {}", store_error);
            HttpResponse::ServiceUnavailable().json(ErrorResponse::new(
                "revocation_unavailable",
                "Token revocation is temporarily unavailable",
            ))
        }
        DomainError::Validation { message } => {
            HttpResponse::BadRequest().json(ErrorResponse::new("validation_error", message))
        }
        DomainError::NotFound { resource } => HttpResponse::NotFound().json(
            ErrorResponse::new("not_found", format!("{} not found", resource)),
        ),
        DomainError::Internal { message } => {
            log::error!("Internal error: {}", message);
            HttpResponse::InternalServerError().json(ErrorResponse::new(
                "internal_error",
                "An internal error occurred",
            ))
        }
    }
}

/// Convert request body validation failures into a 400 response
pub fn handle_validation_errors(errors: ValidationErrors) -> HttpResponse {
    HttpResponse::BadRequest()
        .json(ErrorResponse::new("validation_error", errors.to_string()))
}
