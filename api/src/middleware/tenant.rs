//! Tenant context middleware
//!
//! Decodes the bearer token, if any, and attaches the resolved identity and
//! tenant to the request. This is a pure decode-and-attach step with no
//! rejection logic of its own: a missing, malformed, expired or revoked
//! token simply leaves the request anonymous, and route-level extractors
//! decide where authentication is required.

use actix_web::{
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    error::ErrorUnauthorized,
    http::header::AUTHORIZATION,
    Error, FromRequest, HttpMessage, HttpRequest,
};
use async_trait::async_trait;
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    rc::Rc,
    sync::Arc,
    task::{Context, Poll},
};
use uuid::Uuid;

use vt_core::domain::entities::token::{Claims, TokenKind};
use vt_core::errors::{DomainError, TokenError};
use vt_core::repositories::RevocationStore;
use vt_core::services::token::TokenService;

/// Identity and tenant scope resolved from an access token
#[derive(Debug, Clone)]
pub struct TenantContext {
    /// Authenticated user
    pub user_id: Uuid,
    /// Tenant organization the user belongs to
    pub org_id: Uuid,
    /// Email claim, when present
    pub email: Option<String>,
    /// Whether the user has platform-wide privileges
    pub is_superuser: bool,
}

impl TenantContext {
    /// Builds the request context from validated claims
    pub fn from_claims(claims: &Claims) -> Result<Self, DomainError> {
        let user_id = claims
            .user_id()
            .map_err(|_| DomainError::Token(TokenError::InvalidClaims))?;
        let org_id = claims
            .organization_id()
            .map_err(|_| DomainError::Token(TokenError::InvalidClaims))?;

        Ok(Self {
            user_id,
            org_id,
            email: claims.email.clone(),
            is_superuser: claims.is_superuser,
        })
    }
}

/// Trait for wrapping the token service to allow dynamic dispatch from
/// middleware that must not be generic over the revocation store
#[async_trait]
pub trait AccessTokenValidator: Send + Sync {
    async fn validate_access(&self, token: &str) -> Result<Claims, DomainError>;
}

#[async_trait]
impl<R: RevocationStore + 'static> AccessTokenValidator for TokenService<R> {
    async fn validate_access(&self, token: &str) -> Result<Claims, DomainError> {
        self.validate(token, TokenKind::Access).await
    }
}

/// Tenant context middleware factory
pub struct TenantResolver {
    validator: Arc<dyn AccessTokenValidator>,
}

impl TenantResolver {
    /// Creates the middleware around a token validator
    pub fn new(validator: Arc<dyn AccessTokenValidator>) -> Self {
        Self { validator }
    }
}

impl<S, B> Transform<S, ServiceRequest> for TenantResolver
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = TenantResolverMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TenantResolverMiddleware {
            service: Rc::new(service),
            validator: Arc::clone(&self.validator),
        }))
    }
}

/// Tenant context middleware service
pub struct TenantResolverMiddleware<S> {
    service: Rc<S>,
    validator: Arc<dyn AccessTokenValidator>,
}

impl<S, B> Service<ServiceRequest> for TenantResolverMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let validator = Arc::clone(&self.validator);

        Box::pin(async move {
            if let Some(token) = extract_bearer_token(&req) {
                match validator.validate_access(&token).await {
                    Ok(claims) => match TenantContext::from_claims(&claims) {
                        Ok(context) => {
                            req.extensions_mut().insert(context);
                        }
                        Err(e) => {
                            log::debug!("Bearer token carried unusable claims: {}", e);
                        }
                    },
                    // The reason stays in the logs; the request proceeds
                    // anonymously either way so callers cannot probe
                    // revocation state
                    Err(e) => {
                        log::debug!("Bearer token rejected: {}", e);
                    }
                }
            }

            service.call(req).await
        })
    }
}

/// Extracts Bearer token from Authorization header
fn extract_bearer_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|s| s.to_string())
}

/// Extractor for required authentication
impl FromRequest for TenantContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let result = req
            .extensions()
            .get::<TenantContext>()
            .cloned()
            .ok_or_else(|| ErrorUnauthorized("Authentication required"));

        ready(result)
    }
}

/// Extractor for optional authentication
pub struct MaybeTenant(pub Option<TenantContext>);

impl FromRequest for MaybeTenant {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let context = req.extensions().get::<TenantContext>().cloned();
        ready(Ok(MaybeTenant(context)))
    }
}
