//! PostgreSQL repository implementations

mod organization_repository_impl;
mod user_repository_impl;

pub use organization_repository_impl::PgOrganizationRepository;
pub use user_repository_impl::PgUserRepository;
