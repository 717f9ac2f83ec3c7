//! Request and response data transfer objects

pub mod auth;
pub mod error;
pub mod user;

pub use error::{ErrorResponse, ErrorResponseExt};
