//! Authentication route handlers
//!
//! All endpoints that consume the token lifecycle:
//! - Registration and login (issue a pair)
//! - Token refresh (rotation)
//! - Logout (revoke-all)
//! - Current user profile

pub mod login;
pub mod logout;
pub mod me;
pub mod refresh;
pub mod register;
