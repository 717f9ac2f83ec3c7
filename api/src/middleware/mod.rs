//! Request processing middleware
//!
//! Order matters: the tenant resolver decodes the bearer token first, so
//! the rate limiter can key authenticated traffic by user instead of IP.

pub mod cors;
pub mod rate_limit;
pub mod tenant;
