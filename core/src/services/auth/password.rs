//! Password hashing and verification

use crate::errors::{DomainError, DomainResult};

/// Bcrypt work factor, raised above the library default
const BCRYPT_COST: u32 = 12;

/// Hash a plaintext password for storage
pub fn hash_password(password: &str) -> DomainResult<String> {
    bcrypt::hash(password, BCRYPT_COST).map_err(|e| DomainError::Internal {
        message: format!("Password hashing failed: {}", e),
    })
}

/// Check a plaintext password against a stored hash
///
/// A malformed stored hash verifies as false rather than erroring; the
/// caller reports the same invalid-credentials outcome either way.
pub fn verify_password(password: &str, hashed: &str) -> bool {
    bcrypt::verify(password, hashed).unwrap_or(false)
}
