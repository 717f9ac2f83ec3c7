//! API configuration assembled from the shared configuration modules

pub use vt_shared::config::AppConfig;

use vt_shared::config::auth::MIN_SECRET_LENGTH;

/// Validate startup-critical configuration
///
/// A production process must never sign tokens with the development
/// placeholder or a short secret; serving traffic in that state is a fatal
/// misconfiguration.
pub fn validate(config: &AppConfig) -> Result<(), String> {
    if config.environment.is_production() && !config.jwt.has_valid_secret() {
        return Err(format!(
            "JWT_SECRET must be set to at least {} characters in production",
            MIN_SECRET_LENGTH
        ));
    }

    Ok(())
}
