//! Rate limiting configuration module

use serde::{Deserialize, Serialize};

/// Two-tier request rate limiting configuration
///
/// Anonymous traffic is limited per client IP at the default tier;
/// authenticated traffic is limited per user at the (higher) authenticated
/// tier. The two tiers never share a counting bucket.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitConfig {
    /// Enable rate limiting
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Max requests per client IP within the default window
    pub default_limit: u32,

    /// Sliding window for anonymous traffic, in seconds
    pub default_window_seconds: u64,

    /// Max requests per authenticated user within the authenticated window
    pub authenticated_limit: u32,

    /// Sliding window for authenticated traffic, in seconds
    pub authenticated_window_seconds: u64,

    /// Availability policy: when the backing store is unreachable, `true`
    /// admits the request and reports the limiter as degraded, `false`
    /// rejects it.
    #[serde(default = "default_fail_open")]
    pub fail_open: bool,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            default_limit: 100,
            default_window_seconds: 60,
            authenticated_limit: 1000,
            authenticated_window_seconds: 60,
            fail_open: default_fail_open(),
        }
    }
}

impl RateLimitConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            enabled: env_parse("RATE_LIMIT_ENABLED", defaults.enabled),
            default_limit: env_parse("RATE_LIMIT_DEFAULT_LIMIT", defaults.default_limit),
            default_window_seconds: env_parse(
                "RATE_LIMIT_DEFAULT_WINDOW",
                defaults.default_window_seconds,
            ),
            authenticated_limit: env_parse(
                "RATE_LIMIT_AUTHENTICATED_LIMIT",
                defaults.authenticated_limit,
            ),
            authenticated_window_seconds: env_parse(
                "RATE_LIMIT_AUTHENTICATED_WINDOW",
                defaults.authenticated_window_seconds,
            ),
            fail_open: env_parse("RATE_LIMIT_FAIL_OPEN", defaults.fail_open),
        }
    }
}

fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn default_enabled() -> bool {
    true
}

fn default_fail_open() -> bool {
    true
}
