//! Sliding-window rate limiting contract
//!
//! The limiter is keyed by identity: authenticated requests by user id,
//! anonymous requests by client IP. Implementations count requests inside a
//! trailing window that moves continuously with the current time; the store
//! backing the window is the same remote store used for token revocation,
//! but the two subsystems are otherwise independent.

mod memory;

pub use memory::MemoryRateLimiter;

use async_trait::async_trait;
use uuid::Uuid;

/// Identity a request is counted against
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateLimitKey {
    /// Authenticated traffic, keyed by user id
    User(Uuid),
    /// Anonymous traffic, keyed by client IP
    Ip(String),
}

impl RateLimitKey {
    /// Key under which the window is stored
    pub fn storage_key(&self) -> String {
        match self {
            RateLimitKey::User(user_id) => format!("rate_limit:user:{}", user_id),
            RateLimitKey::Ip(ip) => format!("rate_limit:ip:{}", ip),
        }
    }
}

/// Limit and window applied to one tier of traffic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitQuota {
    /// Maximum requests within the window
    pub limit: u32,
    /// Trailing window length in seconds
    pub window_seconds: u64,
}

impl RateLimitQuota {
    pub fn new(limit: u32, window_seconds: u64) -> Self {
        Self {
            limit,
            window_seconds,
        }
    }
}

/// Outcome of an admission check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitDecision {
    /// Whether the request is admitted
    pub allowed: bool,
    /// Limit applied to this identity
    pub limit: u32,
    /// Requests left in the window after this one
    pub remaining: u32,
    /// Epoch seconds at which the current window ends
    pub reset_at: i64,
    /// Seconds to wait before retrying, set on rejection
    pub retry_after: Option<u64>,
    /// True when the store was unreachable and the fail-open policy admitted
    /// the request without counting it
    pub degraded: bool,
}

impl RateLimitDecision {
    /// Decision from the number of requests observed in the window before
    /// the current one was added
    pub fn from_window_count(count_before_add: u32, quota: RateLimitQuota, now: i64) -> Self {
        let allowed = count_before_add < quota.limit;
        let remaining = quota.limit.saturating_sub(count_before_add.saturating_add(1));
        let reset_at = now + quota.window_seconds as i64;
        let retry_after = if allowed {
            None
        } else {
            Some(quota.window_seconds)
        };

        Self {
            allowed,
            limit: quota.limit,
            remaining,
            reset_at,
            retry_after,
            degraded: false,
        }
    }

    /// Fail-open decision: admit and report the limiter as degraded
    pub fn fail_open(quota: RateLimitQuota, now: i64) -> Self {
        Self {
            allowed: true,
            limit: quota.limit,
            remaining: quota.limit,
            reset_at: now + quota.window_seconds as i64,
            retry_after: None,
            degraded: true,
        }
    }

    /// Fail-closed decision: reject because the store cannot count
    pub fn fail_closed(quota: RateLimitQuota, now: i64) -> Self {
        Self {
            allowed: false,
            limit: quota.limit,
            remaining: 0,
            reset_at: now + quota.window_seconds as i64,
            retry_after: Some(quota.window_seconds),
            degraded: true,
        }
    }
}

/// Sliding-window admission control keyed by identity
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Count the current request against `key` and decide admission
    ///
    /// Never fails: store errors resolve to a fail-open or fail-closed
    /// decision according to the implementation's availability policy.
    async fn check(&self, key: &RateLimitKey, quota: RateLimitQuota) -> RateLimitDecision;
}
