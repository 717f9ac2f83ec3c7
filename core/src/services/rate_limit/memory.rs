//! In-process sliding-window limiter
//!
//! Backs unit tests and redis-less development. Counting is per process, so
//! this is not suitable for multi-instance deployments; the Redis limiter in
//! the infrastructure layer is the production implementation.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use super::{RateLimitDecision, RateLimitKey, RateLimitQuota, RateLimiter};

/// Sliding-window limiter over an in-process map of timestamp queues
pub struct MemoryRateLimiter {
    windows: Mutex<HashMap<String, VecDeque<i64>>>,
}

impl MemoryRateLimiter {
    pub fn new() -> Self {
        Self {
            windows: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for MemoryRateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RateLimiter for MemoryRateLimiter {
    async fn check(&self, key: &RateLimitKey, quota: RateLimitQuota) -> RateLimitDecision {
        let now_ms = Utc::now().timestamp_millis();
        let window_start = now_ms - quota.window_seconds as i64 * 1000;

        let mut windows = self.windows.lock().expect("rate limit window lock poisoned");
        let entries = windows.entry(key.storage_key()).or_default();

        // Prune entries that slid out of the window, count, then record the
        // current request; the map lock makes the sequence atomic.
        while entries.front().is_some_and(|&t| t <= window_start) {
            entries.pop_front();
        }
        let count_before_add = entries.len() as u32;
        entries.push_back(now_ms);

        RateLimitDecision::from_window_count(count_before_add, quota, Utc::now().timestamp())
    }
}
