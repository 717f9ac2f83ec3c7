//! Redis-based sliding-window rate limiter
//!
//! Each identity owns a sorted set of request arrival times. Pruning,
//! counting, recording and the key TTL refresh run as a single MULTI/EXEC
//! transaction so two concurrent requests from the same identity can never
//! both observe a count that ignores the other.

use async_trait::async_trait;
use chrono::Utc;
use tracing::warn;
use uuid::Uuid;

use vt_core::services::rate_limit::{
    RateLimitDecision, RateLimitKey, RateLimitQuota, RateLimiter,
};

use crate::cache::RedisClient;

/// Redis implementation of the sliding-window rate limiter
pub struct RedisRateLimiter {
    client: Option<RedisClient>,
    /// Availability policy: admit (`true`) or reject (`false`) when the
    /// store cannot count
    fail_open: bool,
}

impl RedisRateLimiter {
    /// Create a limiter backed by a live Redis connection
    pub fn new(client: RedisClient, fail_open: bool) -> Self {
        Self {
            client: Some(client),
            fail_open,
        }
    }

    /// Create a disabled limiter for when Redis is unavailable at startup
    pub fn disabled(fail_open: bool) -> Self {
        Self {
            client: None,
            fail_open,
        }
    }

    fn degraded_decision(&self, quota: RateLimitQuota, now: i64) -> RateLimitDecision {
        if self.fail_open {
            RateLimitDecision::fail_open(quota, now)
        } else {
            RateLimitDecision::fail_closed(quota, now)
        }
    }

    /// Prune, count, record and refresh expiry in one atomic unit
    ///
    /// Returns the number of requests observed in the window before the
    /// current one was added: ZCARD runs after ZREMRANGEBYSCORE but before
    /// ZADD inside the transaction.
    async fn count_in_window(
        &self,
        client: &RedisClient,
        storage_key: &str,
        quota: RateLimitQuota,
    ) -> Result<u32, redis::RedisError> {
        let mut conn = client.get_connection();

        let now_ms = Utc::now().timestamp_millis();
        let window_start = now_ms - quota.window_seconds as i64 * 1000;
        // Member must be unique per request so same-millisecond arrivals
        // both count
        let member = format!("{}-{}", now_ms, Uuid::new_v4());

        let mut pipe = redis::pipe();
        pipe.atomic()
            .cmd("ZREMRANGEBYSCORE")
            .arg(storage_key)
            .arg("-inf")
            .arg(window_start)
            .ignore()
            .zcard(storage_key)
            .zadd(storage_key, member, now_ms)
            .ignore()
            .expire(storage_key, quota.window_seconds as i64)
            .ignore();

        let (count,): (u32,) = pipe.query_async(&mut conn).await?;
        Ok(count)
    }
}

#[async_trait]
impl RateLimiter for RedisRateLimiter {
    async fn check(&self, key: &RateLimitKey, quota: RateLimitQuota) -> RateLimitDecision {
        let now = Utc::now().timestamp();

        let Some(client) = &self.client else {
            return self.degraded_decision(quota, now);
        };

        let storage_key = key.storage_key();
        match self.count_in_window(client, &storage_key, quota).await {
            Ok(count_before_add) => {
                RateLimitDecision::from_window_count(count_before_add, quota, now)
            }
            Err(e) => {
                warn!(
                    key = %storage_key,
                    "Rate limit check failed ({}), policy: {}",
                    e,
                    if self.fail_open { "fail open" } else { "fail closed" }
                );
                self.degraded_decision(quota, now)
            }
        }
    }
}
