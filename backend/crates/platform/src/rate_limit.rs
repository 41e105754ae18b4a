//! Rate Limiting Infrastructure
//!
//! Common rate limiting abstractions. The storage backend lives in the
//! application's infrastructure layer; this module defines the fixed-window
//! arithmetic and the store contract.

use std::time::Duration;

/// Rate limit configuration
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum requests allowed in the window
    pub max_requests: u32,
    /// Time window duration
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        // 100 requests per 15 minutes
        Self {
            max_requests: 100,
            window: Duration::from_secs(15 * 60),
        }
    }
}

impl RateLimitConfig {
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window: Duration::from_secs(window_secs),
        }
    }

    pub fn window_ms(&self) -> i64 {
        self.window.as_millis() as i64
    }

    /// Start of the fixed window containing `now_ms`
    pub fn window_start_ms(&self, now_ms: i64) -> i64 {
        (now_ms / self.window_ms()) * self.window_ms()
    }
}

/// Rate limit check result
#[derive(Debug, Clone)]
pub struct RateLimitResult {
    pub allowed: bool,
    pub remaining: u32,
    pub reset_at_ms: i64,
}

impl RateLimitResult {
    /// Build a result from the post-increment counter value
    pub fn from_count(count: u32, config: &RateLimitConfig, window_start_ms: i64) -> Self {
        Self {
            allowed: count <= config.max_requests,
            remaining: config.max_requests.saturating_sub(count),
            reset_at_ms: window_start_ms + config.window_ms(),
        }
    }
}

/// Trait for rate limit storage backends
#[trait_variant::make(RateLimitStore: Send)]
pub trait LocalRateLimitStore {
    /// Atomically increment the counter for `key` in the current window
    /// and report whether the request is allowed
    async fn check_and_increment(
        &self,
        key: &[u8],
        config: &RateLimitConfig,
        now_ms: i64,
    ) -> Result<RateLimitResult, Box<dyn std::error::Error + Send + Sync>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RateLimitConfig::default();
        assert_eq!(config.max_requests, 100);
        assert_eq!(config.window_ms(), 15 * 60 * 1000);
    }

    #[test]
    fn test_window_start_alignment() {
        let config = RateLimitConfig::new(100, 900);
        let window_ms = config.window_ms();

        // Any instant inside a window maps to the same start
        let start = config.window_start_ms(window_ms * 3 + 1);
        assert_eq!(start, window_ms * 3);
        assert_eq!(config.window_start_ms(window_ms * 3 + window_ms - 1), start);
        assert_eq!(config.window_start_ms(window_ms * 4), window_ms * 4);
    }

    #[test]
    fn test_result_from_count() {
        let config = RateLimitConfig::new(3, 60);

        let r = RateLimitResult::from_count(1, &config, 0);
        assert!(r.allowed);
        assert_eq!(r.remaining, 2);
        assert_eq!(r.reset_at_ms, 60_000);

        let r = RateLimitResult::from_count(3, &config, 0);
        assert!(r.allowed);
        assert_eq!(r.remaining, 0);

        let r = RateLimitResult::from_count(4, &config, 0);
        assert!(!r.allowed);
        assert_eq!(r.remaining, 0);
    }
}
