use std::{net::SocketAddr, sync::Arc};

use axum::{extract::ConnectInfo, http::Extensions};
use chrono::Utc;

use crate::{
    error::AppError,
    infrastructure::cache::{Cache, keys::CacheKey},
};

pub const RATE_WINDOW_SECS: u64 = 60;

#[derive(Debug, Clone)]
pub struct SlidingWindowConfig {
    pub max_requests_per_window: u32,
    pub window_duration_secs: u64,
    pub key_prefix: String,
}

#[derive(Clone)]
pub struct RateLimiter {
    cache: Arc<Cache>,
    config: SlidingWindowConfig,
}

impl RateLimiter {
    pub fn new(cache: Arc<Cache>, config: SlidingWindowConfig) -> Self {
        Self { cache, config }
    }

    /// Returns (allowed, remaining, reset_at) tuple.
    pub async fn check(&self, key: &str) -> Result<(bool, u32, u64), AppError> {
        let now = Utc::now().timestamp() as u64;
        Ok(self.check_at(key, now).await)
    }

    async fn check_at(&self, key: &str, now: u64) -> (bool, u32, u64) {
        let window_secs = self.config.window_duration_secs;

        // Calculate current and previous window keys
        let current_window = now / window_secs;
        let previous_window = current_window.saturating_sub(1);

        let current_key = CacheKey::rate_window(&self.config.key_prefix, key, current_window);
        let previous_key = CacheKey::rate_window(&self.config.key_prefix, key, previous_window);

        let current_count = self.cache.local.get_counter(&current_key).await;
        let previous_count = self.cache.local.get_counter(&previous_key).await;

        // Weight of the previous window by how much of it still overlaps
        let seconds_into_current = now % window_secs;
        let previous_weight = 1.0 - (seconds_into_current as f64 / window_secs as f64);

        let weighted_count =
            (previous_count as f64 * previous_weight + current_count as f64).ceil() as u32;

        let reset_at = (current_window + 1) * window_secs;

        if weighted_count >= self.config.max_requests_per_window {
            return (false, 0, reset_at);
        }

        self.cache.local.increment_counter(&current_key).await;

        let remaining = self
            .config
            .max_requests_per_window
            .saturating_sub(weighted_count + 1);

        (true, remaining, reset_at)
    }
}

pub fn create_limiter(cache: Arc<Cache>, limit: u32, prefix: &str) -> RateLimiter {
    RateLimiter::new(
        cache,
        SlidingWindowConfig {
            max_requests_per_window: limit,
            window_duration_secs: RATE_WINDOW_SECS,
            key_prefix: prefix.to_string(),
        },
    )
}

/// Rate limit key for a request: the peer IP when the server recorded it.
pub fn client_key(extensions: &Extensions) -> String {
    extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
