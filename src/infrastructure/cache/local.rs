use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use chrono::Utc;
use moka::{Expiry, future::Cache};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{
    config::CacheConfig,
    infrastructure::cache::keys::CacheKey,
    middleware::rate_limit::RATE_WINDOW_SECS,
    ui::UiState,
};

pub type SharedUiState = Arc<Mutex<UiState>>;

/// Keeps a revoked token id exactly as long as the token itself could be used.
struct UntilTokenExpiry;

impl Expiry<String, u64> for UntilTokenExpiry {
    fn expire_after_create(&self, _jti: &String, exp: &u64, _created_at: Instant) -> Option<Duration> {
        let now = Utc::now().timestamp() as u64;
        Some(Duration::from_secs(exp.saturating_sub(now)))
    }
}

pub struct LocalCache {
    ui_sessions: Cache<Uuid, SharedUiState>,
    // Unbounded: an evicted entry would revive a revoked token.
    token_blacklist: Cache<String, u64>,
    rate_counters: Cache<String, u32>,
}

impl LocalCache {
    pub fn new(cache_config: &CacheConfig) -> Self {
        Self {
            ui_sessions: Cache::builder()
                .max_capacity(cache_config.ui_session_max_capacity)
                .time_to_live(cache_config.ui_session_ttl)
                .time_to_idle(cache_config.ui_session_idle)
                .build(),

            token_blacklist: Cache::builder().expire_after(UntilTokenExpiry).build(),

            rate_counters: Cache::builder()
                .max_capacity(cache_config.rate_limit_max_capacity)
                .time_to_live(Duration::from_secs(RATE_WINDOW_SECS * 2))
                .build(),
        }
    }

    pub async fn create_ui_session(&self) -> (Uuid, SharedUiState) {
        let id = Uuid::new_v4();
        let state = Arc::new(Mutex::new(UiState::new()));
        self.ui_sessions.insert(id, state.clone()).await;
        (id, state)
    }

    pub async fn get_ui_session(&self, id: &Uuid) -> Option<SharedUiState> {
        self.ui_sessions.get(id).await
    }

    /// Revokes `jti` until `exp` (unix seconds), the token's own expiry.
    pub async fn blacklist_token(&self, jti: &str, exp: u64) {
        self.token_blacklist
            .insert(CacheKey::token_blacklist(jti), exp)
            .await;
    }

    pub async fn is_token_blacklisted(&self, jti: &str) -> bool {
        self.token_blacklist
            .get(&CacheKey::token_blacklist(jti))
            .await
            .is_some()
    }

    pub async fn get_counter(&self, key: &str) -> u32 {
        self.rate_counters.get(key).await.unwrap_or(0)
    }

    /// Increments `key` and returns the new count.
    pub async fn increment_counter(&self, key: &str) -> u32 {
        self.rate_counters
            .entry(key.to_string())
            .and_upsert_with(|current| async move {
                current.map(|entry| entry.into_value()).unwrap_or(0) + 1
            })
            .await
            .into_value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn cache() -> LocalCache {
        let config = Config::local("0123456789abcdef0123456789abcdef");
        LocalCache::new(&config.cache)
    }

    #[tokio::test]
    async fn ui_sessions_are_shared_by_id() {
        let cache = cache();
        let (id, state) = cache.create_ui_session().await;
        state.lock().await.session_id = "GODZEXMD-ABCDEFGHIJ".into();

        let fetched = cache.get_ui_session(&id).await.unwrap();
        assert_eq!(fetched.lock().await.session_id, "GODZEXMD-ABCDEFGHIJ");
        assert!(cache.get_ui_session(&Uuid::new_v4()).await.is_none());
    }

    fn now() -> u64 {
        Utc::now().timestamp() as u64
    }

    #[tokio::test]
    async fn blacklist_marks_token_ids() {
        let cache = cache();
        assert!(!cache.is_token_blacklisted("jti-1").await);
        cache.blacklist_token("jti-1", now() + 3600).await;
        assert!(cache.is_token_blacklisted("jti-1").await);
    }

    #[tokio::test]
    async fn blacklist_entry_lives_as_long_as_its_token() {
        let cache = cache();
        cache.blacklist_token("expired", now().saturating_sub(5)).await;
        cache.blacklist_token("live", now() + 3600).await;

        assert!(!cache.is_token_blacklisted("expired").await);
        assert!(cache.is_token_blacklisted("live").await);
    }

    #[tokio::test]
    async fn blacklist_is_not_capacity_bounded() {
        let cache = cache();
        for n in 0..5_000 {
            cache.blacklist_token(&format!("jti-{n}"), now() + 3600).await;
        }
        cache.token_blacklist.run_pending_tasks().await;

        assert!(cache.is_token_blacklisted("jti-0").await);
        assert!(cache.is_token_blacklisted("jti-4999").await);
    }

    #[tokio::test]
    async fn counters_increment_from_zero() {
        let cache = cache();
        assert_eq!(cache.get_counter("rate:ui:1.2.3.4:1").await, 0);
        assert_eq!(cache.increment_counter("rate:ui:1.2.3.4:1").await, 1);
        assert_eq!(cache.increment_counter("rate:ui:1.2.3.4:1").await, 2);
        assert_eq!(cache.get_counter("rate:ui:1.2.3.4:1").await, 2);
    }
}
