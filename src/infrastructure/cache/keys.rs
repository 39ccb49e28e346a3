pub struct CacheKey;

impl CacheKey {
    pub fn rate_window(prefix: &str, client: &str, window: u64) -> String {
        format!("rate:{prefix}:{client}:{window}")
    }

    pub fn token_blacklist(jti: &str) -> String {
        format!("token:blacklist:{jti}")
    }
}
