use std::{env, str::FromStr, time::Duration};

use crate::error::{AppError, Result};

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    pub qr: QrConfig,
    pub session: SessionConfig,
    pub cache: CacheConfig,
    pub accounts: AccountsConfig,
    pub rate_limit: RateLimitConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub max_concurrent_requests: usize,
    pub server_public_url: String,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_ttl: Duration,
    pub refresh_token_ttl: Duration,
}

#[derive(Debug, Clone)]
pub struct QrConfig {
    pub api_url: String,
    pub size: u32,
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub token_prefix: String,
    pub token_length: usize,
}

#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub ui_session_max_capacity: u64,
    pub ui_session_idle: Duration,
    pub ui_session_ttl: Duration,
    pub rate_limit_max_capacity: u64,
}

#[derive(Debug, Clone)]
pub struct AccountsConfig {
    pub seed_demo_user: bool,
}

#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub auth_limit: u32,
    pub ui_limit: u32,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// Used when `RUST_LOG` is unset.
    pub default_filter: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Compact,
}

impl FromStr for LogFormat {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self> {
        match value.to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "compact" | "text" => Ok(LogFormat::Compact),
            other => Err(AppError::InvalidParams(format!("Unknown log format {other}"))),
        }
    }
}

pub const DEFAULT_LOG_FILTER: &str = "info,godzexmd=debug,tower_http=info,hyper=warn";
pub const DEFAULT_QR_API_URL: &str = "https://api.qrserver.com/v1/create-qr-code/";
pub const DEFAULT_QR_SIZE: u32 = 180;
pub const DEFAULT_TOKEN_PREFIX: &str = "GODZEXMD-";
pub const DEFAULT_TOKEN_LENGTH: usize = 10;

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            server: ServerConfig {
                host: env_or_default("HOST", "127.0.0.1"),
                port: env_or_parse("PORT", 8080)?,
                cors_allowed_origins: env_list("CORS_ALLOWED_ORIGINS", vec![]),
                max_concurrent_requests: env_or_parse("SERVER_MAX_CONCURRENT_REQUESTS", 100)?,
                server_public_url: env_or_default("SERVER_PUBLIC_URL", "http://127.0.0.1:8080"),
            },
            jwt: JwtConfig {
                secret: env_required("JWT_SECRET")?,
                access_token_ttl: Duration::from_secs(
                    env_or_parse("JWT_ACCESS_TTL_SECS", 900)?, // 15mins
                ),
                refresh_token_ttl: Duration::from_secs(
                    env_or_parse("JWT_REFRESH_TTL_SECS", 3600)?, // 1hr
                ),
            },
            qr: QrConfig {
                api_url: env_or_default("QR_API_URL", DEFAULT_QR_API_URL),
                size: env_or_parse("QR_SIZE", DEFAULT_QR_SIZE)?,
            },
            session: SessionConfig {
                token_prefix: env_or_default("SESSION_TOKEN_PREFIX", DEFAULT_TOKEN_PREFIX),
                token_length: env_or_parse("SESSION_TOKEN_LENGTH", DEFAULT_TOKEN_LENGTH)?,
            },
            cache: CacheConfig {
                ui_session_max_capacity: env_or_parse("UI_SESSION_MAX_CAPACITY", 10_000)?,
                ui_session_idle: Duration::from_secs(env_or_parse("UI_SESSION_IDLE_SECS", 1800)?),
                ui_session_ttl: Duration::from_secs(env_or_parse("UI_SESSION_TTL_SECS", 86_400)?),
                rate_limit_max_capacity: env_or_parse("RATE_LIMIT_MAX_CAPACITY", 100_000)?,
            },
            accounts: AccountsConfig {
                seed_demo_user: env_or_parse("SEED_DEMO_USER", true)?,
            },
            rate_limit: RateLimitConfig {
                auth_limit: env_or_parse("RATE_LIMIT_AUTH", 10)?,
                ui_limit: env_or_parse("RATE_LIMIT_UI", 120)?,
            },
            logging: LoggingConfig {
                format: env_or_parse("LOG_FORMAT", LogFormat::Json)?,
                default_filter: env_or_default("LOG_FILTER", DEFAULT_LOG_FILTER),
            },
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.jwt.secret.len() < 32 {
            return Err(AppError::InvalidParams(
                "JWT_SECRET must be at least 32 characters".into(),
            ));
        }

        if self.qr.size == 0 {
            return Err(AppError::InvalidParams("QR_SIZE must be positive".into()));
        }

        if self.session.token_length == 0 {
            return Err(AppError::InvalidParams(
                "SESSION_TOKEN_LENGTH must be positive".into(),
            ));
        }

        Ok(())
    }

    /// Self-contained configuration for tests and local tooling; nothing is read from the environment.
    pub fn local(jwt_secret: impl Into<String>) -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".into(),
                port: 0,
                cors_allowed_origins: vec![],
                max_concurrent_requests: 100,
                server_public_url: "http://127.0.0.1:8080".into(),
            },
            jwt: JwtConfig {
                secret: jwt_secret.into(),
                access_token_ttl: Duration::from_secs(900),
                refresh_token_ttl: Duration::from_secs(3600),
            },
            qr: QrConfig {
                api_url: DEFAULT_QR_API_URL.into(),
                size: DEFAULT_QR_SIZE,
            },
            session: SessionConfig {
                token_prefix: DEFAULT_TOKEN_PREFIX.into(),
                token_length: DEFAULT_TOKEN_LENGTH,
            },
            cache: CacheConfig {
                ui_session_max_capacity: 1_000,
                ui_session_idle: Duration::from_secs(1800),
                ui_session_ttl: Duration::from_secs(86_400),
                rate_limit_max_capacity: 1_000,
            },
            accounts: AccountsConfig {
                seed_demo_user: true,
            },
            rate_limit: RateLimitConfig {
                auth_limit: 10,
                ui_limit: 120,
            },
            logging: LoggingConfig {
                format: LogFormat::Compact,
                default_filter: DEFAULT_LOG_FILTER.into(),
            },
        }
    }
}

fn env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_or_parse<T: FromStr>(key: &str, default: T) -> Result<T> {
    match env::var(key) {
        Ok(val) => val
            .parse()
            .map_err(|_| AppError::InvalidParams(format!("Invalid value for {key}"))),
        Err(_) => Ok(default),
    }
}

fn env_required(key: &str) -> Result<String> {
    env::var(key).map_err(|_| AppError::InvalidParams(format!("{key} is required")))
}

fn env_list(key: &str, default: Vec<String>) -> Vec<String> {
    env::var(key)
        .map(|val| {
            val.split(',')
                .map(|str_val| str_val.trim().to_string())
                .filter(|str_val| !str_val.is_empty())
                .collect()
        })
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_config_is_valid() {
        let config = Config::local("0123456789abcdef0123456789abcdef");
        assert!(config.validate().is_ok());
        assert_eq!(config.qr.size, 180);
        assert_eq!(config.session.token_prefix, "GODZEXMD-");
    }

    #[test]
    fn short_secret_is_rejected() {
        let config = Config::local("too-short");
        assert!(matches!(config.validate(), Err(AppError::InvalidParams(_))));
    }

    #[test]
    fn log_format_names() {
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("text".parse::<LogFormat>().unwrap(), LogFormat::Compact);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn zero_qr_size_is_rejected() {
        let mut config = Config::local("0123456789abcdef0123456789abcdef");
        config.qr.size = 0;
        assert!(config.validate().is_err());
    }
}
