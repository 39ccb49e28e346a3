use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::JwtConfig;

pub mod cookie;
pub mod jwt;
pub mod session;

pub use jwt::{JwtClaims, JwtService};
pub use session::{AuthOperation, authenticate, current_user, logout, refresh};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

impl TokenType {
    pub const BOTH: [TokenType; 2] = [TokenType::Access, TokenType::Refresh];

    /// Cookie and claim name.
    pub fn name(&self) -> &'static str {
        match self {
            TokenType::Access => "access_token",
            TokenType::Refresh => "refresh_token",
        }
    }

    pub fn ttl(&self, config: &JwtConfig) -> Duration {
        match self {
            TokenType::Access => config.access_token_ttl,
            TokenType::Refresh => config.refresh_token_ttl,
        }
    }
}
