use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    AppState, infrastructure::store::UserRecord, services::auth::AuthOperation,
};

#[derive(Deserialize)]
pub struct AuthParams {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,

    #[serde(skip)]
    pub state: Option<AppState>,

    #[serde(skip)]
    pub operation: Option<AuthOperation>,
}

#[derive(Deserialize)]
pub struct SessionParams {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,

    #[serde(skip)]
    pub state: Option<AppState>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

impl From<&UserRecord> for UserResponse {
    fn from(user: &UserRecord) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username.clone(),
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: UserResponse,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: UserResponse,
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub success: bool,
}
