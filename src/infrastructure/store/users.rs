use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{AppError, Result};

pub const DEMO_USERNAME: &str = "testuser";
pub const DEMO_PASSWORD: &str = "password123";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: Uuid,
    pub username: String,
    pub password: String,
    pub created_at: DateTime<Utc>,
}

/// Process-local account table. Nothing survives a restart.
#[derive(Default)]
pub struct UserStore {
    users: RwLock<HashMap<String, UserRecord>>,
}

impl UserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn seeded() -> Self {
        let store = Self::new();
        if let Err(e) = store.create_user(DEMO_USERNAME, DEMO_PASSWORD).await {
            tracing::warn!(error = ?e, "Failed to seed demo user");
        }
        store
    }

    pub async fn create_user(&self, username: &str, password: &str) -> Result<UserRecord> {
        let mut users = self.users.write().await;

        if users.contains_key(username) {
            return Err(AppError::UsernameExists);
        }

        let user = UserRecord {
            id: Uuid::new_v4(),
            username: username.to_string(),
            password: password.to_string(),
            created_at: Utc::now(),
        };
        users.insert(username.to_string(), user.clone());

        tracing::info!(username = %username, "User registered");
        Ok(user)
    }

    pub async fn find_user_by_username(&self, username: &str) -> Option<UserRecord> {
        self.users.read().await.get(username).cloned()
    }

    pub async fn verify_credentials(&self, username: &str, password: &str) -> Result<UserRecord> {
        match self.find_user_by_username(username).await {
            Some(user) if user.password == password => Ok(user),
            _ => Err(AppError::InvalidCredentials),
        }
    }

    pub async fn count(&self) -> usize {
        self.users.read().await.len()
    }
}
