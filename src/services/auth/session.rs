use crate::{
    AppState,
    error::{AppError, Result},
    infrastructure::store::UserRecord,
    services::auth::{JwtClaims, TokenType},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOperation {
    Login,
    Register,
}

#[derive(Debug)]
pub struct IssuedSession {
    pub access_token: String,
    pub refresh_token: String,
    pub user: UserRecord,
}

pub async fn authenticate(
    state: &AppState,
    operation: AuthOperation,
    username: &str,
    password: &str,
) -> Result<IssuedSession> {
    let user = match operation {
        AuthOperation::Login => state.users.verify_credentials(username, password).await?,
        AuthOperation::Register => {
            if username.is_empty() || password.is_empty() {
                return Err(AppError::InvalidParams(
                    "Username and password are required.".into(),
                ));
            }
            state.users.create_user(username, password).await?
        }
    };

    tracing::info!(username = %user.username, ?operation, "User authenticated");
    issue_session(state, user)
}

pub async fn current_user(state: &AppState, access_token: &str) -> Result<UserRecord> {
    let claims = state
        .jwt_service
        .validate_token(access_token, TokenType::Access)?;

    if state.cache.local.is_token_blacklisted(&claims.jti).await {
        return Err(AppError::Unauthorized);
    }

    state
        .users
        .find_user_by_username(&claims.username)
        .await
        .filter(|user| user.id == claims.sub)
        .ok_or(AppError::Unauthorized)
}

pub async fn logout(
    state: &AppState,
    access_token: &str,
    refresh_token: Option<&str>,
) -> Result<()> {
    let access_claims = state
        .jwt_service
        .validate_token(access_token, TokenType::Access)?;
    revoke(state, &access_claims).await;

    if let Some(refresh_token) = refresh_token
        && let Ok(refresh_claims) = state
            .jwt_service
            .validate_token(refresh_token, TokenType::Refresh)
    {
        revoke(state, &refresh_claims).await;
    }

    tracing::info!(username = %access_claims.username, "User logged out");
    Ok(())
}

/// Rotates the token pair. The presented refresh token can be used once.
pub async fn refresh(
    state: &AppState,
    access_token: Option<&str>,
    refresh_token: &str,
) -> Result<IssuedSession> {
    if let Some(access_token) = access_token
        && let Ok(access_claims) = state
            .jwt_service
            .validate_token(access_token, TokenType::Access)
    {
        revoke(state, &access_claims).await;
    }

    let refresh_claims = state
        .jwt_service
        .validate_token(refresh_token, TokenType::Refresh)?;

    if state
        .cache
        .local
        .is_token_blacklisted(&refresh_claims.jti)
        .await
    {
        return Err(AppError::Unauthorized);
    }
    revoke(state, &refresh_claims).await;

    let user = state
        .users
        .find_user_by_username(&refresh_claims.username)
        .await
        .filter(|user| user.id == refresh_claims.sub)
        .ok_or(AppError::UserNotFound)?;

    issue_session(state, user)
}

fn issue_session(state: &AppState, user: UserRecord) -> Result<IssuedSession> {
    let (access_token, refresh_token) = state.jwt_service.issue_pair(user.id, &user.username)?;

    Ok(IssuedSession {
        access_token,
        refresh_token,
        user,
    })
}

async fn revoke(state: &AppState, claims: &JwtClaims) {
    state.cache.local.blacklist_token(&claims.jti, claims.exp).await;
}
