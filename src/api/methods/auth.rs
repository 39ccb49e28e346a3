use crate::{
    api::{
        methods::require_state,
        types::{AuthParams, AuthResponse, LogoutResponse, MeResponse, SessionParams},
    },
    error::{AppError, Result},
    services::auth::{self, session::IssuedSession},
};

pub async fn authenticate_user(params: AuthParams) -> Result<AuthResponse> {
    let app_state = require_state(params.state)?;

    let operation = params.operation.ok_or(AppError::InternalServerError(
        "Failed to get method operation".to_string(),
    ))?;

    let session =
        auth::authenticate(&app_state, operation, &params.username, &params.password).await?;

    Ok(to_auth_response(session))
}

pub async fn logout_user(params: SessionParams) -> Result<LogoutResponse> {
    let app_state = require_state(params.state)?;

    let access_token = params.access_token.ok_or(AppError::Unauthorized)?;
    auth::logout(&app_state, &access_token, params.refresh_token.as_deref()).await?;

    Ok(LogoutResponse { success: true })
}

pub async fn refresh_user_token(params: SessionParams) -> Result<AuthResponse> {
    let app_state = require_state(params.state)?;

    let refresh_token = params
        .refresh_token
        .ok_or(AppError::InvalidParams("refresh_token is required".into()))?;

    let session = auth::refresh(
        &app_state,
        params.access_token.as_deref(),
        &refresh_token,
    )
    .await?;

    Ok(to_auth_response(session))
}

pub async fn get_current_user(params: SessionParams) -> Result<MeResponse> {
    let app_state = require_state(params.state)?;

    let access_token = params.access_token.ok_or(AppError::Unauthorized)?;
    let user = auth::current_user(&app_state, &access_token).await?;

    Ok(MeResponse {
        user: (&user).into(),
    })
}

fn to_auth_response(session: IssuedSession) -> AuthResponse {
    AuthResponse {
        user: (&session.user).into(),
        access_token: session.access_token,
        refresh_token: session.refresh_token,
    }
}
