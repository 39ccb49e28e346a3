use serde_json::Value;

use crate::{
    AppState,
    api::{
        methods::{
            auth::{authenticate_user, get_current_user, logout_user, refresh_user_token},
            qr::build_qr_url,
            session::generate_session,
            ui::{click_control, image_loaded, load_ui},
        },
        types::{
            AuthParams, ClickParams, GenerateSessionParams, ImageLoadedParams, LoadUiParams,
            QrUrlParams, SessionParams,
        },
    },
    error::AppError,
    services::auth::AuthOperation,
};

macro_rules! dispatch {
    ($param_type:ty, $handler:path, $params:expr, $state:expr) => {{
        let mut p: $param_type =
            serde_json::from_value($params).map_err(|e| AppError::InvalidParams(e.to_string()))?;

        p.state = Some($state);

        let result = $handler(p).await?;
        serde_json::to_value(result).map_err(AppError::from)
    }};

    ($param_ty:ty, $handler:path, $params:expr, $state:expr, $op_field:ident = $op_value:expr) => {{
        let mut p: $param_ty =
            serde_json::from_value($params).map_err(|e| AppError::InvalidParams(e.to_string()))?;
        p.state = Some($state);
        p.$op_field = Some($op_value);

        let result = $handler(p).await?;
        serde_json::to_value(result).map_err(AppError::from)
    }};
}

async fn dispatch_auth(method: &str, params: Value, state: AppState) -> Result<Value, AppError> {
    match method {
        "auth.register" => dispatch!(
            AuthParams,
            authenticate_user,
            params,
            state,
            operation = AuthOperation::Register
        ),
        "auth.login" => dispatch!(
            AuthParams,
            authenticate_user,
            params,
            state,
            operation = AuthOperation::Login
        ),
        "auth.logout" => dispatch!(SessionParams, logout_user, params, state),
        "auth.refresh" => dispatch!(SessionParams, refresh_user_token, params, state),
        "auth.me" => dispatch!(SessionParams, get_current_user, params, state),
        _ => Err(AppError::MethodNotFound(method.to_string())),
    }
}

async fn dispatch_ui(method: &str, params: Value, state: AppState) -> Result<Value, AppError> {
    match method {
        "ui.load" => dispatch!(LoadUiParams, load_ui, params, state),
        "ui.click" => dispatch!(ClickParams, click_control, params, state),
        "ui.imageLoaded" => dispatch!(ImageLoadedParams, image_loaded, params, state),
        _ => Err(AppError::MethodNotFound(method.to_string())),
    }
}

async fn dispatch_tools(method: &str, params: Value, state: AppState) -> Result<Value, AppError> {
    match method {
        "session.generate" => dispatch!(GenerateSessionParams, generate_session, params, state),
        "qr.url" => dispatch!(QrUrlParams, build_qr_url, params, state),
        _ => Err(AppError::MethodNotFound(method.to_string())),
    }
}

pub async fn dispatch_method(
    method: &str,
    params: Value,
    state: AppState,
    client_key: &str,
) -> Result<Value, AppError> {
    let limiter = match method {
        "auth.login" | "auth.register" | "auth.refresh" => Some(&state.rate_limiters.auth),
        "ui.load" | "ui.click" | "ui.imageLoaded" | "session.generate" | "qr.url" => {
            Some(&state.rate_limiters.ui)
        }
        _ => None,
    };

    if let Some(limiter) = limiter {
        let (allowed, _, _) = limiter.check(client_key).await?;
        if !allowed {
            tracing::warn!(method, client = client_key, "Rate limit exceeded");
            return Err(AppError::RateLimitExceeded);
        }
    }

    if method.starts_with("auth.") {
        return dispatch_auth(method, params, state).await;
    }
    if method.starts_with("ui.") {
        return dispatch_ui(method, params, state).await;
    }
    if method.starts_with("session.") || method.starts_with("qr.") {
        return dispatch_tools(method, params, state).await;
    }
    Err(AppError::MethodNotFound(method.to_string()))
}
