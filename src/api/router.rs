use axum::{
    Json, Router,
    body::Body,
    extract::{Request, State},
    http::{HeaderName, HeaderValue},
    response::{IntoResponse, Response},
    routing::post,
};
use serde_json::Value;
use uuid::Uuid;

use crate::{
    AppState,
    api::{
        dispatcher::dispatch_method,
        types::{JsonRpcRequest, JsonRpcResponse},
    },
    error::{AppError, JsonRpcErrorResponse, Result},
    middleware::rate_limit::client_key,
    services::auth::{
        TokenType,
        cookie::{
            UI_SESSION_COOKIE, clear_token_cookies, create_cookie, extract_cookie, token_cookies,
        },
    },
};

const MAX_BODY_SIZE: usize = 1024 * 1024;

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(rpc_handler))
}

async fn rpc_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let (parts, body) = request.into_parts();
    let headers = parts.headers;

    let client_key = client_key(&parts.extensions);

    let access_token = extract_cookie(&headers, TokenType::Access.name());
    let refresh_token = extract_cookie(&headers, TokenType::Refresh.name());
    let ui_session = extract_cookie(&headers, UI_SESSION_COOKIE)
        .and_then(|value| Uuid::parse_str(&value).ok());

    let body_bytes = match axum::body::to_bytes(body, MAX_BODY_SIZE).await {
        Ok(b) => b,
        Err(e) => {
            let msg = if e.to_string().contains("length limit") {
                "Request body too large (max 1MB)"
            } else {
                "Parse error"
            };
            return build_json_response(
                JsonRpcErrorResponse::from_error(&AppError::InvalidParams(msg.into()), None),
                vec![],
            );
        }
    };

    let mut request: JsonRpcRequest = match serde_json::from_slice(&body_bytes) {
        Ok(req) => req,
        Err(_) => {
            return build_json_response(
                JsonRpcErrorResponse::from_error(
                    &AppError::InvalidParams("Parse error".into()),
                    None,
                ),
                vec![],
            );
        }
    };

    if !request.has_valid_version() {
        return build_json_response(
            JsonRpcErrorResponse::from_error(
                &AppError::InvalidParams("Invalid JSON-RPC version".into()),
                request.id,
            ),
            vec![],
        );
    }

    let method = request.method.clone();
    let mut params = request.take_params();

    // Credentials and the page session only ever come from cookies.
    if let Value::Object(map) = &mut params {
        map.remove("access_token");
        map.remove("refresh_token");
        map.remove("ui_session");

        if let Some(t) = &access_token {
            map.insert("access_token".to_string(), Value::String(t.clone()));
        }
        if (method == "auth.refresh" || method == "auth.logout")
            && let Some(t) = &refresh_token
        {
            map.insert("refresh_token".to_string(), Value::String(t.clone()));
        }
        if method.starts_with("ui.")
            && let Some(id) = ui_session
        {
            map.insert("ui_session".to_string(), Value::String(id.to_string()));
        }
    }

    let result = dispatch_method(&method, params, state.clone(), &client_key).await;

    let cookies = match response_cookies(&state, &method, &result) {
        Ok(cookies) => cookies,
        Err(err) => {
            return build_json_response(
                JsonRpcErrorResponse::from_error(&err, request.id),
                vec![],
            );
        }
    };

    match result {
        Ok(value) => {
            let result_value = match method.as_str() {
                // Tokens travel in HttpOnly cookies only.
                "auth.login" | "auth.register" | "auth.refresh" => {
                    let user_value = value.get("user").cloned().unwrap_or(Value::Null);
                    serde_json::json!({ "user": user_value })
                }
                _ => value,
            };

            match serde_json::to_value(JsonRpcResponse::new(result_value, request.id.clone())) {
                Ok(response_value) => build_json_response(response_value, cookies),
                Err(e) => build_json_response(
                    JsonRpcErrorResponse::from_error(&AppError::from(e), request.id),
                    vec![],
                ),
            }
        }
        Err(err) => {
            tracing::debug!(method = %method, error = %err, "RPC call failed");
            build_json_response(JsonRpcErrorResponse::from_error(&err, request.id), vec![])
        }
    }
}

fn response_cookies(
    state: &AppState,
    method: &str,
    result: &std::result::Result<Value, AppError>,
) -> Result<Vec<(HeaderName, HeaderValue)>> {
    let secure = state.secure_cookies();

    let Ok(value) = result else {
        return Ok(vec![]);
    };

    let mut cookies = vec![];
    match method {
        "auth.login" | "auth.register" | "auth.refresh" => {
            let access = value.get("access_token").and_then(|t| t.as_str());
            let refresh = value.get("refresh_token").and_then(|t| t.as_str());
            if let (Some(access), Some(refresh)) = (access, refresh) {
                cookies.extend(token_cookies(access, refresh, &state.config.jwt, secure)?);
            }
        }
        "auth.logout" => cookies.extend(clear_token_cookies(secure)?),
        "ui.load" => {
            if let Some(id) = value.get("ui_session").and_then(|id| id.as_str()) {
                cookies.push(create_cookie(
                    UI_SESSION_COOKIE,
                    id,
                    state.config.cache.ui_session_ttl.as_secs() as i64,
                    secure,
                )?);
            }
        }
        _ => {}
    }

    Ok(cookies)
}

fn build_json_response(value: Value, cookies: Vec<(HeaderName, HeaderValue)>) -> Response {
    let mut response = Json(value).into_response();

    for (name, val) in cookies {
        response.headers_mut().append(name, val);
    }

    response
}
