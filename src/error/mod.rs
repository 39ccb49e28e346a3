use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Serialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct JsonRpcErrorResponse {
    pub jsonrpc: &'static str,
    pub id: Option<Value>,
    pub error: JsonRpcError,
}

impl JsonRpcErrorResponse {
    pub fn new(error: JsonRpcError, id: Option<Value>) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            error,
        }
    }

    pub fn from_error(err: &AppError, id: Option<Value>) -> Value {
        serde_json::to_value(Self::new(err.user_safe_format(), id)).unwrap_or_else(|_| {
            serde_json::json!({
                "jsonrpc": "2.0",
                "id": Value::Null,
                "error": { "code": -32603, "message": "Internal server error" },
            })
        })
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid params - {0}")]
    InvalidParams(String),

    #[error("Internal server error - {0}")]
    InternalServerError(String),

    #[error("Serialization error - {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error - {0}")]
    IoError(#[from] std::io::Error),

    #[error("TryInitError - {0}")]
    TryInitError(#[from] tracing_subscriber::util::TryInitError),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Username already exists")]
    UsernameExists,

    #[error("User not found")]
    UserNotFound,

    #[error("Method not found - {0}")]
    MethodNotFound(String),

    #[error("Unknown control - {0}")]
    UnknownControl(String),

    #[error("Missing page element - {0}")]
    MissingElement(String),

    #[error("UI session not found")]
    UiSessionNotFound,

    #[error("Rate limit exceeded")]
    RateLimitExceeded,
}

impl AppError {
    pub fn code(&self) -> i32 {
        match self {
            Self::InvalidParams(_) => -32602,
            Self::InternalServerError(_) => -32603,
            Self::MethodNotFound(_) => -32601,
            Self::SerializationError(_) => -32072,
            Self::IoError(_) => -32080,
            Self::TryInitError(_) => -32080,
            Self::Unauthorized => -32020,
            Self::TokenExpired => -32021,
            Self::InvalidCredentials => -32012,
            Self::UsernameExists => -32013,
            Self::UserNotFound => -32011,
            Self::UnknownControl(_) => -32050,
            Self::MissingElement(_) => -32051,
            Self::UiSessionNotFound => -32052,
            Self::RateLimitExceeded => -32081,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized | Self::TokenExpired | Self::InvalidCredentials => {
                StatusCode::UNAUTHORIZED
            }
            Self::UserNotFound | Self::UiSessionNotFound | Self::MethodNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            Self::UsernameExists => StatusCode::CONFLICT,
            Self::InvalidParams(_) | Self::UnknownControl(_) | Self::MissingElement(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
            Self::IoError(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::InternalServerError(_) | Self::SerializationError(_) | Self::TryInitError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message safe to show a visitor. Internal failures are logged here and
    /// replaced by a generic message.
    fn public_message(&self) -> String {
        match self {
            Self::InvalidParams(msg) => msg.clone(),
            Self::InternalServerError(_) | Self::SerializationError(_) | Self::TryInitError(_) => {
                tracing::error!(error = %self, "Internal error");
                "Internal server error".to_string()
            }
            Self::IoError(error) => {
                tracing::error!(error = %error, "IO error");
                "Service temporarily unavailable. Please try again later.".to_string()
            }
            Self::Unauthorized => "Please log in to access this page.".to_string(),
            Self::TokenExpired => "Session has expired. Please login again.".to_string(),
            Self::InvalidCredentials => "Invalid username or password.".to_string(),
            Self::UsernameExists => "Username already taken. Please choose another.".to_string(),
            Self::UserNotFound => "No account found. Please sign up first.".to_string(),
            Self::MethodNotFound(method) => format!("Method '{method}' not found"),
            Self::UnknownControl(control) => format!("Unknown control '{control}'"),
            Self::MissingElement(id) => format!("Page is missing element '{id}'"),
            Self::UiSessionNotFound => "Page session expired. Please reload.".to_string(),
            Self::RateLimitExceeded => "Too many requests. Try again in a moment.".to_string(),
        }
    }

    pub fn user_safe_format(&self) -> JsonRpcError {
        let data = match self {
            Self::MissingElement(id) => Some(serde_json::json!({ "element": id })),
            _ => None,
        };

        JsonRpcError {
            code: self.code(),
            message: self.public_message(),
            data,
        }
    }
}

impl From<&AppError> for JsonRpcError {
    fn from(error: &AppError) -> Self {
        error.user_safe_format()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let json_error = self.user_safe_format();
        let body = serde_json::to_string(&json_error)
            .unwrap_or_else(|_| r#"{"code":-32603,"message":"Internal server error"}"#.to_string());

        (status, [("content-type", "application/json")], body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_details_are_not_exposed() {
        let err = AppError::InternalServerError("lock poisoned at 0xdeadbeef".into());
        let formatted = err.user_safe_format();
        assert_eq!(formatted.code, -32603);
        assert_eq!(formatted.message, "Internal server error");
    }

    #[test]
    fn error_response_carries_request_id() {
        let value = JsonRpcErrorResponse::from_error(
            &AppError::MethodNotFound("nope.nothing".into()),
            Some(serde_json::json!(7)),
        );
        assert_eq!(value["jsonrpc"], "2.0");
        assert_eq!(value["id"], 7);
        assert_eq!(value["error"]["code"], -32601);
    }

    #[test]
    fn rate_limit_maps_to_429() {
        let response = AppError::RateLimitExceeded.into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    }
}
