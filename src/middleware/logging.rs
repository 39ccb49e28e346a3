use axum::extract::Request;
use tracing::{Span, info_span};
use uuid::Uuid;

use crate::utils::security::mask_uri_token;

/// Which part of the app a request is addressed to.
fn surface(path: &str) -> &'static str {
    match path {
        "/health" => "health",
        p if p == "/api" || p.starts_with("/api/") => "rpc",
        p if p.starts_with("/static/") => "asset",
        _ => "page",
    }
}

pub fn make_log_span(request: &Request) -> Span {
    info_span!(
        "http",
        request_id = %Uuid::new_v4(),
        surface = surface(request.uri().path()),
        method = %request.method(),
        uri = %mask_uri_token(&request.uri().to_string()),
    )
}
