use axum::http::{HeaderName, HeaderValue};
use axum_extra::TypedHeader;
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use headers::Cookie;
use serde::{Deserialize, Serialize};

use crate::{
    error::Result,
    services::auth::cookie::{FLASH_COOKIE, clear_cookie, create_cookie},
};

const FLASH_MAX_AGE_SECS: i64 = 60;
const BASE_STYLE: &str = "color: #333; padding: 10px; border: 1px solid #ccc; margin-bottom: 10px;";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashCategory {
    Danger,
    Success,
    Info,
}

impl FlashCategory {
    pub fn style(&self) -> String {
        let background = match self {
            FlashCategory::Danger => "#fdd",
            FlashCategory::Success => "#dfd",
            FlashCategory::Info => "#ddf",
        };
        format!("background-color: {background}; {BASE_STYLE}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub category: FlashCategory,
    pub message: String,
}

impl Flash {
    pub fn new(category: FlashCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
        }
    }
}

/// Stores `flashes` in a short-lived cookie for the next rendered page.
pub fn flash_cookie(flashes: &[Flash], secure: bool) -> Result<(HeaderName, HeaderValue)> {
    let encoded = URL_SAFE_NO_PAD.encode(serde_json::to_vec(flashes)?);
    create_cookie(FLASH_COOKIE, &encoded, FLASH_MAX_AGE_SECS, secure)
}

/// Reads pending flashes. A tampered or stale cookie yields nothing.
pub fn read_flashes(cookies: Option<&TypedHeader<Cookie>>) -> Vec<Flash> {
    cookies
        .and_then(|cookies| cookies.get(FLASH_COOKIE))
        .and_then(|value| URL_SAFE_NO_PAD.decode(value).ok())
        .and_then(|bytes| serde_json::from_slice(&bytes).ok())
        .unwrap_or_default()
}

/// Cookie header that consumes the flashes a page just rendered.
pub fn consume_flashes(flashes: &[Flash], secure: bool) -> Result<Option<(HeaderName, HeaderValue)>> {
    if flashes.is_empty() {
        return Ok(None);
    }
    Ok(Some(clear_cookie(FLASH_COOKIE, secure)?))
}
