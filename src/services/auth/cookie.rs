use axum::http::{HeaderMap, HeaderName, HeaderValue, header};

use crate::{
    config::JwtConfig,
    error::{AppError, Result},
    services::auth::TokenType,
};

pub const UI_SESSION_COOKIE: &str = "ui_session";
pub const FLASH_COOKIE: &str = "flash";

pub fn create_cookie(
    name: &str,
    value: &str,
    max_age_secs: i64,
    secure: bool,
) -> Result<(HeaderName, HeaderValue)> {
    let secure_flag = if secure { "; Secure" } else { "" };
    let cookie_value = format!(
        "{}={}; Path=/; Max-Age={}; HttpOnly; SameSite=Lax{}",
        name, value, max_age_secs, secure_flag
    );

    Ok((header::SET_COOKIE, to_header_value(&cookie_value)?))
}

pub fn clear_cookie(name: &str, secure: bool) -> Result<(HeaderName, HeaderValue)> {
    let secure_flag = if secure { "; Secure" } else { "" };
    let cookie_value = format!(
        "{}=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax{}",
        name, secure_flag
    );

    Ok((header::SET_COOKIE, to_header_value(&cookie_value)?))
}

/// `Set-Cookie` headers for a freshly issued token pair.
pub fn token_cookies(
    access_token: &str,
    refresh_token: &str,
    config: &JwtConfig,
    secure: bool,
) -> Result<Vec<(HeaderName, HeaderValue)>> {
    [(TokenType::Access, access_token), (TokenType::Refresh, refresh_token)]
        .into_iter()
        .map(|(token_type, value)| {
            create_cookie(
                token_type.name(),
                value,
                token_type.ttl(config).as_secs() as i64,
                secure,
            )
        })
        .collect()
}

pub fn clear_token_cookies(secure: bool) -> Result<Vec<(HeaderName, HeaderValue)>> {
    TokenType::BOTH
        .iter()
        .map(|token_type| clear_cookie(token_type.name(), secure))
        .collect()
}

pub fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|val| val.to_str().ok())
        .find_map(|val| {
            val.split(';').find_map(|cookie| {
                cookie
                    .trim()
                    .strip_prefix(&format!("{}=", name))
                    .map(|cookie_str| cookie_str.to_string())
            })
        })
        .filter(|value| !value.is_empty())
}

fn to_header_value(cookie_value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(cookie_value)
        .map_err(|e| AppError::InternalServerError(format!("Invalid cookie value: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cookie_flags() {
        let (name, value) = create_cookie("access_token", "abc", 900, true).unwrap();
        assert_eq!(name, header::SET_COOKIE);
        assert_eq!(
            value.to_str().unwrap(),
            "access_token=abc; Path=/; Max-Age=900; HttpOnly; SameSite=Lax; Secure"
        );
    }

    #[test]
    fn cleared_cookie_expires_immediately() {
        let (_, value) = clear_cookie("refresh_token", false).unwrap();
        assert_eq!(
            value.to_str().unwrap(),
            "refresh_token=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax"
        );
    }

    #[test]
    fn token_pair_cookies_use_their_own_ttl() {
        let config = crate::config::Config::local("0123456789abcdef0123456789abcdef");
        let cookies = token_cookies("a", "r", &config.jwt, false).unwrap();

        let values: Vec<_> = cookies
            .iter()
            .map(|(_, value)| value.to_str().unwrap().to_string())
            .collect();
        assert!(values[0].starts_with("access_token=a; Path=/; Max-Age=900;"));
        assert!(values[1].starts_with("refresh_token=r; Path=/; Max-Age=3600;"));
    }

    #[test]
    fn extracts_named_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; access_token=tok; ui_session="),
        );
        assert_eq!(extract_cookie(&headers, "access_token").as_deref(), Some("tok"));
        assert_eq!(extract_cookie(&headers, "ui_session"), None);
        assert_eq!(extract_cookie(&headers, "missing"), None);
    }
}
