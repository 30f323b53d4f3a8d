//! Session token transport: the session cookie and the bearer fallback.

use axum::http::{HeaderMap, HeaderValue};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::{Authorization, HeaderMapExt};

use cookie::time::Duration;

use citadel_core::config::{SameSitePolicy, SessionConfig};
use citadel_core::error::AppError;

/// `Set-Cookie` value carrying a fresh session id.
pub fn session_cookie(config: &SessionConfig, session_id: &str) -> Result<HeaderValue, AppError> {
    build(config, session_id, config.duration_seconds())
}

/// `Set-Cookie` value that makes the client drop its session cookie.
pub fn clear_cookie(config: &SessionConfig) -> Result<HeaderValue, AppError> {
    build(config, "", 0)
}

fn build(config: &SessionConfig, value: &str, max_age: i64) -> Result<HeaderValue, AppError> {
    let cookie = Cookie::build((config.cookie_name.clone(), value.to_owned()))
        .path("/")
        .max_age(Duration::seconds(max_age))
        .http_only(true)
        .same_site(same_site(config.same_site))
        .secure(config.cookie_secure)
        .build();

    HeaderValue::from_str(&cookie.to_string())
        .map_err(|e| AppError::internal(format!("Invalid session cookie: {e}")))
}

fn same_site(policy: SameSitePolicy) -> SameSite {
    match policy {
        SameSitePolicy::Strict => SameSite::Strict,
        SameSitePolicy::Lax => SameSite::Lax,
    }
}

/// Session token from the cookie, falling back to `Authorization: Bearer`.
pub fn session_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    let jar = CookieJar::from_headers(headers);
    if let Some(cookie) = jar.get(cookie_name).filter(|c| !c.value().is_empty()) {
        return Some(cookie.value().to_string());
    }

    headers
        .typed_get::<Authorization<Bearer>>()
        .map(|auth| auth.token().to_string())
        .filter(|token| !token.is_empty())
}
