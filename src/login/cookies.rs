//! Session cookie extraction from `Set-Cookie` response headers.

use crate::types::StoredCookie;
use chrono::{DateTime, Utc};
use reqwest::Response;

/// Parse every `Set-Cookie` header of `response` in arrival order.
///
/// Lines the cookie parser rejects are skipped; the remaining headers are
/// still processed. `Max-Age` takes precedence over `Expires` (RFC 6265).
pub fn extract_cookies(response: &Response) -> Vec<StoredCookie> {
    let now = Utc::now();
    let cookies: Vec<StoredCookie> = response
        .cookies()
        .map(|cookie| {
            let expires = cookie
                .max_age()
                .and_then(|max_age| chrono::Duration::from_std(max_age).ok())
                .map(|max_age| now + max_age)
                .or_else(|| cookie.expires().map(DateTime::<Utc>::from));

            StoredCookie {
                name: cookie.name().to_string(),
                value: cookie.value().to_string(),
                domain: cookie.domain().unwrap_or_default().to_string(),
                path: cookie.path().unwrap_or_default().to_string(),
                expires,
                secure: cookie.secure(),
                http_only: cookie.http_only(),
            }
        })
        .collect();

    let raw_count = response
        .headers()
        .get_all(reqwest::header::SET_COOKIE)
        .iter()
        .count();
    if raw_count > cookies.len() {
        tracing::debug!(
            "Skipped {} unparsable Set-Cookie header(s)",
            raw_count - cookies.len()
        );
    }

    cookies
}
