//! Reading request cookies and rendering `Set-Cookie` values.

use axum::http::{header::COOKIE, HeaderMap};
use cookie::time::Duration;
use cookie::{Cookie, SameSite};

/// Returns the value of the first cookie called `name` across all `Cookie` headers.
pub fn read(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|hv| hv.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|c| c.name() == name)
        .map(|c| c.value().to_string())
}

/// Locale preference cookie: readable by scripts, site-wide.
pub fn locale_cookie(name: &str, locale: &str, max_age_days: i64) -> Cookie<'static> {
    Cookie::build((name.to_string(), locale.to_string()))
        .path("/")
        .max_age(Duration::days(max_age_days))
        .same_site(SameSite::Lax)
        .build()
}

pub fn session_cookie(name: &str, token: String, ttl_hours: i64, secure: bool) -> Cookie<'static> {
    Cookie::build((name.to_string(), token))
        .path("/")
        .http_only(true)
        .secure(secure)
        .max_age(Duration::hours(ttl_hours))
        .same_site(SameSite::Lax)
        .build()
}

/// A cookie that tells the browser to drop `name` (empty value, `Max-Age=0`).
pub fn removal_cookie(name: &str) -> Cookie<'static> {
    let mut c = Cookie::build((name.to_string(), "")).path("/").http_only(true).build();
    c.make_removal();
    c
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_read_scans_all_cookie_headers() {
        let mut headers = HeaderMap::new();
        headers.append(COOKIE, HeaderValue::from_static("theme=dark; NEXT_LOCALE=de"));
        headers.append(COOKIE, HeaderValue::from_static("admin-session=eyJhIjoxfQ=="));

        assert_eq!(read(&headers, "NEXT_LOCALE").as_deref(), Some("de"));
        assert_eq!(read(&headers, "admin-session").as_deref(), Some("eyJhIjoxfQ=="));
        assert_eq!(read(&headers, "missing"), None);
    }

    #[test]
    fn test_locale_cookie_attributes() {
        let rendered = locale_cookie("NEXT_LOCALE", "de", 30).to_string();
        assert!(rendered.starts_with("NEXT_LOCALE=de"));
        assert!(rendered.contains("Path=/"));
        assert!(rendered.contains("Max-Age=2592000"));
        assert!(!rendered.contains("HttpOnly"));
    }

    #[test]
    fn test_session_cookie_is_http_only() {
        let rendered = session_cookie("admin-session", "abc".into(), 24, true).to_string();
        assert!(rendered.contains("HttpOnly"));
        assert!(rendered.contains("Secure"));
        assert!(rendered.contains("Max-Age=86400"));
    }

    #[test]
    fn test_removal_cookie_expires_immediately() {
        let rendered = removal_cookie("admin-session").to_string();
        assert!(rendered.starts_with("admin-session="));
        assert!(rendered.contains("Max-Age=0"));
        assert!(rendered.contains("Path=/"));
    }
}
