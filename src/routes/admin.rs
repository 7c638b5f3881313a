//! Admin session endpoints.
//!
//! These live under the API prefix, so the page router never gates them; they are what
//! issues and clears the cookie the admin gate checks.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header::SET_COOKIE, HeaderMap, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::cookies;
use crate::error::{validation::validate_required, AppError, AppResult};
use crate::session::AdminSession;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub admin_id: String,
    pub exp: i64,
}

impl From<AdminSession> for SessionInfo {
    fn from(s: AdminSession) -> Self {
        Self { admin_id: s.admin_id, exp: s.exp }
    }
}

/// Compares without short-circuiting on the first differing byte.
fn constant_time_eq(provided: &[u8], expected: &[u8]) -> bool {
    if provided.len() != expected.len() {
        return false;
    }
    let mut diff = 0u8;
    for (a, b) in provided.iter().zip(expected) {
        diff |= a ^ b;
    }
    diff == 0
}

fn set_cookie(res: &mut Response, cookie: cookie::Cookie<'static>) -> AppResult<()> {
    let value = HeaderValue::from_str(&cookie.to_string())
        .map_err(|e| AppError::Internal(anyhow::anyhow!("invalid Set-Cookie value: {}", e)))?;
    res.headers_mut().append(SET_COOKIE, value);
    Ok(())
}

/// `POST /api/admin/login` - checks the configured credentials and issues a session cookie.
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<Response> {
    let Json(body) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    validate_required(&body.username, "username")?;
    validate_required(&body.password, "password")?;

    let admin = &state.config.admin;
    // Evaluate both so timing does not reveal which one was wrong.
    let user_ok = constant_time_eq(body.username.as_bytes(), admin.username.as_bytes());
    let pass_ok = constant_time_eq(body.password.as_bytes(), admin.password.as_bytes());
    if !(user_ok & pass_ok) {
        state.metrics.inc_logins_failed();
        tracing::warn!(username = %body.username, "admin login failed");
        return Err(AppError::Unauthorized("Invalid username or password".to_string()));
    }

    let now_ms = chrono::Utc::now().timestamp_millis();
    let session = AdminSession::issue(admin.username.clone(), Duration::hours(admin.session_ttl_hours), now_ms);
    let cookie = cookies::session_cookie(
        &admin.session_cookie,
        session.encode(),
        admin.session_ttl_hours,
        admin.secure_cookies,
    );

    let mut res = Json(SessionInfo::from(session)).into_response();
    set_cookie(&mut res, cookie)?;
    state.metrics.inc_logins_succeeded();
    tracing::info!(admin_id = %admin.username, "admin logged in");
    Ok(res)
}

/// `POST /api/admin/logout` - always succeeds and clears the session cookie.
pub async fn logout(State(state): State<AppState>) -> AppResult<Response> {
    let mut cookie = cookies::removal_cookie(&state.config.admin.session_cookie);
    cookie.set_secure(state.config.admin.secure_cookies);
    let mut res = Json(serde_json::json!({ "success": true })).into_response();
    set_cookie(&mut res, cookie)?;
    Ok(res)
}

/// `GET /api/admin/session` - reports the current session, 401 when missing or stale.
pub async fn session(State(state): State<AppState>, headers: HeaderMap) -> AppResult<Json<SessionInfo>> {
    let raw = cookies::read(&headers, &state.config.admin.session_cookie)
        .ok_or_else(|| AppError::Unauthorized("No admin session".to_string()))?;
    let now_ms = chrono::Utc::now().timestamp_millis();
    AdminSession::validate(&raw, now_ms)
        .map(|s| Json(SessionInfo::from(s)))
        .map_err(|e| AppError::Unauthorized(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::constant_time_eq;

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"secret", b"secret"));
        assert!(!constant_time_eq(b"secret", b"secreT"));
        assert!(!constant_time_eq(b"secret", b"secret!"));
        assert!(constant_time_eq(b"", b""));
    }
}
