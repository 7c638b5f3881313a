//! Axum adapter for the [`LocaleRouter`](crate::routing::LocaleRouter).
//!
//! Turns a routing [`Decision`] into either a `307` redirect or a call to the inner
//! service, and attaches any cookie writes to the response actually sent back.

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::cookies;
use crate::routing::{CookieAction, Decision, RouteRequest};
use crate::state::AppState;

/// Runs the locale/admin router in front of every request.
///
/// On `Forward` the resolved [`Locale`](crate::i18n::Locale) (and the admin session, if
/// the admin gate accepted one) are inserted as request extensions for page handlers.
pub async fn locale_router_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let now_ms = chrono::Utc::now().timestamp_millis();
    let route_req = RouteRequest::from_http(req.uri(), req.headers(), state.router.config());
    let decision = state.router.route(&route_req, now_ms);
    state.metrics.record_decision(&decision);

    match decision {
        Decision::Bypass => next.run(req).await,
        Decision::Redirect { location, reason, cookies } => {
            tracing::debug!(from = %route_req.path, to = %location, reason = reason.as_str(), "redirecting");
            let mut res = redirect(&location);
            apply_cookies(&mut res, &cookies, &state);
            res
        }
        Decision::Forward { locale, admin, cookies } => {
            req.extensions_mut().insert(locale);
            if let Some(session) = admin {
                req.extensions_mut().insert(session);
            }
            let mut res = next.run(req).await;
            apply_cookies(&mut res, &cookies, &state);
            res
        }
    }
}

fn redirect(location: &str) -> Response {
    match HeaderValue::from_str(location) {
        Ok(value) => (StatusCode::TEMPORARY_REDIRECT, [(header::LOCATION, value)]).into_response(),
        Err(e) => {
            // Request paths come from a parsed URI, so this only trips on exotic input.
            tracing::warn!(%location, error = %e, "redirect target is not a valid header value");
            StatusCode::BAD_REQUEST.into_response()
        }
    }
}

fn apply_cookies(res: &mut Response, actions: &[CookieAction], state: &AppState) {
    let cfg = state.router.config();
    for action in actions {
        let cookie = match action {
            CookieAction::SetLocale(locale) => {
                cookies::locale_cookie(&cfg.locale_cookie, locale.as_str(), cfg.locale_cookie_max_age_days)
            }
            CookieAction::ClearSession => {
                let mut c = cookies::removal_cookie(&cfg.session_cookie);
                c.set_secure(state.config.admin.secure_cookies);
                c
            }
        };
        match HeaderValue::from_str(&cookie.to_string()) {
            Ok(value) => {
                res.headers_mut().append(header::SET_COOKIE, value);
            }
            Err(e) => tracing::warn!(error = %e, "dropping unrepresentable Set-Cookie"),
        }
    }
}
