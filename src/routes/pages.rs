//! Locale-prefixed page entry point.
//!
//! Real page content comes from the template layer; this handler only produces the
//! document shell every page shares: `lang`, `hreflang` alternates and the admin marker.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::i18n::{replace_first_segment, Locale};
use crate::session::AdminSession;
use crate::state::AppState;

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('\'', "&#39;")
}

/// `GET /{locale}` and `GET /{locale}/{*rest}`.
///
/// Requests that reach this handler without a resolved locale (the router bypassed them,
/// e.g. `/en/_next/...`) are answered with `404`.
pub async fn render(State(state): State<AppState>, req: Request) -> Response {
    let Some(locale) = req.extensions().get::<Locale>().cloned() else {
        return StatusCode::NOT_FOUND.into_response();
    };
    let admin = req.extensions().get::<AdminSession>().map(|s| s.admin_id.clone());
    let path = req.uri().path();
    let locales = &state.router.config().locales;

    let mut alternates = String::new();
    for alt in locales.iter() {
        alternates.push_str(&format!(
            "<link rel=\"alternate\" hreflang=\"{}\" href=\"{}\">",
            alt,
            escape_attr(&replace_first_segment(path, alt.as_str()))
        ));
    }
    alternates.push_str(&format!(
        "<link rel=\"alternate\" hreflang=\"x-default\" href=\"{}\">",
        escape_attr(&replace_first_segment(path, locales.default_locale().as_str()))
    ));

    let admin_attr = admin
        .map(|id| format!(" data-admin-id=\"{}\"", escape_attr(&id)))
        .unwrap_or_default();

    Html(format!(
        "<!doctype html><html lang=\"{lang}\"><head><meta charset=\"utf-8\">{alternates}</head>\
<body data-path=\"{path}\"{admin_attr}></body></html>",
        lang = locale,
        alternates = alternates,
        path = escape_attr(path),
        admin_attr = admin_attr,
    ))
    .into_response()
}
