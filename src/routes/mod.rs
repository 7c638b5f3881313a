//! HTTP handlers and the application router.

pub mod admin;
pub mod health;
pub mod pages;

use std::path::Path;

use axum::middleware::from_fn_with_state;
use axum::{
    routing::{get, get_service, post},
    Router,
};
use tower_http::services::{ServeDir, ServeFile};

use crate::middleware::{locale_router_middleware, security_headers::security_headers_middleware};
use crate::state::AppState;

/// Builds the full router: API, static files, locale-prefixed pages, plus the locale and
/// security-header middleware. Transport layers (tracing, compression, CORS) are added by
/// the binary.
pub fn app(state: AppState) -> Router {
    let cfg = state.config.clone();
    let public_root = Path::new(&cfg.server.public_dir);

    let api = Router::new()
        .route("/healthz", get(health::healthz))
        .route("/version", get(health::version))
        .route("/metrics", get(health::metrics))
        .route("/admin/login", post(admin::login))
        .route("/admin/logout", post(admin::logout))
        .route("/admin/session", get(admin::session));

    let mut router = Router::new().nest(&cfg.routing.api_prefix, api);

    // Static routes are more specific than `/{locale}`, so `/favicon.ico` never reaches pages.
    for file in &cfg.routing.public_files {
        let on_disk = public_root.join(file.trim_start_matches('/'));
        router = router.route(file, get_service(ServeFile::new(on_disk)));
    }
    for dir in cfg.routing.public_dirs.iter().chain(cfg.routing.internal_markers.iter()) {
        let mount = dir.trim_end_matches('/');
        if !mount.starts_with('/') || mount.is_empty() {
            continue;
        }
        let on_disk = public_root.join(mount.trim_start_matches('/'));
        router = router.nest_service(mount, ServeDir::new(on_disk));
    }

    router
        .route("/{locale}", get(pages::render))
        .route("/{locale}/{*rest}", get(pages::render))
        .with_state(state.clone())
        .layer(from_fn_with_state(state, locale_router_middleware))
        .layer(from_fn_with_state(cfg, security_headers_middleware))
}
