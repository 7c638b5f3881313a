//! Crate-level tests.
//!
//! - **router_tests**: the locale / admin-access decision pipeline in isolation
//! - **api_tests**: the assembled axum app, driven with `tower::ServiceExt::oneshot`
//! - **config_tests**: configuration loading, layering and validation
//! - **error_tests**: JSON error responses and field validation

pub mod api_tests;
