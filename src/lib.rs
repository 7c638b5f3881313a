//! # Crane Site
//!
//! Web front for a tower crane sales and rental company: locale-prefixed catalog pages,
//! an admin area behind a session cookie, and a small JSON API.
//!
//! ## Architecture
//!
//! - **Axum**: HTTP server, routing and middleware
//! - **Tokio**: async runtime
//! - **config / dotenvy**: layered configuration
//! - **tracing**: structured logging
//!
//! ## Core Components
//!
//! - [`config`]: configuration loading and validation
//! - [`i18n`]: supported locales, `Accept-Language` parsing, locale path helpers
//! - [`session`]: the admin session token carried in a cookie
//! - [`cookies`]: cookie reading and `Set-Cookie` rendering
//! - [`routing`]: the ordered locale / admin-access decision pipeline
//! - [`middleware`]: axum adapters for routing and response hardening
//! - [`routes`]: API handlers, page shell and the assembled router
//! - [`error`]: JSON error responses
//! - [`metrics`]: routing and login counters
//! - [`state`]: shared application state

pub mod config;
pub mod cookies;
pub mod error;
pub mod i18n;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod routing;
pub mod session;
pub mod state;

#[cfg(test)]
mod tests;
