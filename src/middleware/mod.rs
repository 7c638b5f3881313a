//! Middleware components for HTTP request processing.
//!
//! - [`locale`]: locale negotiation, locale-prefix redirects and the admin-area gate
//! - [`security_headers`]: baseline response hardening

pub mod locale;
pub mod security_headers;

pub use locale::locale_router_middleware;
