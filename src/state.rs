use std::sync::Arc;

use crate::config::AppConfig;
use crate::metrics::Metrics;
use crate::routing::{LocaleRouter, RouterConfig};

/// The shared application state.
///
/// Cheap to clone; everything inside is either immutable after startup or atomic.
#[derive(Clone)]
pub struct AppState {
    /// The application configuration.
    pub config: Arc<AppConfig>,
    /// Locale and admin-access router, built once from `config`.
    pub router: Arc<LocaleRouter>,
    /// Routing and login counters.
    pub metrics: Metrics,
}

impl AppState {
    /// Builds the router from `config` and wraps everything for sharing.
    ///
    /// Fails when the locale settings are inconsistent (e.g. a default locale that is not
    /// in the supported list).
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        let router = LocaleRouter::new(RouterConfig::from_app_config(&config)?);
        Ok(Self { config: Arc::new(config), router: Arc::new(router), metrics: Metrics::new() })
    }
}
