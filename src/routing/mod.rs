//! Locale and admin-access routing for every inbound page request.
//!
//! The router is a short, ordered pipeline of [`RouteRule`]s evaluated against a
//! [`RouteRequest`]. The first rule that reaches a verdict ends evaluation; if every rule
//! lets the request continue, it is forwarded with whatever locale and cookie updates the
//! rules accumulated on the way.
//!
//! Default order (see [`LocaleRouter::rule_names`]):
//!
//! 1. `api-bypass` - API routes pass untouched
//! 2. `public-file-bypass` - favicons, robots, images, fonts, build assets pass untouched
//! 3. `locale-resolution` - cookie / URL / `Accept-Language` negotiation, may redirect
//! 4. `admin-gate` - session check for the admin area, may redirect to login
//!
//! Routing is a pure function of the request and the supplied clock value; it performs no
//! I/O and holds no state between requests.

pub mod public;
pub mod rules;

use std::fmt;

use axum::http::{HeaderMap, Uri};

use crate::config::AppConfig;
use crate::cookies;
use crate::i18n::{Locale, LocaleSet};
use crate::session::AdminSession;

pub use public::PublicPaths;
pub use rules::{AdminGate, ApiBypass, LocaleResolution, PublicFileBypass};

/// Immutable routing configuration, built once at startup.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    pub locales: LocaleSet,
    pub locale_cookie: String,
    pub locale_cookie_max_age_days: i64,
    pub rewrite_unknown_locale_segment: bool,
    pub api_prefix: String,
    pub public: PublicPaths,
    pub admin_prefix: String,
    pub admin_login_path: String,
    pub session_cookie: String,
}

impl RouterConfig {
    pub fn from_app_config(cfg: &AppConfig) -> anyhow::Result<Self> {
        Ok(Self {
            locales: LocaleSet::from_config(&cfg.i18n)?,
            locale_cookie: cfg.i18n.cookie_name.clone(),
            locale_cookie_max_age_days: cfg.i18n.cookie_max_age_days,
            rewrite_unknown_locale_segment: cfg.i18n.rewrite_unknown_locale_segment,
            api_prefix: cfg.routing.api_prefix.clone(),
            public: PublicPaths::from_config(&cfg.routing),
            admin_prefix: cfg.admin.area_prefix.clone(),
            admin_login_path: cfg.admin.login_path.clone(),
            session_cookie: cfg.admin.session_cookie.clone(),
        })
    }
}

/// The parts of an HTTP request the router looks at.
#[derive(Debug, Clone, Default)]
pub struct RouteRequest {
    pub path: String,
    pub query: Option<String>,
    pub locale_cookie: Option<String>,
    pub session_cookie: Option<String>,
    pub accept_language: Option<String>,
}

impl RouteRequest {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into(), ..Default::default() }
    }

    pub fn from_http(uri: &Uri, headers: &HeaderMap, cfg: &RouterConfig) -> Self {
        Self {
            path: uri.path().to_string(),
            query: uri.query().filter(|q| !q.is_empty()).map(str::to_string),
            locale_cookie: cookies::read(headers, &cfg.locale_cookie),
            session_cookie: cookies::read(headers, &cfg.session_cookie),
            accept_language: headers
                .get(axum::http::header::ACCEPT_LANGUAGE)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
        }
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn with_locale_cookie(mut self, value: impl Into<String>) -> Self {
        self.locale_cookie = Some(value.into());
        self
    }

    pub fn with_session_cookie(mut self, value: impl Into<String>) -> Self {
        self.session_cookie = Some(value.into());
        self
    }

    pub fn with_accept_language(mut self, value: impl Into<String>) -> Self {
        self.accept_language = Some(value.into());
        self
    }
}

/// Cookie writes attached to the response that is actually returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CookieAction {
    SetLocale(Locale),
    ClearSession,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectReason {
    /// Locale cookie disagrees with the URL's locale segment.
    LocaleMismatch,
    /// URL has no supported locale segment.
    MissingLocale,
    /// Admin area requested without a usable session.
    AdminLogin,
}

impl RedirectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RedirectReason::LocaleMismatch => "locale_mismatch",
            RedirectReason::MissingLocale => "missing_locale",
            RedirectReason::AdminLogin => "admin_login",
        }
    }
}

/// Terminal action for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Hand the request on unchanged (API routes, static files).
    Bypass,
    Redirect { location: String, reason: RedirectReason, cookies: Vec<CookieAction> },
    /// Hand the request on with a resolved locale and optional cookie refresh.
    Forward { locale: Locale, admin: Option<AdminSession>, cookies: Vec<CookieAction> },
}

/// Per-request scratch state threaded through the rules.
#[derive(Debug)]
pub struct RouteContext<'a> {
    pub config: &'a RouterConfig,
    pub request: &'a RouteRequest,
    pub now_ms: i64,
    pub locale: Option<Locale>,
    pub admin: Option<AdminSession>,
    pub cookies: Vec<CookieAction>,
}

impl<'a> RouteContext<'a> {
    pub fn new(config: &'a RouterConfig, request: &'a RouteRequest, now_ms: i64) -> Self {
        Self { config, request, now_ms, locale: None, admin: None, cookies: Vec::new() }
    }

    pub fn path(&self) -> &'a str {
        &self.request.path
    }

    /// Ends evaluation with a redirect to `path`, keeping the original query string.
    pub fn redirect(&mut self, path: String, reason: RedirectReason) -> Outcome {
        let location = match self.request.query.as_deref() {
            Some(q) => format!("{}?{}", path, q),
            None => path,
        };
        Outcome::Done(Decision::Redirect { location, reason, cookies: std::mem::take(&mut self.cookies) })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Done(Decision),
}

/// One step of the routing pipeline.
pub trait RouteRule: fmt::Debug + Send + Sync {
    fn name(&self) -> &'static str;
    fn apply(&self, ctx: &mut RouteContext<'_>) -> Outcome;
}

#[derive(Debug)]
pub struct LocaleRouter {
    config: RouterConfig,
    rules: Vec<Box<dyn RouteRule>>,
}

impl LocaleRouter {
    pub fn new(config: RouterConfig) -> Self {
        Self::with_rules(
            config,
            vec![
                Box::new(ApiBypass),
                Box::new(PublicFileBypass),
                Box::new(LocaleResolution),
                Box::new(AdminGate),
            ],
        )
    }

    pub fn with_rules(config: RouterConfig, rules: Vec<Box<dyn RouteRule>>) -> Self {
        Self { config, rules }
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    pub fn route(&self, request: &RouteRequest, now_ms: i64) -> Decision {
        let mut ctx = RouteContext::new(&self.config, request, now_ms);
        for rule in &self.rules {
            if let Outcome::Done(decision) = rule.apply(&mut ctx) {
                tracing::debug!(rule = rule.name(), path = %request.path, ?decision, "routing decision");
                return decision;
            }
        }
        match ctx.locale {
            Some(locale) => Decision::Forward { locale, admin: ctx.admin, cookies: ctx.cookies },
            // Only reachable with a rule list that has no locale step.
            None => Decision::Bypass,
        }
    }
}
