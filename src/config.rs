use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory holding favicons, images, fonts and other public files.
    pub public_dir: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct I18nConfig {
    pub locales: Vec<String>,
    pub default_locale: String,
    pub cookie_name: String,
    pub cookie_max_age_days: i64,
    /// Replace an unsupported but locale-shaped first segment (`/fr/...`) instead of
    /// prefixing the resolved locale in front of it.
    pub rewrite_unknown_locale_segment: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RoutingConfig {
    pub api_prefix: String,
    pub public_files: Vec<String>,
    pub public_dirs: Vec<String>,
    pub internal_markers: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdminConfig {
    pub area_prefix: String,
    pub login_path: String,
    pub session_cookie: String,
    pub session_ttl_hours: i64,
    pub username: String,
    pub password: String,
    pub secure_cookies: bool,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct SecurityConfig {
    pub enable_hsts: Option<bool>,
    pub hsts_max_age: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub i18n: I18nConfig,
    pub routing: RoutingConfig,
    pub admin: AdminConfig,
    pub security: Option<SecurityConfig>,
}

/// Ten years. Larger values overflow the cookie `Max-Age` arithmetic.
const MAX_LOCALE_COOKIE_DAYS: i64 = 3650;
/// One year.
const MAX_SESSION_TTL_HOURS: i64 = 8760;

const DEFAULTS: &str = include_str!("../config/default.toml");

impl Default for AppConfig {
    fn default() -> Self {
        // Fallback: parse the embedded default TOML
        match ::config::Config::builder()
            .add_source(::config::File::from_str(DEFAULTS, ::config::FileFormat::Toml))
            .build()
        {
            Ok(cfg) => match cfg.try_deserialize() {
                Ok(app_cfg) => app_cfg,
                Err(e) => {
                    eprintln!("FATAL: Failed to deserialize default config: {}", e);
                    panic!("Failed to deserialize default config: {}", e);
                }
            },
            Err(e) => {
                eprintln!("FATAL: Failed to parse default config: {}", e);
                panic!("Failed to parse default config: {}", e);
            }
        }
    }
}

pub fn load() -> anyhow::Result<AppConfig> {
    // Load .env first (optional)
    let _ = dotenvy::dotenv();

    let mut builder = ::config::Config::builder()
        .add_source(::config::File::from_str(DEFAULTS, ::config::FileFormat::Toml))
        // Optional local file: crane_site.toml (in CWD)
        .add_source(::config::File::with_name("crane_site").required(false));

    if let Ok(custom_path) = std::env::var("CRANE_SITE_CONFIG") {
        builder = builder.add_source(::config::File::with_name(&custom_path).required(false));
    }
    // Environment variables last to have highest precedence
    builder = builder.add_source(
        ::config::Environment::with_prefix("CRANE_SITE")
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("i18n.locales")
            .with_list_parse_key("routing.public_files")
            .with_list_parse_key("routing.public_dirs")
            .with_list_parse_key("routing.internal_markers"),
    );

    let cfg = builder.build()?;
    let app_cfg: AppConfig = cfg.try_deserialize()?;
    validate(&app_cfg)?;
    Ok(app_cfg)
}

pub fn validate(cfg: &AppConfig) -> anyhow::Result<()> {
    // Server
    if cfg.server.port == 0 {
        return Err(anyhow::anyhow!("invalid server.port: {}", cfg.server.port));
    }
    #[cfg(unix)]
    if cfg.server.port < 1024 {
        tracing::warn!("Using privileged port {} - may require elevated permissions", cfg.server.port);
    }

    // I18n
    if cfg.i18n.locales.is_empty() {
        return Err(anyhow::anyhow!("i18n.locales must not be empty"));
    }
    for locale in &cfg.i18n.locales {
        if !crate::i18n::looks_like_locale_tag(locale) {
            return Err(anyhow::anyhow!("i18n.locales contains an invalid tag: {:?}", locale));
        }
    }
    let default_supported = cfg
        .i18n
        .locales
        .iter()
        .any(|l| l.eq_ignore_ascii_case(&cfg.i18n.default_locale));
    if !default_supported {
        return Err(anyhow::anyhow!(
            "i18n.default_locale {:?} is not in i18n.locales",
            cfg.i18n.default_locale
        ));
    }
    if cfg.i18n.cookie_name.trim().is_empty() {
        return Err(anyhow::anyhow!("i18n.cookie_name must not be empty"));
    }
    if !(1..=MAX_LOCALE_COOKIE_DAYS).contains(&cfg.i18n.cookie_max_age_days) {
        return Err(anyhow::anyhow!(
            "i18n.cookie_max_age_days must be between 1 and {}",
            MAX_LOCALE_COOKIE_DAYS
        ));
    }

    // Routing
    for (key, value) in [("routing.api_prefix", &cfg.routing.api_prefix)]
        .into_iter()
        .chain(cfg.routing.public_dirs.iter().map(|d| ("routing.public_dirs", d)))
        .chain(cfg.routing.public_files.iter().map(|f| ("routing.public_files", f)))
    {
        if !value.starts_with('/') {
            return Err(anyhow::anyhow!("{} entries must start with '/': {:?}", key, value));
        }
    }

    if cfg.routing.api_prefix.len() < 2 {
        return Err(anyhow::anyhow!("routing.api_prefix must be a non-root path"));
    }
    if cfg.routing.public_dirs.iter().any(|d| d.trim_end_matches('/').is_empty()) {
        return Err(anyhow::anyhow!("routing.public_dirs must not contain the root path"));
    }

    // Admin
    if !cfg.admin.area_prefix.starts_with('/') || cfg.admin.area_prefix.len() < 2 {
        return Err(anyhow::anyhow!("admin.area_prefix must be a non-root path"));
    }
    if !crate::i18n::path_has_prefix(&cfg.admin.login_path, &cfg.admin.area_prefix) {
        return Err(anyhow::anyhow!("admin.login_path must start with admin.area_prefix"));
    }
    if cfg.admin.session_cookie.trim().is_empty() {
        return Err(anyhow::anyhow!("admin.session_cookie must not be empty"));
    }
    if !(1..=MAX_SESSION_TTL_HOURS).contains(&cfg.admin.session_ttl_hours) {
        return Err(anyhow::anyhow!(
            "admin.session_ttl_hours must be between 1 and {}",
            MAX_SESSION_TTL_HOURS
        ));
    }
    if cfg.admin.password == "change-me" {
        tracing::warn!("admin.password is still the shipped default - set CRANE_SITE__ADMIN__PASSWORD");
    }

    Ok(())
}
