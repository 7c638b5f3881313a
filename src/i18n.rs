//! Supported locales and the path/header helpers the router builds on.
//!
//! A [`Locale`] can only be obtained from a [`LocaleSet`], so any value of that type is
//! guaranteed to be one of the configured languages.

use std::fmt;
use std::sync::Arc;

use crate::config::I18nConfig;

/// A supported display language, e.g. `en`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locale(Arc<str>);

impl Locale {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The fixed, ordered set of supported locales plus the fallback.
#[derive(Debug, Clone)]
pub struct LocaleSet {
    locales: Vec<Locale>,
    default: Locale,
}

impl LocaleSet {
    /// Builds a set from raw tags. The default must be one of `locales`; tags are
    /// normalized to lowercase.
    pub fn new<I, S>(locales: I, default: &str) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out: Vec<Locale> = Vec::new();
        for tag in locales {
            let tag = tag.as_ref().trim().to_ascii_lowercase();
            if tag.is_empty() {
                continue;
            }
            if !out.iter().any(|l| l.as_str() == tag) {
                out.push(Locale(Arc::from(tag)));
            }
        }
        let default = default.trim().to_ascii_lowercase();
        let default = out
            .iter()
            .find(|l| l.as_str() == default)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("default locale {:?} is not supported", default))?;
        Ok(Self { locales: out, default })
    }

    pub fn from_config(cfg: &I18nConfig) -> anyhow::Result<Self> {
        Self::new(&cfg.locales, &cfg.default_locale)
    }

    /// Looks up a supported locale, ignoring ASCII case.
    pub fn get(&self, tag: &str) -> Option<Locale> {
        self.locales.iter().find(|l| l.as_str().eq_ignore_ascii_case(tag)).cloned()
    }

    /// Exact-case lookup, used for URL segments so `/DE/...` is not treated as canonical.
    pub fn get_exact(&self, tag: &str) -> Option<Locale> {
        self.locales.iter().find(|l| l.as_str() == tag).cloned()
    }

    pub fn default_locale(&self) -> &Locale {
        &self.default
    }

    pub fn iter(&self) -> impl Iterator<Item = &Locale> {
        self.locales.iter()
    }

    /// Derives a locale from an `Accept-Language` header.
    ///
    /// Only the first comma-separated entry is considered, and only its primary subtag.
    /// Anything missing or unsupported falls back to the default locale.
    pub fn from_accept_language(&self, header: Option<&str>) -> Locale {
        header
            .and_then(primary_language)
            .and_then(|tag| self.get(tag))
            .unwrap_or_else(|| self.default.clone())
    }
}

/// `"de-DE,en;q=0.9"` -> `Some("de")`.
pub fn primary_language(header: &str) -> Option<&str> {
    let first = header.split(',').next()?;
    let first = first.split(';').next()?.trim();
    let primary = first.split('-').next()?.trim();
    if primary.is_empty() || primary == "*" {
        None
    } else {
        Some(primary)
    }
}

/// First non-empty path segment: `"/en/admin"` -> `Some("en")`, `"/"` -> `None`.
pub fn first_segment(path: &str) -> Option<&str> {
    path.trim_start_matches('/').split('/').next().filter(|s| !s.is_empty())
}

/// `"/de/foo"` with `"en"` -> `"/en/foo"`.
pub fn replace_first_segment(path: &str, replacement: &str) -> String {
    let trimmed = path.trim_start_matches('/');
    match trimmed.find('/') {
        Some(idx) => format!("/{}{}", replacement, &trimmed[idx..]),
        None => format!("/{}", replacement),
    }
}

/// `"/"` -> `"/en"`, `"/cranes"` -> `"/en/cranes"`.
pub fn prefix_path(path: &str, locale: &str) -> String {
    if path.is_empty() || path == "/" {
        format!("/{}", locale)
    } else if path.starts_with('/') {
        format!("/{}{}", locale, path)
    } else {
        format!("/{}/{}", locale, path)
    }
}

/// Removes the first segment: `"/en/admin/login"` -> `"/admin/login"`, `"/en"` -> `"/"`.
pub fn strip_locale_prefix(path: &str) -> &str {
    let trimmed = path.trim_start_matches('/');
    match trimmed.find('/') {
        Some(idx) => &trimmed[idx..],
        None => "/",
    }
}

/// Collapses empty, `.` and `..` segments: `"//admin/./x/../y/"` -> `"/admin/y"`.
///
/// `..` never climbs above the root.
pub fn normalize_path(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for seg in path.split('/') {
        match seg {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    format!("/{}", segments.join("/"))
}

/// True when `path` equals `prefix` or continues it with a `/`.
pub fn path_has_prefix(path: &str, prefix: &str) -> bool {
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        return path.starts_with('/');
    }
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

/// Matches two-letter language tags such as `fr` or `pt-br`.
pub fn looks_like_locale_tag(segment: &str) -> bool {
    let mut parts = segment.splitn(2, '-');
    let primary = parts.next().unwrap_or("");
    let primary_ok = primary.len() == 2 && primary.bytes().all(|b| b.is_ascii_alphabetic());
    let region_ok = match parts.next() {
        None => true,
        Some(region) => (2..=4).contains(&region.len()) && region.bytes().all(|b| b.is_ascii_alphanumeric()),
    };
    primary_ok && region_ok
}
