use crate::i18n::{
    first_segment, looks_like_locale_tag, normalize_path, path_has_prefix, prefix_path,
    replace_first_segment, strip_locale_prefix, Locale,
};
use crate::session::AdminSession;

use super::{CookieAction, Decision, Outcome, RedirectReason, RouteContext, RouteRule};

/// Lets everything under the API prefix through untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiBypass;

impl RouteRule for ApiBypass {
    fn name(&self) -> &'static str {
        "api-bypass"
    }

    fn apply(&self, ctx: &mut RouteContext<'_>) -> Outcome {
        if path_has_prefix(ctx.path(), &ctx.config.api_prefix) {
            Outcome::Done(Decision::Bypass)
        } else {
            Outcome::Continue
        }
    }
}

/// Lets the static allow-list through untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct PublicFileBypass;

impl RouteRule for PublicFileBypass {
    fn name(&self) -> &'static str {
        "public-file-bypass"
    }

    fn apply(&self, ctx: &mut RouteContext<'_>) -> Outcome {
        if ctx.config.public.matches(ctx.path()) {
            Outcome::Done(Decision::Bypass)
        } else {
            Outcome::Continue
        }
    }
}

/// Picks the effective locale and makes sure the URL carries it.
///
/// A supported locale cookie always wins: a conflicting URL locale is swapped out and a
/// missing one is added. Without a cookie the URL locale is accepted as-is (and written
/// back to the cookie); failing that the first `Accept-Language` tag or the default is
/// used for the redirect and stored in the cookie.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocaleResolution;

impl LocaleResolution {
    /// Builds the redirect target for a path without a supported locale segment.
    fn localize(ctx: &RouteContext<'_>, locale: &Locale) -> String {
        let path = ctx.path();
        match first_segment(path) {
            Some(seg) if ctx.config.rewrite_unknown_locale_segment && looks_like_locale_tag(seg) => {
                replace_first_segment(path, locale.as_str())
            }
            _ => prefix_path(path, locale.as_str()),
        }
    }
}

impl RouteRule for LocaleResolution {
    fn name(&self) -> &'static str {
        "locale-resolution"
    }

    fn apply(&self, ctx: &mut RouteContext<'_>) -> Outcome {
        let (config, request) = (ctx.config, ctx.request);
        let locales = &config.locales;
        let path = ctx.path();
        let url_locale = first_segment(path).and_then(|seg| locales.get_exact(seg));
        let preferred = request.locale_cookie.as_deref().and_then(|v| locales.get(v.trim()));

        match (preferred, url_locale) {
            (Some(pref), Some(url)) if pref == url => {
                ctx.locale = Some(url);
                Outcome::Continue
            }
            (Some(pref), Some(_)) => {
                let target = replace_first_segment(path, pref.as_str());
                ctx.redirect(target, RedirectReason::LocaleMismatch)
            }
            (Some(pref), None) => {
                let target = Self::localize(ctx, &pref);
                ctx.redirect(target, RedirectReason::MissingLocale)
            }
            (None, Some(url)) => {
                ctx.cookies.push(CookieAction::SetLocale(url.clone()));
                ctx.locale = Some(url);
                Outcome::Continue
            }
            (None, None) => {
                // `/DE/x` keeps its language; anything else falls back to the header.
                let candidate = first_segment(path)
                    .filter(|_| config.rewrite_unknown_locale_segment)
                    .and_then(|seg| locales.get(seg))
                    .unwrap_or_else(|| locales.from_accept_language(request.accept_language.as_deref()));
                let target = Self::localize(ctx, &candidate);
                ctx.cookies.push(CookieAction::SetLocale(candidate));
                ctx.redirect(target, RedirectReason::MissingLocale)
            }
        }
    }
}

/// Requires a live admin session for everything in the admin area except the login page.
///
/// A session cookie that fails to decode or has expired is treated exactly like a missing
/// one, except that the response also clears it.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdminGate;

impl AdminGate {
    fn is_login_path(rest: &str, login: &str) -> bool {
        let rest = rest.trim_end_matches('/');
        let login = login.trim_end_matches('/');
        rest == login
    }
}

impl RouteRule for AdminGate {
    fn name(&self) -> &'static str {
        "admin-gate"
    }

    fn apply(&self, ctx: &mut RouteContext<'_>) -> Outcome {
        let Some(locale) = ctx.locale.clone() else {
            return Outcome::Continue;
        };
        // Requests reach the router unnormalized, so `/en//admin` must not slip past.
        let rest = normalize_path(strip_locale_prefix(ctx.path()));
        if !path_has_prefix(&rest, &ctx.config.admin_prefix) {
            return Outcome::Continue;
        }
        if Self::is_login_path(&rest, &ctx.config.admin_login_path) {
            return Outcome::Continue;
        }

        let login = prefix_path(&ctx.config.admin_login_path, locale.as_str());
        let request = ctx.request;
        let Some(raw) = request.session_cookie.as_deref() else {
            tracing::info!(path = %ctx.path(), "admin area requested without session");
            return ctx.redirect(login, RedirectReason::AdminLogin);
        };

        match AdminSession::validate(raw, ctx.now_ms) {
            Ok(session) => {
                ctx.admin = Some(session);
                Outcome::Continue
            }
            Err(e) => {
                tracing::info!(path = %ctx.path(), error = %e, "rejecting admin session");
                ctx.cookies.push(CookieAction::ClearSession);
                ctx.redirect(login, RedirectReason::AdminLogin)
            }
        }
    }
}
