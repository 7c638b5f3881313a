#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        Router,
    };
    use http_body_util::BodyExt; // for .collect()
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::AppConfig;
    use crate::routes;
    use crate::session::AdminSession;
    use crate::state::AppState;

    fn setup_test_app() -> (Router, AppState) {
        let state = AppState::new(AppConfig::default()).unwrap();
        (routes::app(state.clone()), state)
    }

    fn get(uri: &str) -> axum::http::request::Builder {
        Request::builder().method("GET").uri(uri)
    }

    fn set_cookies(res: &axum::response::Response) -> Vec<String> {
        res.headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect()
    }

    fn location(res: &axum::response::Response) -> &str {
        res.headers().get(header::LOCATION).unwrap().to_str().unwrap()
    }

    async fn body_string(res: axum::response::Response) -> String {
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    async fn login(app: Router, username: &str, password: &str) -> axum::response::Response {
        app.oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/admin/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({ "username": username, "password": password }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_root_redirects_by_accept_language() {
        let (app, _) = setup_test_app();
        let res = app
            .oneshot(get("/").header(header::ACCEPT_LANGUAGE, "de-DE,en;q=0.9").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(location(&res), "/de");
        let cookies = set_cookies(&res);
        assert_eq!(cookies.len(), 1);
        assert!(cookies[0].starts_with("NEXT_LOCALE=de"));
        assert!(cookies[0].contains("Max-Age=2592000"));
    }

    #[tokio::test]
    async fn test_cookie_locale_overrides_url() {
        let (app, _) = setup_test_app();
        let res = app
            .oneshot(get("/de/cranes?type=flat-top").header(header::COOKIE, "NEXT_LOCALE=ru").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(location(&res), "/ru/cranes?type=flat-top");
        assert!(set_cookies(&res).is_empty());
    }

    #[tokio::test]
    async fn test_localized_page_renders_and_refreshes_cookie() {
        let (app, _) = setup_test_app();
        let res = app.oneshot(get("/en/cranes").body(Body::empty()).unwrap()).await.unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        let cookies = set_cookies(&res);
        assert!(cookies.iter().any(|c| c.starts_with("NEXT_LOCALE=en")));
        assert_eq!(res.headers().get(header::CACHE_CONTROL).unwrap(), "no-store");
        assert_eq!(res.headers().get("x-content-type-options").unwrap(), "nosniff");

        let body = body_string(res).await;
        assert!(body.contains("<html lang=\"en\">"));
        assert!(body.contains("hreflang=\"de\" href=\"/de/cranes\""));
        assert!(body.contains("hreflang=\"x-default\" href=\"/en/cranes\""));
        assert!(!body.contains("data-admin-id"));
    }

    #[tokio::test]
    async fn test_admin_requires_session() {
        let (app, _) = setup_test_app();
        let res = app
            .oneshot(get("/en/admin/dashboard").header(header::COOKIE, "NEXT_LOCALE=en").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(location(&res), "/en/admin/login");
    }

    #[tokio::test]
    async fn test_admin_requires_session_on_unnormalized_paths() {
        let (app, _) = setup_test_app();
        for path in ["/en//admin/dashboard", "/en/./admin/dashboard"] {
            let res = app
                .clone()
                .oneshot(get(path).header(header::COOKIE, "NEXT_LOCALE=en").body(Body::empty()).unwrap())
                .await
                .unwrap();

            assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT, "{}", path);
            assert_eq!(location(&res), "/en/admin/login");
        }
    }

    #[tokio::test]
    async fn test_expired_admin_session_is_cleared() {
        let (app, _) = setup_test_app();
        let expired = AdminSession { admin_id: "admin".into(), exp: 1_000 }.encode();
        let res = app
            .oneshot(
                get("/en/admin/dashboard")
                    .header(header::COOKIE, format!("NEXT_LOCALE=en; admin-session={}", expired))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(location(&res), "/en/admin/login");
        let cookies = set_cookies(&res);
        assert!(cookies.iter().any(|c| c.starts_with("admin-session=;") && c.contains("Max-Age=0")));
    }

    #[tokio::test]
    async fn test_login_page_passes_without_session() {
        let (app, _) = setup_test_app();
        let res = app
            .oneshot(get("/en/admin/login").header(header::COOKIE, "NEXT_LOCALE=en").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_login_session_roundtrip() {
        let (app, state) = setup_test_app();

        let res = login(app.clone(), "admin", "change-me").await;
        assert_eq!(res.status(), StatusCode::OK);
        let cookies = set_cookies(&res);
        let session_cookie = cookies
            .iter()
            .find(|c| c.starts_with("admin-session="))
            .expect("login sets the session cookie");
        assert!(session_cookie.contains("HttpOnly"));
        assert!(session_cookie.contains("Max-Age=86400"));
        let pair = session_cookie.split(';').next().unwrap().to_string();

        let body: Value = serde_json::from_str(&body_string(res).await).unwrap();
        assert_eq!(body["adminId"], "admin");
        assert!(body["exp"].as_i64().unwrap() > chrono::Utc::now().timestamp_millis());

        let res = app
            .clone()
            .oneshot(
                get("/en/admin/dashboard")
                    .header(header::COOKIE, format!("NEXT_LOCALE=en; {}", pair))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert!(body_string(res).await.contains("data-admin-id=\"admin\""));

        let res = app
            .oneshot(get("/api/admin/session").header(header::COOKIE, pair).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        assert_eq!(state.metrics.get_snapshot().logins_succeeded, 1);
    }

    #[tokio::test]
    async fn test_login_rejects_bad_credentials() {
        let (app, state) = setup_test_app();
        let res = login(app, "admin", "wrong").await;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert!(set_cookies(&res).is_empty());
        let body: Value = serde_json::from_str(&body_string(res).await).unwrap();
        assert_eq!(body["error"]["code"], "UNAUTHORIZED");
        assert_eq!(body["status"], 401);
        assert_eq!(state.metrics.get_snapshot().logins_failed, 1);
    }

    #[tokio::test]
    async fn test_login_validates_payload() {
        let (app, _) = setup_test_app();

        let res = login(app.clone(), "", "change-me").await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = serde_json::from_str(&body_string(res).await).unwrap();
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(body["error"]["details"]["field"], "username");

        let res = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/admin/login")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_session_endpoint_without_cookie() {
        let (app, _) = setup_test_app();
        let res = app.oneshot(get("/api/admin/session").body(Body::empty()).unwrap()).await.unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_logout_clears_cookie() {
        let (app, _) = setup_test_app();
        let res = app
            .oneshot(Request::builder().method("POST").uri("/api/admin/logout").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let cookies = set_cookies(&res);
        assert!(cookies.iter().any(|c| c.starts_with("admin-session=;") && c.contains("Max-Age=0")));
    }

    #[tokio::test]
    async fn test_api_and_static_paths_bypass_router() {
        let (app, _) = setup_test_app();

        let res = app
            .clone()
            .oneshot(get("/api/healthz").header(header::COOKIE, "NEXT_LOCALE=de").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert!(set_cookies(&res).is_empty());
        assert_eq!(body_string(res).await, "ok");

        let res = app.clone().oneshot(get("/robots.txt").body(Body::empty()).unwrap()).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert!(body_string(res).await.contains("Sitemap"));

        for path in ["/favicon.ico", "/images/missing.png"] {
            let res = app.clone().oneshot(get(path).body(Body::empty()).unwrap()).await.unwrap();
            assert_ne!(res.status(), StatusCode::TEMPORARY_REDIRECT, "{} must not be localized", path);
            assert!(set_cookies(&res).is_empty());
        }
    }

    #[tokio::test]
    async fn test_metrics_count_decisions() {
        let (app, _) = setup_test_app();
        let _ = app.clone().oneshot(get("/").body(Body::empty()).unwrap()).await.unwrap();
        let _ = app.clone().oneshot(get("/en/admin").body(Body::empty()).unwrap()).await.unwrap();

        let res = app.oneshot(get("/api/metrics").body(Body::empty()).unwrap()).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = serde_json::from_str(&body_string(res).await).unwrap();
        assert_eq!(body["locale_redirects"], 1);
        assert_eq!(body["admin_denied"], 1);
        // The metrics request itself is an API bypass.
        assert_eq!(body["bypassed"], 1);
    }

    #[tokio::test]
    async fn test_version_lists_locales() {
        let (app, _) = setup_test_app();
        let res = app.oneshot(get("/api/version").body(Body::empty()).unwrap()).await.unwrap();
        let body: Value = serde_json::from_str(&body_string(res).await).unwrap();
        assert_eq!(body["name"], "crane-site");
        assert_eq!(body["locales"], json!(["en", "de", "ru"]));
        assert_eq!(body["default_locale"], "en");
    }
}
