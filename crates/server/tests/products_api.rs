use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use configs::AppConfig;
use serde_json::{json, Value};
use service::auth::{AdminAuthConfig, AdminAuthService};
use service::catalog::{store::mock::UnavailableStore, CatalogService};
use tower::Service;
use uuid::Uuid;

use server::routes::auth::ServerState;
use server::startup;

struct TestApp {
    app: Router,
    data_dir: PathBuf,
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.data_dir);
    }
}

async fn build_app() -> anyhow::Result<TestApp> {
    let data_dir = std::env::temp_dir().join(format!("catalog_api_{}", Uuid::new_v4()));
    let mut cfg = AppConfig::default();
    cfg.storage.products_file = data_dir.join("products.json").to_string_lossy().into_owned();
    cfg.auth.jwt_secret = Some("test-secret".into());
    cfg.normalize_and_validate()?;

    let state = startup::build_state(&cfg).await?;
    Ok(TestApp { app: startup::build_app(state), data_dir })
}

fn json_request(method: &str, uri: &str, body: Value, token: Option<&str>) -> anyhow::Result<Request<Body>> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(t) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {t}"));
    }
    Ok(builder.body(Body::from(serde_json::to_vec(&body)?))?)
}

fn get(uri: &str) -> anyhow::Result<Request<Body>> {
    Ok(Request::builder().method("GET").uri(uri).body(Body::empty())?)
}

async fn body_json(resp: Response<Body>) -> anyhow::Result<Value> {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

async fn login_token(app: &Router) -> anyhow::Result<String> {
    let req = json_request("POST", "/api/auth/login", json!({"username": "admin", "password": "admin123"}), None)?;
    let resp = app.clone().call(req).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await?;
    Ok(body["token"].as_str().unwrap_or_default().to_string())
}

async fn list(app: &Router, uri: &str) -> anyhow::Result<Vec<Value>> {
    let resp = app.clone().call(get(uri)?).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await?;
    Ok(body.as_array().cloned().unwrap_or_default())
}

#[tokio::test]
async fn health_and_empty_listing() -> anyhow::Result<()> {
    let t = build_app().await?;
    let resp = t.app.clone().call(get("/health")?).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await?, json!({"status": "ok"}));

    assert!(list(&t.app, "/api/products").await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn login_sets_http_only_cookie() -> anyhow::Result<()> {
    let t = build_app().await?;
    let req = json_request("POST", "/api/auth/login", json!({"username": "admin", "password": "admin123"}), None)?;
    let resp = t.app.clone().call(req).await?;
    assert_eq!(resp.status(), StatusCode::OK);

    let cookie = resp
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(cookie.starts_with("adminAuth="), "{cookie}");
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("Path=/"));
    assert!(cookie.contains("Max-Age=86400"));

    let body = body_json(resp).await?;
    assert_eq!(body["message"], "Login successful");
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
    Ok(())
}

#[tokio::test]
async fn login_with_wrong_credentials_is_401() -> anyhow::Result<()> {
    let t = build_app().await?;
    for body in [
        json!({"username": "admin", "password": "wrong"}),
        json!({"username": "someone", "password": "admin123"}),
        json!({}),
    ] {
        let resp = t.app.clone().call(json_request("POST", "/api/auth/login", body, None)?).await?;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(resp).await?, json!({"error": "Invalid credentials"}));
    }
    Ok(())
}

#[tokio::test]
async fn add_requires_valid_credentials() -> anyhow::Result<()> {
    let t = build_app().await?;
    let payload = json!({"link": "https://amzn.to/3abc", "category": "Books"});

    let resp = t.app.clone().call(json_request("POST", "/api/products", payload.clone(), None)?).await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(resp).await?, json!({"error": "Unauthorized"}));

    // the legacy fixed token is no longer accepted
    let resp = t.app.clone().call(json_request("POST", "/api/products", payload.clone(), Some("admin_token_2024"))?).await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = Request::builder()
        .method("POST")
        .uri("/api/products")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, "Token abc")
        .body(Body::from(serde_json::to_vec(&payload)?))?;
    let resp = t.app.clone().call(req).await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    assert!(list(&t.app, "/api/products").await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn add_then_list_round_trip() -> anyhow::Result<()> {
    let t = build_app().await?;
    let token = login_token(&t.app).await?;

    let req = json_request("POST", "/api/products", json!({"link": "https://amzn.to/3abc", "category": "  Electronics "}), Some(&token))?;
    let resp = t.app.clone().call(req).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await?;
    assert_eq!(body["message"], "Product added successfully");
    let product = &body["product"];
    assert_eq!(product["link"], "https://amzn.to/3abc");
    assert_eq!(product["category"], "Electronics");
    assert!(product["id"].as_str().is_some_and(|id| !id.is_empty()));
    let created_at = product["createdAt"].as_str().unwrap_or_default();
    assert!(chrono::DateTime::parse_from_rfc3339(created_at).is_ok(), "{created_at}");

    let listed = list(&t.app, "/api/products").await?;
    assert_eq!(listed, vec![product.clone()]);

    // persisted as a pretty-printed array
    let raw = std::fs::read_to_string(t.data_dir.join("products.json"))?;
    assert!(raw.starts_with("[\n"));
    Ok(())
}

#[tokio::test]
async fn sequential_adds_keep_order_and_distinct_ids() -> anyhow::Result<()> {
    let t = build_app().await?;
    let token = login_token(&t.app).await?;
    for link in ["https://a.example/1", "https://a.example/2"] {
        let req = json_request("POST", "/api/products", json!({"link": link, "category": "Books"}), Some(&token))?;
        assert_eq!(t.app.clone().call(req).await?.status(), StatusCode::OK);
    }

    let listed = list(&t.app, "/api/products").await?;
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0]["link"], "https://a.example/1");
    assert_eq!(listed[1]["link"], "https://a.example/2");
    assert_ne!(listed[0]["id"], listed[1]["id"]);
    Ok(())
}

#[tokio::test]
async fn invalid_submissions_are_400_and_not_persisted() -> anyhow::Result<()> {
    let t = build_app().await?;
    let token = login_token(&t.app).await?;

    let cases = [
        (json!({"link": "", "category": "Books"}), "Missing required fields: link and category"),
        (json!({"link": "https://a.example", "category": "   "}), "Missing required fields: link and category"),
        (json!({"category": "Books"}), "Missing required fields: link and category"),
        (json!({"link": "not a url", "category": "Books"}), "Invalid URL format"),
    ];
    for (payload, expected) in cases {
        let resp = t.app.clone().call(json_request("POST", "/api/products", payload, Some(&token))?).await?;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await?, json!({"error": expected}));
    }

    let req = Request::builder()
        .method("POST")
        .uri("/api/products")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from("{not json"))?;
    let resp = t.app.clone().call(req).await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(resp).await?["error"].is_string());

    assert!(list(&t.app, "/api/products").await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn session_cookie_authorizes_without_header() -> anyhow::Result<()> {
    let t = build_app().await?;
    let token = login_token(&t.app).await?;

    let req = Request::builder()
        .method("POST")
        .uri("/api/products")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::COOKIE, format!("theme=dark; adminAuth={token}"))
        .body(Body::from(serde_json::to_vec(&json!({"link": "https://a.example", "category": "Books"}))?))?;
    let resp = t.app.clone().call(req).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn category_filter_is_exact() -> anyhow::Result<()> {
    let t = build_app().await?;
    let token = login_token(&t.app).await?;
    for (link, category) in [
        ("https://a.example/1", "Home & Kitchen"),
        ("https://a.example/2", "Books"),
        ("https://a.example/3", "books"),
        ("https://a.example/4", "Home & Kitchen"),
    ] {
        let req = json_request("POST", "/api/products", json!({"link": link, "category": category}), Some(&token))?;
        assert_eq!(t.app.clone().call(req).await?.status(), StatusCode::OK);
    }

    let kitchen = list(&t.app, "/api/products?category=Home%20%26%20Kitchen").await?;
    assert_eq!(kitchen.len(), 2);
    assert!(kitchen.iter().all(|p| p["category"] == "Home & Kitchen"));

    let books = list(&t.app, "/api/products?category=Books").await?;
    assert_eq!(books.len(), 1);
    assert_eq!(books[0]["link"], "https://a.example/2");

    assert_eq!(list(&t.app, "/api/products?category=").await?.len(), 4);
    assert!(list(&t.app, "/api/products?category=Toys").await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn categories_merge_predefined_and_stored() -> anyhow::Result<()> {
    let t = build_app().await?;
    let token = login_token(&t.app).await?;
    let req = json_request("POST", "/api/products", json!({"link": "https://a.example", "category": "Vinyl"}), Some(&token))?;
    assert_eq!(t.app.clone().call(req).await?.status(), StatusCode::OK);

    let cats = list(&t.app, "/api/categories").await?;
    assert!(cats.contains(&json!("Vinyl")));
    assert!(cats.contains(&json!("Fashion-Women")));
    assert_eq!(cats.first(), Some(&json!("Automotive")));
    Ok(())
}

#[tokio::test]
async fn delete_is_persisted() -> anyhow::Result<()> {
    let t = build_app().await?;
    let token = login_token(&t.app).await?;
    let req = json_request("POST", "/api/products", json!({"link": "https://a.example", "category": "Books"}), Some(&token))?;
    let created = body_json(t.app.clone().call(req).await?).await?;
    let id = created["product"]["id"].as_str().unwrap_or_default().to_string();

    let del = |token: Option<String>| -> anyhow::Result<Request<Body>> {
        let mut b = Request::builder().method("DELETE").uri(format!("/api/products/{id}"));
        if let Some(t) = token {
            b = b.header(header::AUTHORIZATION, format!("Bearer {t}"));
        }
        Ok(b.body(Body::empty())?)
    };

    let resp = t.app.clone().call(del(None)?).await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = t.app.clone().call(del(Some(token.clone()))?).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await?["id"], json!(id));
    assert!(list(&t.app, "/api/products").await?.is_empty());

    let resp = t.app.clone().call(del(Some(token))?).await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(resp).await?, json!({"error": "Product not found"}));
    Ok(())
}

#[tokio::test]
async fn logout_clears_cookie() -> anyhow::Result<()> {
    let t = build_app().await?;
    let req = Request::builder().method("POST").uri("/api/auth/logout").body(Body::empty())?;
    let resp = t.app.clone().call(req).await?;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    let cookie = resp
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(cookie.starts_with("adminAuth="), "{cookie}");
    assert!(cookie.contains("Max-Age=0"), "{cookie}");
    Ok(())
}

#[tokio::test]
async fn storage_failure_is_500() -> anyhow::Result<()> {
    let auth = AdminAuthService::new(AdminAuthConfig {
        username: "admin".into(),
        password_hash: None,
        password: Some("admin123".into()),
        jwt_secret: "test-secret".into(),
        session_ttl: chrono::Duration::hours(24),
    })?;
    let token = auth.issue_at(chrono::Utc::now())?.token;
    let state = ServerState {
        catalog: Arc::new(CatalogService::new(Arc::new(UnavailableStore))),
        auth: Arc::new(auth),
        cookie_name: "adminAuth".into(),
    };
    let app = startup::build_app(state);

    let resp = app.clone().call(get("/api/products")?).await?;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(resp).await?, json!({"error": "Failed to read products"}));

    let req = json_request("POST", "/api/products", json!({"link": "https://a.example", "category": "Books"}), Some(&token))?;
    let resp = app.clone().call(req).await?;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(resp).await?, json!({"error": "Failed to add product"}));
    Ok(())
}

#[tokio::test]
async fn openapi_document_lists_catalog_paths() -> anyhow::Result<()> {
    let t = build_app().await?;
    let resp = t.app.clone().call(get("/api-docs/openapi.json")?).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let doc = body_json(resp).await?;
    assert!(doc["paths"]["/api/products"].is_object());
    assert!(doc["paths"]["/api/auth/login"].is_object());
    Ok(())
}

#[tokio::test]
async fn malformed_query_is_json_400() -> anyhow::Result<()> {
    let t = build_app().await?;
    let resp = t.app.clone().call(get("/api/products?category=a&category=b")?).await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let content_type = resp
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("application/json"), "{content_type}");
    assert!(body_json(resp).await?["error"].is_string());
    Ok(())
}

#[tokio::test]
async fn out_of_range_session_ttl_fails_startup() -> anyhow::Result<()> {
    let mut cfg = AppConfig::default();
    cfg.storage.products_file = std::env::temp_dir()
        .join(format!("catalog_ttl_{}.json", Uuid::new_v4()))
        .to_string_lossy()
        .into_owned();
    // bypasses normalize_and_validate, which would reject it
    cfg.auth.session_ttl_hours = i64::MAX;

    let res = startup::build_state(&cfg).await;
    assert!(matches!(res, Err(server::errors::StartupError::InvalidConfig(_))));
    let _ = std::fs::remove_file(&cfg.storage.products_file);
    Ok(())
}
