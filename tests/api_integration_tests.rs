//! Integration Tests for API Endpoints
//!
//! Tests the full request/response cycle for the gallery and admin endpoints.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use gallery_cache::{
    api::create_router,
    cache::{CacheLimits, ManualClock},
    provider::StubProvider,
    AdminGate, AppState, ImageCache,
};
use serde_json::Value;
use tower::ServiceExt;

const TOKEN: &str = "gallery-admin-token";

// == Helper Functions ==

struct TestApp {
    router: Router,
    provider: Arc<StubProvider>,
    clock: Arc<ManualClock>,
}

fn create_test_app(admin_token: Option<&str>) -> TestApp {
    let provider = Arc::new(
        StubProvider::new()
            .with_images("street", 12)
            .with_images("portraits", 3),
    );
    let clock = Arc::new(ManualClock::new(0));
    let cache = ImageCache::new(CacheLimits::default(), provider.clone(), clock.clone());
    let state = AppState::new(cache, AdminGate::new(admin_token.map(str::to_string)));

    TestApp {
        router: create_router(state),
        provider,
        clock,
    }
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn admin(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

// == Gallery Endpoint Tests ==

#[tokio::test]
async fn test_gallery_images_success() {
    let app = create_test_app(None);

    let response = app
        .router
        .oneshot(get("/api/galleries/street/images"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["tag"], "street");
    assert_eq!(json["count"], 12);
    assert_eq!(json["images"][0]["id"], "street-0");
    assert_eq!(json["images"][0]["width"], 1600);
}

#[tokio::test]
async fn test_gallery_images_limit_query() {
    let app = create_test_app(None);

    let response = app
        .router
        .oneshot(get("/api/galleries/street/images?limit=5"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["count"], 5);
}

#[tokio::test]
async fn test_gallery_small_limit_keeps_full_list_for_others() {
    let app = create_test_app(None);

    let response = app
        .router
        .clone()
        .oneshot(get("/api/galleries/street/images?limit=1"))
        .await
        .unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["count"], 1);

    let response = app
        .router
        .oneshot(get("/api/galleries/street/images"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["count"], 12);
    assert_eq!(app.provider.calls(), 1);
}

#[tokio::test]
async fn test_gallery_images_invalid_limit() {
    let app = create_test_app(None);

    let response = app
        .router
        .oneshot(get("/api/galleries/street/images?limit=5000"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(response.into_body()).await;
    assert!(json["error"].as_str().unwrap().contains("limit"));
}

#[tokio::test]
async fn test_gallery_served_from_cache_within_window() {
    let app = create_test_app(None);

    app.router
        .clone()
        .oneshot(get("/api/galleries/street/images"))
        .await
        .unwrap();
    app.clock.set(100_000);
    let response = app
        .router
        .oneshot(get("/api/galleries/street/images"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(app.provider.calls(), 1);
}

#[tokio::test]
async fn test_gallery_provider_failure_serves_stale() {
    let app = create_test_app(None);

    app.router
        .clone()
        .oneshot(get("/api/galleries/street/images"))
        .await
        .unwrap();

    app.clock.set(400_000);
    app.provider.set_failing(true);
    let response = app
        .router
        .oneshot(get("/api/galleries/street/images"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["count"], 12);
    assert_eq!(app.provider.calls(), 2);
}

#[tokio::test]
async fn test_gallery_provider_failure_without_cache_is_empty() {
    let app = create_test_app(None);
    app.provider.set_failing(true);

    let response = app
        .router
        .oneshot(get("/api/galleries/street/images"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["count"], 0);
}

// == Admin Endpoint Tests ==

#[tokio::test]
async fn test_admin_disabled_without_secret() {
    let app = create_test_app(None);

    for token in [None, Some(""), Some(TOKEN)] {
        let response = app
            .router
            .clone()
            .oneshot(admin("GET", "/admin/cache-status", token))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app
            .router
            .clone()
            .oneshot(admin("POST", "/admin/clear-cache", token))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}

#[tokio::test]
async fn test_admin_rejects_wrong_token_with_challenge() {
    let app = create_test_app(Some(TOKEN));

    let response = app
        .router
        .oneshot(admin("GET", "/admin/cache-status", Some("wrong")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let challenge = response.headers().get(header::WWW_AUTHENTICATE).unwrap();
    assert!(challenge.to_str().unwrap().starts_with("Bearer"));
}

#[tokio::test]
async fn test_admin_rejects_missing_token() {
    let app = create_test_app(Some(TOKEN));

    let response = app
        .router
        .oneshot(admin("POST", "/admin/clear-cache", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_cache_status_reports_entries() {
    let app = create_test_app(Some(TOKEN));

    app.router
        .clone()
        .oneshot(get("/api/galleries/street/images"))
        .await
        .unwrap();
    app.clock.set(100_000);

    let response = app
        .router
        .oneshot(admin("GET", "/admin/cache-status", Some(TOKEN)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["totalEntries"], 1);
    assert_eq!(json["maxEntries"], 20);
    assert_eq!(json["maxSizeMB"], 50.0);
    assert_eq!(json["cacheDurationSeconds"], 300);

    let entry = &json["cacheEntries"][0];
    assert_eq!(entry["tag"], "street");
    assert_eq!(entry["imageCount"], 12);
    assert_eq!(entry["sizeKB"], 12.0);
    assert_eq!(entry["lastFetched"], "1970-01-01T00:00:00.000Z");
    assert_eq!(entry["ageSeconds"], 100);
    assert_eq!(entry["expired"], false);
    assert_eq!(entry["hasActiveRequest"], false);
}

#[tokio::test]
async fn test_clear_cache_then_refetch() {
    let app = create_test_app(Some(TOKEN));

    for tag in ["street", "portraits"] {
        app.router
            .clone()
            .oneshot(get(&format!("/api/galleries/{}/images", tag)))
            .await
            .unwrap();
    }

    let response = app
        .router
        .clone()
        .oneshot(admin("POST", "/admin/clear-cache", Some(TOKEN)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["entriesCleared"], 2);
    assert_eq!(json["sizeCleared"], 15.0);
    assert!(json["message"].is_string());

    let response = app
        .router
        .clone()
        .oneshot(admin("GET", "/admin/cache-status", Some(TOKEN)))
        .await
        .unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["totalEntries"], 0);
    assert_eq!(json["totalSizeMB"], 0.0);

    app.router
        .oneshot(get("/api/galleries/street/images"))
        .await
        .unwrap();
    assert_eq!(app.provider.calls(), 3);
}

// == Health Endpoint Tests ==

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app(None);

    let response = app.router.oneshot(get("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], "healthy");
    assert!(json.get("timestamp").is_some());
}
