//! API integration tests.
//!
//! The router is built against unreachable backing services: everything
//! that must be decided before a data service call (authentication,
//! permission, envelopes, headers) is observable here.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use balcao_api::config::{ApiConfig, Environment};
use balcao_api::{create_router, AppState};

const ADMIN_SECRET: &str = "test-admin-secret";

/// Build state against closed ports; construction never dials out.
async fn test_state() -> AppState {
    std::env::set_var("SUPABASE_URL", "http://127.0.0.1:1");
    std::env::set_var("SUPABASE_SERVICE_KEY", "test-service-key");
    std::env::set_var("STORAGE_ENDPOINT_URL", "http://127.0.0.1:1");
    std::env::set_var("STORAGE_ACCESS_KEY_ID", "test");
    std::env::set_var("STORAGE_SECRET_ACCESS_KEY", "test");
    std::env::set_var("STORAGE_BUCKET_NAME", "test-bucket");
    std::env::set_var("POSTGREST_RETRY_BASE_MS", "1");
    std::env::set_var("POSTGREST_RETRY_MAX_MS", "2");

    let default = ApiConfig::default();
    let mut config = ApiConfig {
        environment: Environment::Production,
        ..default
    };
    config.auth.admin_secret = Some(ADMIN_SECRET.to_string());

    AppState::new(config).await.expect("state should build offline")
}

async fn test_router() -> axum::Router {
    create_router(test_state().await, None)
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_endpoint_is_public() {
    let app = test_router().await;

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn missing_token_is_rejected_with_message_envelope() {
    let app = test_router().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/user/empresas")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert!(json["message"].as_str().unwrap().contains("missing bearer token"));
}

#[tokio::test]
async fn invalid_token_is_unauthorized() {
    let app = test_router().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/user/empresas")
                .header("Authorization", "Bearer not-the-secret")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert!(json["message"].as_str().unwrap().contains("invalid or expired"));
}

#[tokio::test]
async fn admin_secret_clears_authentication() {
    let app = test_router().await;

    // The data service is unreachable, so getting past auth means a 500
    // from the backing store, never a 401/403.
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/user/empresas")
                .header("Authorization", format!("Bearer {ADMIN_SECRET}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn query_param_token_is_accepted() {
    let app = test_router().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/api/user/vagas?access_token={ADMIN_SECRET}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_ne!(response.status(), StatusCode::UNAUTHORIZED);
    assert_ne!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn body_token_is_accepted_on_application_route() {
    let app = test_router().await;

    let body = serde_json::json!({
        "nome": "Maria Souza",
        "email": "maria@example.com",
        "token": ADMIN_SECRET,
    });

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/vagas/8f5b1f9e-6f9c-4a3e-9f3e-0c1a2b3c4d5e/candidaturas")
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    // Auth cleared; the posting lookup then dies against the closed port.
    assert_ne!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn permission_check_never_runs_without_a_token() {
    let app = test_router().await;

    // Admin-labelled route: an unauthenticated request must fail at the
    // resolver (401), not at the permission check (403).
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/admin/system/info")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_secret_passes_admin_label() {
    let app = test_router().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/admin/system/info")
                .header("Authorization", format!("Bearer {ADMIN_SECRET}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["environment"], "production");
}

#[tokio::test]
async fn validation_failures_are_422_with_message() {
    let app = test_router().await;

    let body = serde_json::json!({
        "nome": "X",
        "cidade": "Itajuba"
    });

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/empresas")
                .header("Authorization", format!("Bearer {ADMIN_SECRET}"))
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(response).await;
    assert!(json.get("message").is_some());
}

#[tokio::test]
async fn security_headers_are_set() {
    let app = test_router().await;

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let headers = response.headers();
    assert_eq!(headers.get("X-Content-Type-Options").unwrap(), "nosniff");
    assert_eq!(headers.get("X-Frame-Options").unwrap(), "DENY");
    assert!(headers.get("X-Request-ID").is_some());
}

#[tokio::test]
async fn cors_preflight_succeeds() {
    let app = test_router().await;

    let response = app
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/api/empresas")
                .header("Origin", "http://localhost:3000")
                .header("Access-Control-Request-Method", "GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(
        response.status() == StatusCode::OK || response.status() == StatusCode::NO_CONTENT
    );
}
