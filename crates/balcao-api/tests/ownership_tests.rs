//! Ownership-gate tests against a mock data service.
//!
//! These pin the moderation-field stripping behavior: an owner's update may
//! carry `status`/`destaque`, but the patch that reaches the data service
//! must not.

use std::time::Duration;

use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use balcao_api::auth::{Caller, Role};
use balcao_api::error::ApiError;
use balcao_api::services::ListingService;
use balcao_models::CompanyPatch;
use balcao_postgrest::retry::RetryConfig;
use balcao_postgrest::{PostgrestClient, PostgrestConfig};

const COMPANY_ID: &str = "8f5b1f9e-6f9c-4a3e-9f3e-0c1a2b3c4d5e";
const OWNER: &str = "gotrue|owner1";

fn service_against(server: &MockServer) -> ListingService {
    let config = PostgrestConfig {
        base_url: server.uri(),
        service_key: "service-key".to_string(),
        timeout: Duration::from_secs(5),
        connect_timeout: Duration::from_secs(2),
        retry: RetryConfig {
            max_retries: 0,
            base_delay_ms: 1,
            max_delay_ms: 2,
        },
    };
    ListingService::new(PostgrestClient::new(config).unwrap())
}

fn company_row() -> serde_json::Value {
    json!({
        "id": COMPANY_ID,
        "nome": "Padaria Central",
        "slug": "padaria-central",
        "cidade": "Itajuba",
        "status": "aprovado",
        "destaque": false,
        "criado_por": OWNER,
        "criado_em": "2025-01-10T12:00:00Z",
        "atualizado_em": "2025-01-11T12:00:00Z"
    })
}

async fn mock_company_endpoints(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/rest/v1/empresas"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([company_row()])))
        .mount(server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/empresas"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([company_row()])))
        .mount(server)
        .await;
}

async fn applied_patch(server: &MockServer) -> Option<serde_json::Value> {
    let requests = server.received_requests().await.unwrap();
    requests
        .iter()
        .find(|r| r.method.to_string() == "PATCH")
        .map(|r| serde_json::from_slice(&r.body).unwrap())
}

fn moderation_patch() -> CompanyPatch {
    serde_json::from_value(json!({
        "nome": "Padaria Nova",
        "status": "recusado",
        "destaque": true
    }))
    .unwrap()
}

#[tokio::test]
async fn owner_update_drops_status_and_featured() {
    let server = MockServer::start().await;
    mock_company_endpoints(&server).await;

    let service = service_against(&server);
    let caller = Caller::new(OWNER, Role::User);
    let id = Uuid::parse_str(COMPANY_ID).unwrap();

    service
        .update_company(&caller, id, moderation_patch())
        .await
        .unwrap();

    let body = applied_patch(&server).await.expect("a patch was applied");
    assert_eq!(body["nome"], "Padaria Nova");
    assert!(body.get("status").is_none());
    assert!(body.get("destaque").is_none());
    assert!(body.get("atualizado_em").is_some());
}

#[tokio::test]
async fn admin_update_keeps_moderation_fields() {
    let server = MockServer::start().await;
    mock_company_endpoints(&server).await;

    let service = service_against(&server);
    let id = Uuid::parse_str(COMPANY_ID).unwrap();

    service
        .update_company(&Caller::admin(), id, moderation_patch())
        .await
        .unwrap();

    let body = applied_patch(&server).await.expect("a patch was applied");
    assert_eq!(body["status"], "recusado");
    assert_eq!(body["destaque"], true);
}

#[tokio::test]
async fn stranger_update_is_forbidden_before_any_write() {
    let server = MockServer::start().await;
    mock_company_endpoints(&server).await;

    let service = service_against(&server);
    let caller = Caller::new("gotrue|someone-else", Role::User);
    let id = Uuid::parse_str(COMPANY_ID).unwrap();

    let err = service
        .update_company(&caller, id, moderation_patch())
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Forbidden(_)));
    assert!(applied_patch(&server).await.is_none());
}

#[tokio::test]
async fn unknown_company_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/empresas"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let service = service_against(&server);
    let err = service
        .update_company(&Caller::admin(), Uuid::new_v4(), moderation_patch())
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::NotFound(_)));
}
