//! Client tests against a mock PostgREST server.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use balcao_models::{Company, ListingStatus};
use balcao_postgrest::retry::RetryConfig;
use balcao_postgrest::{PostgrestClient, PostgrestConfig, PostgrestError, Query};

fn client_for(server: &MockServer) -> PostgrestClient {
    let config = PostgrestConfig {
        base_url: server.uri(),
        service_key: "service-key".to_string(),
        timeout: Duration::from_secs(5),
        connect_timeout: Duration::from_secs(2),
        retry: RetryConfig {
            max_retries: 1,
            base_delay_ms: 1,
            max_delay_ms: 2,
        },
    };
    PostgrestClient::new(config).unwrap()
}

fn company_row() -> serde_json::Value {
    json!({
        "id": "8f5b1f9e-6f9c-4a3e-9f3e-0c1a2b3c4d5e",
        "nome": "Padaria Central",
        "slug": "padaria-central",
        "cidade": "Itajuba",
        "status": "aprovado",
        "destaque": false,
        "criado_por": "gotrue|owner1",
        "criado_em": "2025-01-10T12:00:00Z",
        "atualizado_em": "2025-01-11T12:00:00Z"
    })
}

#[tokio::test]
async fn select_counted_parses_rows_and_total() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/empresas"))
        .and(query_param("status", "eq.aprovado"))
        .and(query_param("limit", "20"))
        .and(header("apikey", "service-key"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Range", "0-0/42")
                .set_body_json(json!([company_row()])),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let query = Query::new().eq("status", "aprovado").limit(20).offset(0);
    let (rows, total): (Vec<Company>, u64) =
        client.select_counted("empresas", &query).await.unwrap();

    assert_eq!(total, 42);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name, "Padaria Central");
    assert_eq!(rows[0].status, ListingStatus::Approved);
}

#[tokio::test]
async fn find_by_id_returns_none_on_empty_result() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/empresas"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let found: Option<Company> = client
        .find_by_id("empresas", "8f5b1f9e-6f9c-4a3e-9f3e-0c1a2b3c4d5e")
        .await
        .unwrap();

    assert!(found.is_none());
}

#[tokio::test]
async fn insert_returns_stored_representation() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/empresas"))
        .and(header("Prefer", "return=representation"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([company_row()])))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let row = json!({ "nome": "Padaria Central", "slug": "padaria-central" });
    let company: Company = client.insert("empresas", &row).await.unwrap();

    assert_eq!(company.slug, "padaria-central");
}

#[tokio::test]
async fn conflict_status_maps_to_conflict_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/empresas"))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(json!({
                "message": "duplicate key value violates unique constraint"
            })),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let row = json!({ "slug": "padaria-central" });
    let err = client.insert::<Company>("empresas", &row).await.unwrap_err();

    assert!(matches!(err, PostgrestError::Conflict(_)));
}

#[tokio::test]
async fn delete_reports_whether_a_row_was_removed() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/tags"))
        .and(query_param("id", "eq.missing-id"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert!(!client.delete_by_id("tags", "missing-id").await.unwrap());
}

#[tokio::test]
async fn server_errors_are_retried_then_surfaced() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/vagas"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .expect(2) // initial attempt + one retry
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .select::<serde_json::Value>("vagas", &Query::new())
        .await
        .unwrap_err();

    assert!(matches!(err, PostgrestError::Upstream { status: 503, .. }));
}
