//! PostgREST REST client.
//!
//! Production-grade client with:
//! - Service-key authentication (static `apikey` + bearer pair)
//! - HTTP client tuning (pooling, timeouts)
//! - Exponential backoff with jitter
//! - Observability (tracing spans, metrics)

use std::time::{Duration, Instant};

use reqwest::header::HeaderMap;
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::error::{PostgrestError, PostgrestResult};
use crate::metrics::record_request;
use crate::query::Query;
use crate::retry::{with_retry, RetryConfig};

// =============================================================================
// Configuration
// =============================================================================

/// Data service client configuration.
#[derive(Debug, Clone)]
pub struct PostgrestConfig {
    /// Service base URL (project URL, without the /rest/v1 suffix)
    pub base_url: String,
    /// Service role key used for both `apikey` and bearer headers
    pub service_key: String,
    /// Request timeout
    pub timeout: Duration,
    /// Connect timeout
    pub connect_timeout: Duration,
    /// Retry configuration
    pub retry: RetryConfig,
}

impl PostgrestConfig {
    /// Create config from environment variables.
    pub fn from_env() -> PostgrestResult<Self> {
        let base_url = std::env::var("SUPABASE_URL")
            .map_err(|_| PostgrestError::config_error("SUPABASE_URL must be set"))?;
        if base_url.is_empty() {
            return Err(PostgrestError::config_error("SUPABASE_URL cannot be empty"));
        }

        let service_key = std::env::var("SUPABASE_SERVICE_KEY")
            .map_err(|_| PostgrestError::config_error("SUPABASE_SERVICE_KEY must be set"))?;

        let connect_timeout_secs: u64 = std::env::var("POSTGREST_CONNECT_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(5);

        Ok(Self {
            base_url,
            service_key,
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(connect_timeout_secs),
            retry: RetryConfig::from_env(),
        })
    }
}

// =============================================================================
// Client
// =============================================================================

/// PostgREST client for the hosted relational data service.
#[derive(Clone)]
pub struct PostgrestClient {
    http: Client,
    config: PostgrestConfig,
    rest_url: String,
}

impl PostgrestClient {
    /// Create a new client. Does not touch the network.
    pub fn new(config: PostgrestConfig) -> PostgrestResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(10)
            .user_agent(concat!("balcao-postgrest/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(PostgrestError::Network)?;

        let rest_url = format!("{}/rest/v1", config.base_url.trim_end_matches('/'));

        Ok(Self {
            http,
            config,
            rest_url,
        })
    }

    /// Create from environment variables.
    pub fn from_env() -> PostgrestResult<Self> {
        Self::new(PostgrestConfig::from_env()?)
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{}", self.rest_url, table)
    }

    /// Fetch all rows matching a query.
    pub async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &Query,
    ) -> PostgrestResult<Vec<T>> {
        let op = format!("select:{table}");
        let (_, _, body) = self
            .execute(&op, Method::GET, table, &query.to_pairs(), None, None)
            .await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Fetch a page of rows together with the exact total row count.
    pub async fn select_counted<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &Query,
    ) -> PostgrestResult<(Vec<T>, u64)> {
        let op = format!("select:{table}");
        let (_, headers, body) = self
            .execute(
                &op,
                Method::GET,
                table,
                &query.to_pairs(),
                Some("count=exact"),
                None,
            )
            .await?;
        let total = parse_content_range(&headers)?;
        Ok((serde_json::from_str(&body)?, total))
    }

    /// Fetch at most one row matching a query.
    pub async fn find_one<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &Query,
    ) -> PostgrestResult<Option<T>> {
        let limited = query.clone().limit(1);
        let mut rows: Vec<T> = self.select(table, &limited).await?;
        Ok(rows.pop())
    }

    /// Fetch a row by its `id` primary key.
    pub async fn find_by_id<T: DeserializeOwned>(
        &self,
        table: &str,
        id: &str,
    ) -> PostgrestResult<Option<T>> {
        self.find_one(table, &Query::new().eq("id", id)).await
    }

    /// Insert a row and return the stored representation.
    pub async fn insert<T: DeserializeOwned>(
        &self,
        table: &str,
        row: &impl Serialize,
    ) -> PostgrestResult<T> {
        let op = format!("insert:{table}");
        let body = serde_json::to_value(row)?;
        let (_, _, text) = self
            .execute(
                &op,
                Method::POST,
                table,
                &[],
                Some("return=representation"),
                Some(&body),
            )
            .await?;
        let mut rows: Vec<T> = serde_json::from_str(&text)?;
        rows.pop()
            .ok_or_else(|| PostgrestError::invalid_response("insert returned no rows"))
    }

    /// Patch a row by id. Returns the updated row, or `None` when the id
    /// does not exist.
    pub async fn update_by_id<T: DeserializeOwned>(
        &self,
        table: &str,
        id: &str,
        patch: &serde_json::Value,
    ) -> PostgrestResult<Option<T>> {
        let op = format!("update:{table}");
        let pairs = Query::new().eq("id", id).to_pairs();
        let (_, _, text) = self
            .execute(
                &op,
                Method::PATCH,
                table,
                &pairs,
                Some("return=representation"),
                Some(patch),
            )
            .await?;
        let mut rows: Vec<T> = serde_json::from_str(&text)?;
        Ok(rows.pop())
    }

    /// Delete a row by id. Returns `false` when the id does not exist.
    pub async fn delete_by_id(&self, table: &str, id: &str) -> PostgrestResult<bool> {
        let op = format!("delete:{table}");
        let pairs = Query::new().eq("id", id).to_pairs();
        let (_, _, text) = self
            .execute(
                &op,
                Method::DELETE,
                table,
                &pairs,
                Some("return=representation"),
                None,
            )
            .await?;
        let rows: Vec<serde_json::Value> = serde_json::from_str(&text)?;
        Ok(!rows.is_empty())
    }

    async fn execute(
        &self,
        operation: &str,
        method: Method,
        table: &str,
        pairs: &[(String, String)],
        prefer: Option<&str>,
        body: Option<&serde_json::Value>,
    ) -> PostgrestResult<(StatusCode, HeaderMap, String)> {
        let url = self.table_url(table);
        debug!(operation = %operation, url = %url, "data service request");

        with_retry(&self.config.retry, operation, || async {
            let started = Instant::now();

            let mut request = self
                .http
                .request(method.clone(), url.as_str())
                .header("apikey", &self.config.service_key)
                .bearer_auth(&self.config.service_key)
                .query(pairs);
            if let Some(prefer) = prefer {
                request = request.header("Prefer", prefer);
            }
            if let Some(body) = body {
                request = request.json(body);
            }

            let response = request.send().await?;
            let status = response.status();
            let headers = response.headers().clone();
            let text = response.text().await?;

            record_request(operation, status.as_u16(), started.elapsed().as_millis() as f64);

            if status.is_success() {
                Ok((status, headers, text))
            } else {
                Err(map_error(status, &headers, &text))
            }
        })
        .await
    }
}

/// Map an error response to the crate taxonomy.
fn map_error(status: StatusCode, headers: &HeaderMap, body: &str) -> PostgrestError {
    let message = extract_message(body);

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            PostgrestError::PermissionDenied(message)
        }
        StatusCode::NOT_FOUND => PostgrestError::NotFound(message),
        StatusCode::CONFLICT => PostgrestError::Conflict(message),
        StatusCode::TOO_MANY_REQUESTS => {
            let retry_after_ms = headers
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .map(|secs| secs * 1000)
                .unwrap_or(1000);
            PostgrestError::RateLimited(retry_after_ms)
        }
        s if s.is_server_error() => PostgrestError::Upstream {
            status: s.as_u16(),
            message,
        },
        s => PostgrestError::RequestFailed(format!("{}: {}", s.as_u16(), message)),
    }
}

/// Pull the `message` field out of a PostgREST error body, falling back to
/// the (truncated) raw text.
fn extract_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(message) = value.get("message").and_then(|m| m.as_str()) {
            return message.to_string();
        }
    }
    body.chars().take(200).collect()
}

/// Parse the total from a `Content-Range` header (`0-19/87` or `*/0`).
fn parse_content_range(headers: &HeaderMap) -> PostgrestResult<u64> {
    let raw = headers
        .get("Content-Range")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| PostgrestError::invalid_response("missing Content-Range header"))?;

    raw.rsplit('/')
        .next()
        .filter(|total| *total != "*")
        .and_then(|total| total.parse().ok())
        .ok_or_else(|| {
            PostgrestError::invalid_response(format!("unparseable Content-Range: {raw}"))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn content_range_parses_total() {
        let mut headers = HeaderMap::new();
        headers.insert("Content-Range", HeaderValue::from_static("0-19/87"));
        assert_eq!(parse_content_range(&headers).unwrap(), 87);

        headers.insert("Content-Range", HeaderValue::from_static("*/0"));
        assert_eq!(parse_content_range(&headers).unwrap(), 0);
    }

    #[test]
    fn content_range_missing_is_invalid() {
        let headers = HeaderMap::new();
        assert!(matches!(
            parse_content_range(&headers),
            Err(PostgrestError::InvalidResponse(_))
        ));
    }

    #[test]
    fn error_mapping_by_status() {
        let headers = HeaderMap::new();
        let body = r#"{"message":"duplicate key value"}"#;

        assert!(matches!(
            map_error(StatusCode::CONFLICT, &headers, body),
            PostgrestError::Conflict(m) if m == "duplicate key value"
        ));
        assert!(matches!(
            map_error(StatusCode::SERVICE_UNAVAILABLE, &headers, "boom"),
            PostgrestError::Upstream { status: 503, .. }
        ));
        assert!(matches!(
            map_error(StatusCode::UNAUTHORIZED, &headers, "{}"),
            PostgrestError::PermissionDenied(_)
        ));
    }

    #[test]
    fn rate_limit_honors_retry_after() {
        let mut headers = HeaderMap::new();
        headers.insert("Retry-After", HeaderValue::from_static("3"));
        assert!(matches!(
            map_error(StatusCode::TOO_MANY_REQUESTS, &headers, ""),
            PostgrestError::RateLimited(3000)
        ));
    }
}
