//! The per-request authentication resolver.
//!
//! Strict resolution (production): admin secret, then each provider in
//! order, then rejection. Dev-permissive resolution is a separate type that
//! downgrades failures to the synthesized DEV caller. Which one a process
//! runs with is decided once, at startup, from configuration.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use reqwest::Client;
use tracing::{debug, info, warn};

use crate::auth::provider::{Auth0Validator, GotrueValidator, ProviderCheck, TokenValidator};
use crate::auth::Caller;
use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::state::AppState;

/// Production-strict resolver: no token, no identity.
pub struct StrictAuthenticator {
    admin_secret: Option<String>,
    providers: Vec<Arc<dyn TokenValidator>>,
}

impl StrictAuthenticator {
    pub fn new(admin_secret: Option<String>, providers: Vec<Arc<dyn TokenValidator>>) -> Self {
        Self {
            admin_secret,
            providers,
        }
    }

    /// Resolve a caller, first match wins:
    /// 1. missing token -> Unauthorized
    /// 2. token equals the admin shared secret -> ADMIN, no provider calls
    /// 3. each provider in order; a Valid verdict ends the chain
    /// 4. all rejected -> Unauthorized; all unreachable -> Upstream
    pub async fn resolve(&self, token: Option<&str>) -> Result<Caller, ApiError> {
        let token = match token {
            Some(t) if !t.is_empty() => t,
            _ => return Err(ApiError::unauthorized("missing bearer token")),
        };

        if let Some(ref secret) = self.admin_secret {
            if token == secret {
                info!("authenticated via admin shared secret");
                return Ok(Caller::admin());
            }
        }

        let mut any_invalid = false;
        let mut any_transient = false;

        for provider in &self.providers {
            match provider.check(token).await {
                ProviderCheck::Valid(caller) => {
                    info!(
                        provider = provider.name(),
                        subject = %caller.subject,
                        role = %caller.role,
                        "authenticated"
                    );
                    return Ok(caller);
                }
                ProviderCheck::Invalid(reason) => {
                    debug!(provider = provider.name(), %reason, "token rejected");
                    any_invalid = true;
                }
                ProviderCheck::Transient(cause) => {
                    warn!(provider = provider.name(), %cause, "provider unreachable");
                    any_transient = true;
                }
            }
        }

        // A provider outage is not an invalid token: if nobody got to judge
        // the credential, surface the outage instead of a 401.
        if any_transient && !any_invalid {
            return Err(ApiError::upstream("identity providers unreachable"));
        }

        Err(ApiError::unauthorized("invalid or expired token"))
    }
}

/// Dev-permissive resolver. Real identities (admin secret, provider tokens)
/// still resolve so cross-role flows can be exercised locally; everything
/// else falls back to the DEV caller instead of failing.
pub struct DevAuthenticator {
    bypass: bool,
    inner: StrictAuthenticator,
}

impl DevAuthenticator {
    pub fn new(bypass: bool, inner: StrictAuthenticator) -> Self {
        Self { bypass, inner }
    }

    pub async fn resolve(&self, token: Option<&str>) -> Caller {
        if self.bypass {
            return Caller::dev();
        }
        match token {
            None => Caller::dev(),
            Some(token) => match self.inner.resolve(Some(token)).await {
                Ok(caller) => caller,
                Err(e) => {
                    debug!("downgrading auth failure to dev identity: {}", e);
                    Caller::dev()
                }
            },
        }
    }
}

/// The resolver a process runs with, selected once at startup.
pub enum Authenticator {
    Strict(StrictAuthenticator),
    DevPermissive(DevAuthenticator),
}

impl Authenticator {
    /// Build the resolver for this process. Production configurations get
    /// the strict chain; everything else gets the permissive wrapper.
    pub fn from_config(config: &ApiConfig) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        let mut providers: Vec<Arc<dyn TokenValidator>> = Vec::new();
        if !config.auth.auth0_issuer.is_empty() {
            providers.push(Arc::new(Auth0Validator::new(http.clone(), &config.auth)));
        }
        if !config.auth.gotrue_url.is_empty() {
            providers.push(Arc::new(GotrueValidator::new(http, &config.auth)));
        }

        let strict = StrictAuthenticator::new(config.auth.admin_secret.clone(), providers);

        if config.is_production() {
            Ok(Authenticator::Strict(strict))
        } else {
            Ok(Authenticator::DevPermissive(DevAuthenticator::new(
                config.auth.dev_bypass,
                strict,
            )))
        }
    }

    pub async fn resolve(&self, token: Option<&str>) -> Result<Caller, ApiError> {
        match self {
            Authenticator::Strict(strict) => strict.resolve(token).await,
            Authenticator::DevPermissive(dev) => Ok(dev.resolve(token).await),
        }
    }
}

/// Pull a bearer token out of request headers.
pub fn bearer_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

/// Legacy clients send the token as an `access_token` query parameter.
fn token_from_query(query: Option<&str>) -> Option<String> {
    query?
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == "access_token")
        .map(|(_, value)| value.to_string())
        .filter(|t| !t.is_empty())
}

/// Axum extractor: resolves the caller for the request.
#[axum::async_trait]
impl FromRequestParts<AppState> for Caller {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token =
            bearer_from_headers(&parts.headers).or_else(|| token_from_query(parts.uri.query()));
        state.authenticator.resolve(token.as_deref()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{Role, ADMIN_SUBJECT, DEV_SUBJECT};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Scripted provider for resolver tests.
    struct StubValidator {
        name: &'static str,
        outcome: fn() -> ProviderCheck,
        calls: AtomicUsize,
    }

    impl StubValidator {
        fn new(name: &'static str, outcome: fn() -> ProviderCheck) -> Arc<Self> {
            Arc::new(Self {
                name,
                outcome,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[axum::async_trait]
    impl TokenValidator for StubValidator {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn check(&self, _token: &str) -> ProviderCheck {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (self.outcome)()
        }
    }

    fn valid_user() -> ProviderCheck {
        ProviderCheck::Valid(Caller::new("provider|user1", Role::User))
    }

    fn invalid() -> ProviderCheck {
        ProviderCheck::Invalid("bad signature".to_string())
    }

    fn transient() -> ProviderCheck {
        ProviderCheck::Transient("connection refused".to_string())
    }

    #[tokio::test]
    async fn missing_token_is_unauthorized() {
        let auth = StrictAuthenticator::new(Some("s3cret".to_string()), vec![]);
        let err = auth.resolve(None).await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));

        let err = auth.resolve(Some("")).await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn admin_secret_wins_without_provider_calls() {
        let provider = StubValidator::new("a", valid_user);
        let auth = StrictAuthenticator::new(
            Some("s3cret".to_string()),
            vec![provider.clone() as Arc<dyn TokenValidator>],
        );

        let caller = auth.resolve(Some("s3cret")).await.unwrap();
        assert_eq!(caller.subject, ADMIN_SUBJECT);
        assert!(caller.is_admin());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn first_valid_provider_short_circuits() {
        let first = StubValidator::new("a", valid_user);
        let second = StubValidator::new("b", valid_user);
        let auth = StrictAuthenticator::new(
            None,
            vec![first.clone() as Arc<dyn TokenValidator>, second.clone()],
        );

        let caller = auth.resolve(Some("token")).await.unwrap();
        assert_eq!(caller.subject, "provider|user1");
        assert_eq!(first.calls.load(Ordering::SeqCst), 1);
        assert_eq!(second.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn transient_first_provider_falls_through_to_second() {
        let first = StubValidator::new("a", transient);
        let second = StubValidator::new("b", valid_user);
        let auth = StrictAuthenticator::new(
            None,
            vec![first.clone() as Arc<dyn TokenValidator>, second.clone()],
        );

        let caller = auth.resolve(Some("token")).await.unwrap();
        assert_eq!(caller.subject, "provider|user1");
        assert_eq!(caller.role, Role::User);
        assert_eq!(first.calls.load(Ordering::SeqCst), 1);
        assert_eq!(second.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn invalid_first_provider_still_tries_second() {
        let first = StubValidator::new("a", invalid);
        let second = StubValidator::new("b", valid_user);
        let auth = StrictAuthenticator::new(
            None,
            vec![first as Arc<dyn TokenValidator>, second.clone()],
        );

        let caller = auth.resolve(Some("token")).await.unwrap();
        assert_eq!(caller.subject, "provider|user1");
        assert_eq!(second.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn all_rejections_yield_unauthorized() {
        let auth = StrictAuthenticator::new(
            None,
            vec![
                StubValidator::new("a", invalid) as Arc<dyn TokenValidator>,
                StubValidator::new("b", invalid),
            ],
        );
        let err = auth.resolve(Some("token")).await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn total_outage_is_upstream_not_unauthorized() {
        let auth = StrictAuthenticator::new(
            None,
            vec![
                StubValidator::new("a", transient) as Arc<dyn TokenValidator>,
                StubValidator::new("b", transient),
            ],
        );
        let err = auth.resolve(Some("token")).await.unwrap_err();
        assert!(matches!(err, ApiError::Upstream(_)));
    }

    #[tokio::test]
    async fn mixed_invalid_and_transient_is_unauthorized() {
        // At least one provider judged the token: that verdict stands.
        let auth = StrictAuthenticator::new(
            None,
            vec![
                StubValidator::new("a", transient) as Arc<dyn TokenValidator>,
                StubValidator::new("b", invalid),
            ],
        );
        let err = auth.resolve(Some("token")).await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn dev_bypass_always_yields_dev_caller() {
        let strict = StrictAuthenticator::new(Some("s3cret".to_string()), vec![]);
        let dev = DevAuthenticator::new(true, strict);

        let caller = dev.resolve(Some("anything")).await;
        assert_eq!(caller.subject, DEV_SUBJECT);
    }

    #[tokio::test]
    async fn dev_without_bypass_still_resolves_real_identities() {
        let strict = StrictAuthenticator::new(Some("s3cret".to_string()), vec![]);
        let dev = DevAuthenticator::new(false, strict);

        let caller = dev.resolve(Some("s3cret")).await;
        assert!(caller.is_admin());

        let caller = dev.resolve(None).await;
        assert_eq!(caller.subject, DEV_SUBJECT);

        let caller = dev.resolve(Some("garbage")).await;
        assert_eq!(caller.subject, DEV_SUBJECT);
    }

    #[test]
    fn bearer_header_extraction() {
        let mut headers = HeaderMap::new();
        headers.insert("Authorization", "Bearer abc.def.ghi".parse().unwrap());
        assert_eq!(bearer_from_headers(&headers).as_deref(), Some("abc.def.ghi"));

        let mut headers = HeaderMap::new();
        headers.insert("Authorization", "Basic dXNlcg==".parse().unwrap());
        assert!(bearer_from_headers(&headers).is_none());
    }

    #[test]
    fn query_token_extraction() {
        assert_eq!(
            token_from_query(Some("page=2&access_token=tok123")).as_deref(),
            Some("tok123")
        );
        assert!(token_from_query(Some("page=2")).is_none());
        assert!(token_from_query(Some("access_token=")).is_none());
        assert!(token_from_query(None).is_none());
    }
}
