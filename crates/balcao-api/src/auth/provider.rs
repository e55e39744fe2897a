//! Identity-provider token checks.
//!
//! Each provider returns an explicit [`ProviderCheck`] so the resolver can
//! tell a rejected token apart from an unreachable provider. Transport
//! failures never masquerade as "token invalid".

use jsonwebtoken::{decode, decode_header, Algorithm, Validation};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::auth::jwks::JwksCache;
use crate::auth::{Caller, Role};
use crate::config::AuthConfig;

/// Outcome of a single provider check.
#[derive(Debug)]
pub enum ProviderCheck {
    /// Token accepted; identity resolved.
    Valid(Caller),
    /// Provider judged the token invalid or expired.
    Invalid(String),
    /// Provider could not be reached or answered garbage.
    Transient(String),
}

/// A token-introspection strategy in the resolver's fallback chain.
#[axum::async_trait]
pub trait TokenValidator: Send + Sync {
    fn name(&self) -> &'static str;
    async fn check(&self, token: &str) -> ProviderCheck;
}

// =============================================================================
// Auth0: JWT against cached JWKS + userinfo profile fetch
// =============================================================================

/// Claims carried by an Auth0 access token.
#[derive(Debug, Deserialize)]
struct Auth0Claims {
    sub: String,
    #[serde(flatten)]
    extra: serde_json::Map<String, serde_json::Value>,
}

/// Userinfo payload; only display fields are consumed.
#[derive(Debug, Deserialize)]
struct Auth0Profile {
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

/// Validates Auth0 JWTs against the cached JWKS, constrained to the
/// configured issuer and trusted audiences, then derives the application
/// role from an explicit claim mapping.
pub struct Auth0Validator {
    http: Client,
    jwks: JwksCache,
    issuer: String,
    audiences: Vec<String>,
    userinfo_url: String,
    roles_claim: String,
}

impl Auth0Validator {
    pub fn new(http: Client, config: &AuthConfig) -> Self {
        Self {
            jwks: JwksCache::new(http.clone(), config.auth0_jwks_url()),
            issuer: config.auth0_issuer.clone(),
            audiences: config.trusted_audiences.clone(),
            userinfo_url: config.auth0_userinfo_url(),
            roles_claim: config.auth0_roles_claim.clone(),
            http,
        }
    }

    /// Explicit, audited claim-to-role mapping.
    ///
    /// Holding a valid Auth0 token grants USER; ADMIN requires an
    /// `admin` entry in the configured roles claim.
    fn map_role(&self, claims: &Auth0Claims) -> Role {
        let roles: Vec<String> = claims
            .extra
            .get(&self.roles_claim)
            .and_then(|v| v.as_array())
            .map(|arr| {
                arr.iter()
                    .filter_map(|r| r.as_str().map(|s| s.to_string()))
                    .collect()
            })
            .unwrap_or_default();

        let role = if roles.iter().any(|r| r == "admin") {
            Role::Admin
        } else {
            Role::User
        };

        info!(
            subject = %claims.sub,
            claim = %self.roles_claim,
            roles = ?roles,
            role = %role,
            "assigned role from provider claims"
        );

        role
    }

    /// Best-effort profile fetch; the identity fields it feeds are optional.
    async fn fetch_profile(&self, token: &str) -> Option<Auth0Profile> {
        let result = self
            .http
            .get(&self.userinfo_url)
            .bearer_auth(token)
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => response.json().await.ok(),
            Ok(response) => {
                debug!("userinfo fetch rejected with {}", response.status());
                None
            }
            Err(e) => {
                debug!("userinfo fetch failed: {}", e);
                None
            }
        }
    }
}

#[axum::async_trait]
impl TokenValidator for Auth0Validator {
    fn name(&self) -> &'static str {
        "auth0"
    }

    async fn check(&self, token: &str) -> ProviderCheck {
        let header = match decode_header(token) {
            Ok(h) => h,
            Err(e) => return ProviderCheck::Invalid(format!("malformed token header: {e}")),
        };

        let kid = match header.kid {
            Some(kid) => kid,
            None => return ProviderCheck::Invalid("token missing key ID".to_string()),
        };

        let key = match self.jwks.get_key(&kid).await {
            Ok(Some(key)) => key,
            Ok(None) => return ProviderCheck::Invalid(format!("unknown signing key: {kid}")),
            Err(e) => return ProviderCheck::Transient(format!("JWKS unavailable: {e}")),
        };

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[&self.issuer]);
        if self.audiences.is_empty() {
            // No trusted audiences configured: refuse rather than accept any.
            return ProviderCheck::Invalid("no trusted audiences configured".to_string());
        }
        validation.set_audience(&self.audiences);

        let claims = match decode::<Auth0Claims>(token, &key, &validation) {
            Ok(data) => data.claims,
            Err(e) => return ProviderCheck::Invalid(format!("token validation failed: {e}")),
        };

        let role = self.map_role(&claims);
        let profile = self.fetch_profile(token).await;

        let caller = Caller::new(claims.sub, role)
            .with_email(profile.as_ref().and_then(|p| p.email.clone()))
            .with_display_name(profile.and_then(|p| p.name));

        ProviderCheck::Valid(caller)
    }
}

// =============================================================================
// GoTrue: remote introspection
// =============================================================================

/// Account payload returned by GoTrue introspection.
#[derive(Debug, Deserialize)]
struct GotrueUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    user_metadata: serde_json::Value,
    #[serde(default)]
    app_metadata: serde_json::Value,
}

/// Validates tokens by introspection against the GoTrue user endpoint; the
/// role rides on the account's app metadata and defaults to USER.
pub struct GotrueValidator {
    http: Client,
    user_url: String,
    anon_key: String,
}

impl GotrueValidator {
    pub fn new(http: Client, config: &AuthConfig) -> Self {
        Self {
            http,
            user_url: format!("{}/auth/v1/user", config.gotrue_url.trim_end_matches('/')),
            anon_key: config.gotrue_anon_key.clone(),
        }
    }
}

#[axum::async_trait]
impl TokenValidator for GotrueValidator {
    fn name(&self) -> &'static str {
        "gotrue"
    }

    async fn check(&self, token: &str) -> ProviderCheck {
        let response = match self
            .http
            .get(&self.user_url)
            .bearer_auth(token)
            .header("apikey", &self.anon_key)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return ProviderCheck::Transient(format!("introspection failed: {e}")),
        };

        let status = response.status();
        if status.is_client_error() {
            return ProviderCheck::Invalid(format!("provider rejected token ({status})"));
        }
        if !status.is_success() {
            return ProviderCheck::Transient(format!("introspection answered {status}"));
        }

        let user: GotrueUser = match response.json().await {
            Ok(user) => user,
            Err(e) => {
                warn!("unparseable introspection response: {}", e);
                return ProviderCheck::Transient("unparseable introspection response".to_string());
            }
        };

        let role = match user.app_metadata.get("role").and_then(|r| r.as_str()) {
            Some("admin") => Role::Admin,
            _ => Role::User,
        };

        let display_name = user
            .user_metadata
            .get("name")
            .or_else(|| user.user_metadata.get("full_name"))
            .and_then(|n| n.as_str())
            .map(|n| n.to_string());

        ProviderCheck::Valid(
            Caller::new(user.id, role)
                .with_email(user.email)
                .with_display_name(display_name),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator_with_claim(claim: &str) -> Auth0Validator {
        let config = AuthConfig {
            admin_secret: None,
            dev_bypass: false,
            trusted_audiences: vec!["https://api.balcao.app".to_string()],
            auth0_issuer: "https://balcao.auth0.com/".to_string(),
            auth0_roles_claim: claim.to_string(),
            gotrue_url: String::new(),
            gotrue_anon_key: String::new(),
        };
        Auth0Validator::new(Client::new(), &config)
    }

    fn claims(json: serde_json::Value) -> Auth0Claims {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn admin_entry_in_roles_claim_maps_to_admin() {
        let validator = validator_with_claim("https://balcao.app/roles");
        let claims = claims(serde_json::json!({
            "sub": "auth0|abc",
            "https://balcao.app/roles": ["editor", "admin"]
        }));
        assert_eq!(validator.map_role(&claims), Role::Admin);
    }

    #[test]
    fn valid_token_without_admin_role_is_user() {
        let validator = validator_with_claim("https://balcao.app/roles");

        let with_other_roles = claims(serde_json::json!({
            "sub": "auth0|abc",
            "https://balcao.app/roles": ["editor"]
        }));
        assert_eq!(validator.map_role(&with_other_roles), Role::User);

        let without_claim = claims(serde_json::json!({ "sub": "auth0|abc" }));
        assert_eq!(validator.map_role(&without_claim), Role::User);
    }
}
