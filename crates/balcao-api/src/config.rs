//! API configuration.

use std::time::Duration;

/// Deployment environment.
///
/// Anything that is not explicitly `production` is treated as development;
/// the permissive authentication path is only ever constructed for
/// development configurations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn from_env() -> Self {
        match std::env::var("ENVIRONMENT")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "production" => Environment::Production,
            _ => Environment::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

/// Configuration consumed by the authentication core.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Shared admin secret; token equality maps straight to the ADMIN role.
    pub admin_secret: Option<String>,
    /// Skip authentication entirely (development only).
    pub dev_bypass: bool,
    /// Trusted audience identifiers for Auth0 token validation.
    pub trusted_audiences: Vec<String>,
    /// Auth0 issuer URL, with trailing slash.
    pub auth0_issuer: String,
    /// Claim carrying the application roles assigned in Auth0.
    pub auth0_roles_claim: String,
    /// GoTrue base URL.
    pub gotrue_url: String,
    /// GoTrue public API key sent alongside introspection calls.
    pub gotrue_anon_key: String,
}

impl AuthConfig {
    pub fn from_env() -> Self {
        Self {
            admin_secret: std::env::var("ADMIN_API_SECRET").ok().filter(|s| !s.is_empty()),
            dev_bypass: std::env::var("AUTH_DEV_BYPASS")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
            trusted_audiences: std::env::var("AUTH_TRUSTED_AUDIENCES")
                .map(|s| s.split(',').map(|a| a.trim().to_string()).collect())
                .unwrap_or_default(),
            auth0_issuer: std::env::var("AUTH0_ISSUER").unwrap_or_default(),
            auth0_roles_claim: std::env::var("AUTH0_ROLES_CLAIM")
                .unwrap_or_else(|_| "https://balcao.app/roles".to_string()),
            gotrue_url: std::env::var("SUPABASE_URL").unwrap_or_default(),
            gotrue_anon_key: std::env::var("SUPABASE_ANON_KEY").unwrap_or_default(),
        }
    }

    /// Auth0 publishes its signing keys under the issuer.
    pub fn auth0_jwks_url(&self) -> String {
        format!(
            "{}/.well-known/jwks.json",
            self.auth0_issuer.trim_end_matches('/')
        )
    }

    pub fn auth0_userinfo_url(&self) -> String {
        format!("{}/userinfo", self.auth0_issuer.trim_end_matches('/'))
    }
}

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// CORS origins
    pub cors_origins: Vec<String>,
    /// Rate limit requests per second
    pub rate_limit_rps: u32,
    /// Request timeout
    pub request_timeout: Duration,
    /// Max request body size
    pub max_body_size: usize,
    /// Deployment environment
    pub environment: Environment,
    /// Authentication settings
    pub auth: AuthConfig,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors_origins: vec!["*".to_string()],
            rate_limit_rps: 10,
            request_timeout: Duration::from_secs(30),
            max_body_size: 2 * 1024 * 1024, // 2MB
            environment: Environment::Development,
            auth: AuthConfig {
                admin_secret: None,
                dev_bypass: false,
                trusted_audiences: Vec::new(),
                auth0_issuer: String::new(),
                auth0_roles_claim: "https://balcao.app/roles".to_string(),
                gotrue_url: String::new(),
                gotrue_anon_key: String::new(),
            },
        }
    }
}

impl ApiConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("API_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(8000),
            cors_origins: std::env::var("CORS_ORIGINS")
                .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or_else(|_| vec!["*".to_string()]),
            rate_limit_rps: std::env::var("RATE_LIMIT_RPS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
            request_timeout: Duration::from_secs(
                std::env::var("REQUEST_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            ),
            max_body_size: std::env::var("MAX_BODY_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(2 * 1024 * 1024),
            environment: Environment::from_env(),
            auth: AuthConfig::from_env(),
        }
    }

    /// Check if running in production mode.
    pub fn is_production(&self) -> bool {
        self.environment.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_development() {
        let config = ApiConfig::default();
        assert!(!config.is_production());
        assert!(config.auth.admin_secret.is_none());
        assert!(!config.auth.dev_bypass);
    }

    #[test]
    fn jwks_and_userinfo_urls_derive_from_issuer() {
        let auth = AuthConfig {
            auth0_issuer: "https://balcao.auth0.com/".to_string(),
            ..ApiConfig::default().auth
        };
        assert_eq!(
            auth.auth0_jwks_url(),
            "https://balcao.auth0.com/.well-known/jwks.json"
        );
        assert_eq!(auth.auth0_userinfo_url(), "https://balcao.auth0.com/userinfo");
    }
}
