//! JWKS fetch and cache for Auth0 token validation.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use jsonwebtoken::DecodingKey;
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// JWKS cache TTL.
const JWKS_CACHE_TTL: Duration = Duration::from_secs(3600); // 1 hour

/// JWKS response from the provider.
#[derive(Debug, Deserialize)]
struct JwksResponse {
    keys: Vec<JwkKey>,
}

#[derive(Debug, Clone, Deserialize)]
struct JwkKey {
    kid: String,
    n: String,
    e: String,
}

/// Cached JWKS keys, refreshed lazily on first use and after expiry.
///
/// Construction never touches the network; a request that needs a key pays
/// for the refresh.
pub struct JwksCache {
    http: Client,
    jwks_url: String,
    keys: RwLock<HashMap<String, DecodingKey>>,
    last_refresh: RwLock<Option<Instant>>,
}

impl JwksCache {
    pub fn new(http: Client, jwks_url: String) -> Self {
        Self {
            http,
            jwks_url,
            keys: RwLock::new(HashMap::new()),
            last_refresh: RwLock::new(None),
        }
    }

    /// Refresh keys from the provider.
    async fn refresh_keys(&self) -> Result<(), reqwest::Error> {
        debug!("Refreshing JWKS keys from {}", self.jwks_url);

        let response = self.http.get(&self.jwks_url).send().await?;
        let jwks: JwksResponse = response.error_for_status()?.json().await?;

        let mut keys = HashMap::new();
        for jwk in jwks.keys {
            match DecodingKey::from_rsa_components(&jwk.n, &jwk.e) {
                Ok(key) => {
                    keys.insert(jwk.kid, key);
                }
                Err(e) => warn!("Skipping unparseable JWK {}: {}", jwk.kid, e),
            }
        }

        let key_count = keys.len();
        *self.keys.write().await = keys;
        *self.last_refresh.write().await = Some(Instant::now());

        debug!("Refreshed {} JWKS keys", key_count);
        Ok(())
    }

    /// Get the decoding key for a key ID, refreshing the cache when stale.
    ///
    /// `Err` means the provider could not be reached and no usable keys are
    /// cached; the caller treats that as a transient provider failure, not
    /// an invalid token.
    pub async fn get_key(&self, kid: &str) -> Result<Option<DecodingKey>, reqwest::Error> {
        let needs_refresh = match *self.last_refresh.read().await {
            None => true,
            Some(at) => at.elapsed() > JWKS_CACHE_TTL,
        };

        if needs_refresh {
            if let Err(e) = self.refresh_keys().await {
                if self.keys.read().await.is_empty() {
                    return Err(e);
                }
                // Serve stale keys rather than failing the request.
                warn!("Failed to refresh JWKS keys: {}", e);
            }
        }

        Ok(self.keys.read().await.get(kid).cloned())
    }
}
