//! Application state.

use std::sync::Arc;

use balcao_postgrest::PostgrestClient;
use balcao_storage::ObjectStore;

use crate::auth::{Authenticator, PermissionPolicy};
use crate::config::ApiConfig;
use crate::services::{BlogService, JobService, ListingService};

/// Shared application state.
///
/// All clients are constructed once at startup and injected; nothing in the
/// request path reaches for process-wide singletons.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub db: PostgrestClient,
    pub storage: Arc<ObjectStore>,
    pub authenticator: Arc<Authenticator>,
    pub permissions: PermissionPolicy,
    pub listings: ListingService,
    pub jobs: JobService,
    pub blog: BlogService,
}

impl AppState {
    /// Create new application state. Clients come from the environment;
    /// nothing here touches the network.
    pub async fn new(config: ApiConfig) -> anyhow::Result<Self> {
        let db = PostgrestClient::from_env()?;
        let storage = Arc::new(ObjectStore::from_env()?);

        let authenticator = Arc::new(Authenticator::from_config(&config)?);
        let permissions = PermissionPolicy::for_environment(config.environment);

        let listings = ListingService::new(db.clone());
        let jobs = JobService::new(db.clone());
        let blog = BlogService::new(db.clone());

        Ok(Self {
            config,
            db,
            storage,
            authenticator,
            permissions,
            listings,
            jobs,
            blog,
        })
    }
}
