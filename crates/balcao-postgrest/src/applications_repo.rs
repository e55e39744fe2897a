//! Typed repository for job applications.

use tracing::info;
use uuid::Uuid;

use balcao_models::{
    ApplicationPatch, ApplicationStatus, JobApplication, NewApplication, Page, PageQuery,
};

use crate::client::PostgrestClient;
use crate::error::PostgrestResult;
use crate::query::Query;

const TABLE: &str = "candidaturas";

/// List filters for applications.
#[derive(Debug, Clone, Default)]
pub struct ApplicationFilter {
    pub job_id: Option<Uuid>,
    pub owner: Option<String>,
    pub status: Option<ApplicationStatus>,
}

impl ApplicationFilter {
    fn apply(&self, mut query: Query) -> Query {
        if let Some(job_id) = self.job_id {
            query = query.eq("vaga_id", job_id);
        }
        if let Some(ref owner) = self.owner {
            query = query.eq("criado_por", owner);
        }
        if let Some(status) = self.status {
            query = query.eq("status", status);
        }
        query
    }
}

/// Repository for the `candidaturas` table.
#[derive(Clone)]
pub struct ApplicationRepository {
    client: PostgrestClient,
}

impl ApplicationRepository {
    pub fn new(client: PostgrestClient) -> Self {
        Self { client }
    }

    pub async fn get(&self, id: Uuid) -> PostgrestResult<Option<JobApplication>> {
        self.client.find_by_id(TABLE, &id.to_string()).await
    }

    /// One application per subject per posting.
    pub async fn find_for_job_and_owner(
        &self,
        job_id: Uuid,
        owner: &str,
    ) -> PostgrestResult<Option<JobApplication>> {
        self.client
            .find_one(
                TABLE,
                &Query::new().eq("vaga_id", job_id).eq("criado_por", owner),
            )
            .await
    }

    pub async fn list(
        &self,
        filter: &ApplicationFilter,
        page: PageQuery,
    ) -> PostgrestResult<Page<JobApplication>> {
        let query = filter
            .apply(Query::new())
            .order_desc("criado_em")
            .paginate(page);
        let (rows, total) = self.client.select_counted(TABLE, &query).await?;
        Ok(Page::new(rows, total, page.normalized()))
    }

    pub async fn insert(&self, row: &NewApplication) -> PostgrestResult<JobApplication> {
        let application: JobApplication = self.client.insert(TABLE, row).await?;
        info!(
            "Created application {} for job {}",
            application.id, application.job_id
        );
        Ok(application)
    }

    pub async fn update(
        &self,
        id: Uuid,
        patch: &ApplicationPatch,
    ) -> PostgrestResult<Option<JobApplication>> {
        // Applications carry no updated-at column; the patch goes as-is.
        let body = serde_json::to_value(patch)?;
        self.client.update_by_id(TABLE, &id.to_string(), &body).await
    }

    /// Review transition, admin-only at the service layer.
    pub async fn set_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
    ) -> PostgrestResult<Option<JobApplication>> {
        let body = serde_json::json!({ "status": status });
        self.client.update_by_id(TABLE, &id.to_string(), &body).await
    }

    pub async fn delete(&self, id: Uuid) -> PostgrestResult<bool> {
        self.client.delete_by_id(TABLE, &id.to_string()).await
    }
}
