//! Typed repository for job postings.

use tracing::info;
use uuid::Uuid;

use balcao_models::{ContractType, JobPatch, JobPosting, JobStatus, NewJob, Page, PageQuery};

use crate::client::PostgrestClient;
use crate::error::PostgrestResult;
use crate::query::Query;
use crate::repos::patch_with_timestamp;

const TABLE: &str = "vagas";

/// List filters for postings.
#[derive(Debug, Clone, Default)]
pub struct JobFilter {
    pub city: Option<String>,
    pub status: Option<JobStatus>,
    pub contract: Option<ContractType>,
    pub company_id: Option<Uuid>,
    pub search: Option<String>,
    pub featured: Option<bool>,
    pub owner: Option<String>,
}

impl JobFilter {
    fn apply(&self, mut query: Query) -> Query {
        if let Some(ref city) = self.city {
            query = query.eq("cidade", city);
        }
        if let Some(ref owner) = self.owner {
            query = query.eq("criado_por", owner);
        }
        if let Some(status) = self.status {
            query = query.eq("status", status);
        }
        if let Some(contract) = self.contract {
            query = query.eq("tipo_contrato", contract);
        }
        if let Some(company_id) = self.company_id {
            query = query.eq("empresa_id", company_id);
        }
        if let Some(ref term) = self.search {
            query = query.search("titulo", term);
        }
        if let Some(featured) = self.featured {
            query = query.eq("destaque", featured);
        }
        query
    }
}

/// Repository for the `vagas` table.
#[derive(Clone)]
pub struct JobRepository {
    client: PostgrestClient,
}

impl JobRepository {
    pub fn new(client: PostgrestClient) -> Self {
        Self { client }
    }

    pub async fn get(&self, id: Uuid) -> PostgrestResult<Option<JobPosting>> {
        self.client.find_by_id(TABLE, &id.to_string()).await
    }

    pub async fn list(
        &self,
        filter: &JobFilter,
        page: PageQuery,
    ) -> PostgrestResult<Page<JobPosting>> {
        let query = filter
            .apply(Query::new())
            .order_desc("destaque")
            .order_desc("criado_em")
            .paginate(page);
        let (rows, total) = self.client.select_counted(TABLE, &query).await?;
        Ok(Page::new(rows, total, page.normalized()))
    }

    pub async fn insert(&self, row: &NewJob) -> PostgrestResult<JobPosting> {
        let job: JobPosting = self.client.insert(TABLE, row).await?;
        info!("Created job posting: {}", job.id);
        Ok(job)
    }

    pub async fn update(&self, id: Uuid, patch: &JobPatch) -> PostgrestResult<Option<JobPosting>> {
        let body = patch_with_timestamp(patch)?;
        self.client.update_by_id(TABLE, &id.to_string(), &body).await
    }

    /// Lifecycle transition; validity is checked by the service layer.
    pub async fn set_status(
        &self,
        id: Uuid,
        status: JobStatus,
    ) -> PostgrestResult<Option<JobPosting>> {
        let body = patch_with_timestamp(&serde_json::json!({ "status": status }))?;
        self.client.update_by_id(TABLE, &id.to_string(), &body).await
    }

    pub async fn set_featured(
        &self,
        id: Uuid,
        featured: bool,
    ) -> PostgrestResult<Option<JobPosting>> {
        let body = patch_with_timestamp(&serde_json::json!({ "destaque": featured }))?;
        self.client.update_by_id(TABLE, &id.to_string(), &body).await
    }

    pub async fn delete(&self, id: Uuid) -> PostgrestResult<bool> {
        self.client.delete_by_id(TABLE, &id.to_string()).await
    }
}
