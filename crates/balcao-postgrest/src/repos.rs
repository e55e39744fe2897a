//! Typed repositories for company and professional listings.

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use balcao_models::{
    Company, CompanyPatch, ListingStatus, NewCompany, NewProfessional, Page, PageQuery,
    Professional, ProfessionalPatch,
};

use crate::client::PostgrestClient;
use crate::error::PostgrestResult;
use crate::query::Query;

const COMPANIES: &str = "empresas";
const PROFESSIONALS: &str = "profissionais";

/// Serialize a patch and stamp `atualizado_em`.
pub(crate) fn patch_with_timestamp(
    patch: &impl serde::Serialize,
) -> PostgrestResult<serde_json::Value> {
    let mut body = serde_json::to_value(patch)?;
    if let serde_json::Value::Object(ref mut map) = body {
        map.insert(
            "atualizado_em".to_string(),
            serde_json::json!(Utc::now()),
        );
    }
    Ok(body)
}

/// List filters for companies.
#[derive(Debug, Clone, Default)]
pub struct CompanyFilter {
    pub city: Option<String>,
    pub status: Option<ListingStatus>,
    pub search: Option<String>,
    pub featured: Option<bool>,
    pub owner: Option<String>,
}

impl CompanyFilter {
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
        if let Some(ref term) = self.search {
            query = query.search("nome", term);
        }
        if let Some(featured) = self.featured {
            query = query.eq("destaque", featured);
        }
        query
    }
}

/// Repository for the `empresas` table.
#[derive(Clone)]
pub struct CompanyRepository {
    client: PostgrestClient,
}

impl CompanyRepository {
    pub fn new(client: PostgrestClient) -> Self {
        Self { client }
    }

    pub async fn get(&self, id: Uuid) -> PostgrestResult<Option<Company>> {
        self.client.find_by_id(COMPANIES, &id.to_string()).await
    }

    pub async fn find_by_slug(&self, slug: &str) -> PostgrestResult<Option<Company>> {
        self.client
            .find_one(COMPANIES, &Query::new().eq("slug", slug))
            .await
    }

    /// Paginated list, featured rows first, newest first.
    pub async fn list(
        &self,
        filter: &CompanyFilter,
        page: PageQuery,
    ) -> PostgrestResult<Page<Company>> {
        let query = filter
            .apply(Query::new())
            .order_desc("destaque")
            .order_desc("criado_em")
            .paginate(page);
        let (rows, total) = self.client.select_counted(COMPANIES, &query).await?;
        Ok(Page::new(rows, total, page.normalized()))
    }

    pub async fn insert(&self, row: &NewCompany) -> PostgrestResult<Company> {
        let company: Company = self.client.insert(COMPANIES, row).await?;
        info!("Created company record: {}", company.id);
        Ok(company)
    }

    pub async fn update(
        &self,
        id: Uuid,
        patch: &CompanyPatch,
    ) -> PostgrestResult<Option<Company>> {
        let body = patch_with_timestamp(patch)?;
        self.client
            .update_by_id(COMPANIES, &id.to_string(), &body)
            .await
    }

    /// Moderation: set the listing status.
    pub async fn set_status(
        &self,
        id: Uuid,
        status: ListingStatus,
    ) -> PostgrestResult<Option<Company>> {
        let body = patch_with_timestamp(&serde_json::json!({ "status": status }))?;
        self.client
            .update_by_id(COMPANIES, &id.to_string(), &body)
            .await
    }

    /// Moderation: flag or unflag the listing as featured.
    pub async fn set_featured(
        &self,
        id: Uuid,
        featured: bool,
    ) -> PostgrestResult<Option<Company>> {
        let body = patch_with_timestamp(&serde_json::json!({ "destaque": featured }))?;
        self.client
            .update_by_id(COMPANIES, &id.to_string(), &body)
            .await
    }

    pub async fn delete(&self, id: Uuid) -> PostgrestResult<bool> {
        self.client.delete_by_id(COMPANIES, &id.to_string()).await
    }
}

/// List filters for professional profiles.
#[derive(Debug, Clone, Default)]
pub struct ProfessionalFilter {
    pub city: Option<String>,
    pub profession: Option<String>,
    pub status: Option<ListingStatus>,
    pub search: Option<String>,
}

impl ProfessionalFilter {
    fn apply(&self, mut query: Query) -> Query {
        if let Some(ref city) = self.city {
            query = query.eq("cidade", city);
        }
        if let Some(ref profession) = self.profession {
            query = query.eq("profissao", profession);
        }
        if let Some(status) = self.status {
            query = query.eq("status", status);
        }
        if let Some(ref term) = self.search {
            query = query.search("nome", term);
        }
        query
    }
}

/// Repository for the `profissionais` table.
#[derive(Clone)]
pub struct ProfessionalRepository {
    client: PostgrestClient,
}

impl ProfessionalRepository {
    pub fn new(client: PostgrestClient) -> Self {
        Self { client }
    }

    pub async fn get(&self, id: Uuid) -> PostgrestResult<Option<Professional>> {
        self.client.find_by_id(PROFESSIONALS, &id.to_string()).await
    }

    /// A subject may hold at most one profile; used for create-once checks.
    pub async fn find_by_owner(&self, owner: &str) -> PostgrestResult<Option<Professional>> {
        self.client
            .find_one(PROFESSIONALS, &Query::new().eq("criado_por", owner))
            .await
    }

    pub async fn list(
        &self,
        filter: &ProfessionalFilter,
        page: PageQuery,
    ) -> PostgrestResult<Page<Professional>> {
        let query = filter
            .apply(Query::new())
            .order_desc("destaque")
            .order_desc("criado_em")
            .paginate(page);
        let (rows, total) = self.client.select_counted(PROFESSIONALS, &query).await?;
        Ok(Page::new(rows, total, page.normalized()))
    }

    pub async fn insert(&self, row: &NewProfessional) -> PostgrestResult<Professional> {
        let profile: Professional = self.client.insert(PROFESSIONALS, row).await?;
        info!("Created professional profile: {}", profile.id);
        Ok(profile)
    }

    pub async fn update(
        &self,
        id: Uuid,
        patch: &ProfessionalPatch,
    ) -> PostgrestResult<Option<Professional>> {
        let body = patch_with_timestamp(patch)?;
        self.client
            .update_by_id(PROFESSIONALS, &id.to_string(), &body)
            .await
    }

    pub async fn set_status(
        &self,
        id: Uuid,
        status: ListingStatus,
    ) -> PostgrestResult<Option<Professional>> {
        let body = patch_with_timestamp(&serde_json::json!({ "status": status }))?;
        self.client
            .update_by_id(PROFESSIONALS, &id.to_string(), &body)
            .await
    }

    pub async fn delete(&self, id: Uuid) -> PostgrestResult<bool> {
        self.client.delete_by_id(PROFESSIONALS, &id.to_string()).await
    }
}
