//! Company and professional listing rules.
//!
//! Listings are created pending and only surface publicly once approved;
//! approval and featuring are moderation actions gated by the `admin`
//! permission label at the handler layer.

use uuid::Uuid;

use balcao_models::{
    Company, CompanyPatch, ListingStatus, NewCompany, NewProfessional, Page, PageQuery,
    Professional, ProfessionalPatch,
};
use balcao_postgrest::{
    CompanyFilter, CompanyRepository, PostgrestClient, ProfessionalFilter, ProfessionalRepository,
};

use crate::auth::Caller;
use crate::error::{ApiError, ApiResult};
use crate::security::slugify;
use crate::services::ownership::{authorize_owner, OwnerAccess};

/// Validated company create input, mapped from the request DTO.
#[derive(Debug, Clone)]
pub struct CompanyDraft {
    pub name: String,
    pub description: Option<String>,
    pub city: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub logo_key: Option<String>,
}

/// Validated professional-profile create input.
#[derive(Debug, Clone)]
pub struct ProfessionalDraft {
    pub name: String,
    pub profession: String,
    pub city: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub bio: Option<String>,
}

#[derive(Clone)]
pub struct ListingService {
    companies: CompanyRepository,
    professionals: ProfessionalRepository,
}

impl ListingService {
    pub fn new(db: PostgrestClient) -> Self {
        Self {
            companies: CompanyRepository::new(db.clone()),
            professionals: ProfessionalRepository::new(db),
        }
    }

    // -------------------------------------------------------------------------
    // Companies
    // -------------------------------------------------------------------------

    pub async fn list_companies(
        &self,
        filter: &CompanyFilter,
        page: PageQuery,
    ) -> ApiResult<Page<Company>> {
        Ok(self.companies.list(filter, page).await?)
    }

    pub async fn get_company(&self, id: Uuid) -> ApiResult<Company> {
        self.companies
            .get(id)
            .await?
            .ok_or_else(|| ApiError::not_found("company not found"))
    }

    /// New companies always start pending, unfeatured, owned by the caller.
    pub async fn create_company(
        &self,
        caller: &Caller,
        draft: CompanyDraft,
    ) -> ApiResult<Company> {
        let slug = slugify(&draft.name);
        if slug.is_empty() {
            return Err(ApiError::validation("company name yields an empty slug"));
        }
        if self.companies.find_by_slug(&slug).await?.is_some() {
            return Err(ApiError::conflict(format!(
                "a company with slug '{slug}' already exists"
            )));
        }
        if let Some(ref key) = draft.logo_key {
            balcao_storage::validate_key(key)
                .map_err(|e| ApiError::validation(e.to_string()))?;
        }

        let row = NewCompany {
            name: draft.name,
            slug,
            description: draft.description,
            city: draft.city,
            phone: draft.phone,
            email: draft.email,
            website: draft.website,
            logo_key: draft.logo_key,
            status: ListingStatus::Pending,
            featured: false,
            owner: caller.subject.clone(),
        };
        Ok(self.companies.insert(&row).await?)
    }

    /// Ownership-scoped update: admins patch freely, owners lose the
    /// moderation fields silently.
    pub async fn update_company(
        &self,
        caller: &Caller,
        id: Uuid,
        mut patch: CompanyPatch,
    ) -> ApiResult<Company> {
        let company = self.get_company(id).await?;
        let access = authorize_owner(caller, &company.owner)?;
        if access == OwnerAccess::Owner {
            patch.restrict_to_owner();
        }
        if let Some(ref key) = patch.logo_key {
            balcao_storage::validate_key(key)
                .map_err(|e| ApiError::validation(e.to_string()))?;
        }

        self.companies
            .update(id, &patch)
            .await?
            .ok_or_else(|| ApiError::not_found("company not found"))
    }

    /// Moderation: approve/reject a listing.
    pub async fn moderate_company(
        &self,
        id: Uuid,
        status: ListingStatus,
    ) -> ApiResult<Company> {
        self.companies
            .set_status(id, status)
            .await?
            .ok_or_else(|| ApiError::not_found("company not found"))
    }

    /// Moderation: feature/unfeature a listing.
    pub async fn feature_company(&self, id: Uuid, featured: bool) -> ApiResult<Company> {
        self.companies
            .set_featured(id, featured)
            .await?
            .ok_or_else(|| ApiError::not_found("company not found"))
    }

    pub async fn delete_company(&self, caller: &Caller, id: Uuid) -> ApiResult<()> {
        let company = self.get_company(id).await?;
        authorize_owner(caller, &company.owner)?;
        self.companies.delete(id).await?;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Professionals
    // -------------------------------------------------------------------------

    pub async fn list_professionals(
        &self,
        filter: &ProfessionalFilter,
        page: PageQuery,
    ) -> ApiResult<Page<Professional>> {
        Ok(self.professionals.list(filter, page).await?)
    }

    pub async fn get_professional(&self, id: Uuid) -> ApiResult<Professional> {
        self.professionals
            .get(id)
            .await?
            .ok_or_else(|| ApiError::not_found("professional profile not found"))
    }

    /// One profile per subject.
    pub async fn create_professional(
        &self,
        caller: &Caller,
        draft: ProfessionalDraft,
    ) -> ApiResult<Professional> {
        if self
            .professionals
            .find_by_owner(&caller.subject)
            .await?
            .is_some()
        {
            return Err(ApiError::conflict("you already have a professional profile"));
        }

        let row = NewProfessional {
            name: draft.name,
            profession: draft.profession,
            city: draft.city,
            phone: draft.phone,
            email: draft.email,
            bio: draft.bio,
            status: ListingStatus::Pending,
            featured: false,
            owner: caller.subject.clone(),
        };
        Ok(self.professionals.insert(&row).await?)
    }

    pub async fn update_professional(
        &self,
        caller: &Caller,
        id: Uuid,
        mut patch: ProfessionalPatch,
    ) -> ApiResult<Professional> {
        let profile = self.get_professional(id).await?;
        let access = authorize_owner(caller, &profile.owner)?;
        if access == OwnerAccess::Owner {
            patch.restrict_to_owner();
        }

        self.professionals
            .update(id, &patch)
            .await?
            .ok_or_else(|| ApiError::not_found("professional profile not found"))
    }

    pub async fn moderate_professional(
        &self,
        id: Uuid,
        status: ListingStatus,
    ) -> ApiResult<Professional> {
        self.professionals
            .set_status(id, status)
            .await?
            .ok_or_else(|| ApiError::not_found("professional profile not found"))
    }

    pub async fn delete_professional(&self, caller: &Caller, id: Uuid) -> ApiResult<()> {
        let profile = self.get_professional(id).await?;
        authorize_owner(caller, &profile.owner)?;
        self.professionals.delete(id).await?;
        Ok(())
    }
}
