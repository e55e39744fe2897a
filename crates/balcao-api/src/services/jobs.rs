//! Job posting and application rules.

use uuid::Uuid;

use balcao_models::{
    ApplicationPatch, ApplicationStatus, ContractType, JobApplication, JobPatch, JobPosting,
    JobStatus, ListingStatus, NewApplication, NewJob, Page, PageQuery,
};
use balcao_postgrest::{
    ApplicationFilter, ApplicationRepository, CompanyRepository, JobFilter, JobRepository,
    PostgrestClient,
};

use crate::auth::Caller;
use crate::error::{ApiError, ApiResult};
use crate::services::ownership::{authorize_owner, OwnerAccess};

/// Validated posting create input.
#[derive(Debug, Clone)]
pub struct JobDraft {
    pub company_id: Uuid,
    pub title: String,
    pub description: String,
    pub city: String,
    pub contract: ContractType,
    pub salary: Option<String>,
}

/// Validated application submit input.
#[derive(Debug, Clone)]
pub struct ApplicationDraft {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub resume_key: Option<String>,
    pub message: Option<String>,
}

#[derive(Clone)]
pub struct JobService {
    jobs: JobRepository,
    companies: CompanyRepository,
    applications: ApplicationRepository,
}

impl JobService {
    pub fn new(db: PostgrestClient) -> Self {
        Self {
            jobs: JobRepository::new(db.clone()),
            companies: CompanyRepository::new(db.clone()),
            applications: ApplicationRepository::new(db),
        }
    }

    // -------------------------------------------------------------------------
    // Postings
    // -------------------------------------------------------------------------

    pub async fn list_jobs(
        &self,
        filter: &JobFilter,
        page: PageQuery,
    ) -> ApiResult<Page<JobPosting>> {
        Ok(self.jobs.list(filter, page).await?)
    }

    pub async fn get_job(&self, id: Uuid) -> ApiResult<JobPosting> {
        self.jobs
            .get(id)
            .await?
            .ok_or_else(|| ApiError::not_found("job posting not found"))
    }

    /// Postings hang off an approved company; the posting inherits the
    /// company's owner so the company account manages it either way.
    pub async fn create_job(&self, caller: &Caller, draft: JobDraft) -> ApiResult<JobPosting> {
        let company = self
            .companies
            .get(draft.company_id)
            .await?
            .ok_or_else(|| ApiError::not_found("company not found"))?;
        authorize_owner(caller, &company.owner)?;

        if company.status != ListingStatus::Approved {
            return Err(ApiError::validation(
                "postings require an approved company listing",
            ));
        }

        let row = NewJob {
            company_id: company.id,
            title: draft.title,
            description: draft.description,
            city: draft.city,
            contract: draft.contract,
            salary: draft.salary,
            status: JobStatus::Draft,
            featured: false,
            owner: company.owner.clone(),
        };
        Ok(self.jobs.insert(&row).await?)
    }

    pub async fn update_job(
        &self,
        caller: &Caller,
        id: Uuid,
        mut patch: JobPatch,
    ) -> ApiResult<JobPosting> {
        let job = self.get_job(id).await?;
        let access = authorize_owner(caller, &job.owner)?;
        if access == OwnerAccess::Owner {
            patch.restrict_to_owner();
        }

        self.jobs
            .update(id, &patch)
            .await?
            .ok_or_else(|| ApiError::not_found("job posting not found"))
    }

    /// Owners move their posting through the normal lifecycle; admins may
    /// force any state.
    pub async fn transition_job(
        &self,
        caller: &Caller,
        id: Uuid,
        next: JobStatus,
    ) -> ApiResult<JobPosting> {
        let job = self.get_job(id).await?;
        let access = authorize_owner(caller, &job.owner)?;

        if access == OwnerAccess::Owner && !job.status.can_transition_to(next) {
            return Err(ApiError::validation(format!(
                "cannot move posting from '{}' to '{}'",
                job.status, next
            )));
        }

        self.jobs
            .set_status(id, next)
            .await?
            .ok_or_else(|| ApiError::not_found("job posting not found"))
    }

    /// Moderation: feature/unfeature a posting.
    pub async fn feature_job(&self, id: Uuid, featured: bool) -> ApiResult<JobPosting> {
        self.jobs
            .set_featured(id, featured)
            .await?
            .ok_or_else(|| ApiError::not_found("job posting not found"))
    }

    pub async fn delete_job(&self, caller: &Caller, id: Uuid) -> ApiResult<()> {
        let job = self.get_job(id).await?;
        authorize_owner(caller, &job.owner)?;
        self.jobs.delete(id).await?;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Applications
    // -------------------------------------------------------------------------

    /// Submit an application to an open posting, once per caller.
    pub async fn apply(
        &self,
        caller: &Caller,
        job_id: Uuid,
        draft: ApplicationDraft,
    ) -> ApiResult<JobApplication> {
        let job = self.get_job(job_id).await?;
        if job.status != JobStatus::Open {
            return Err(ApiError::validation("this posting is not accepting applications"));
        }
        if self
            .applications
            .find_for_job_and_owner(job_id, &caller.subject)
            .await?
            .is_some()
        {
            return Err(ApiError::conflict("you already applied to this posting"));
        }
        if let Some(ref key) = draft.resume_key {
            balcao_storage::validate_key(key)
                .map_err(|e| ApiError::validation(e.to_string()))?;
        }

        let row = NewApplication {
            job_id,
            name: draft.name,
            email: draft.email,
            phone: draft.phone,
            resume_key: draft.resume_key,
            message: draft.message,
            status: ApplicationStatus::Received,
            owner: caller.subject.clone(),
        };
        Ok(self.applications.insert(&row).await?)
    }

    pub async fn get_application(&self, id: Uuid) -> ApiResult<JobApplication> {
        self.applications
            .get(id)
            .await?
            .ok_or_else(|| ApiError::not_found("application not found"))
    }

    /// Applicants for a posting are visible to the posting owner and admins.
    pub async fn list_applications_for_job(
        &self,
        caller: &Caller,
        job_id: Uuid,
        page: PageQuery,
    ) -> ApiResult<Page<JobApplication>> {
        let job = self.get_job(job_id).await?;
        authorize_owner(caller, &job.owner)?;

        let filter = ApplicationFilter {
            job_id: Some(job_id),
            ..Default::default()
        };
        Ok(self.applications.list(&filter, page).await?)
    }

    /// Unscoped application listing for the admin review queue.
    pub async fn list_applications(
        &self,
        filter: &ApplicationFilter,
        page: PageQuery,
    ) -> ApiResult<Page<JobApplication>> {
        Ok(self.applications.list(filter, page).await?)
    }

    pub async fn list_own_applications(
        &self,
        caller: &Caller,
        page: PageQuery,
    ) -> ApiResult<Page<JobApplication>> {
        let filter = ApplicationFilter {
            owner: Some(caller.subject.clone()),
            ..Default::default()
        };
        Ok(self.applications.list(&filter, page).await?)
    }

    pub async fn update_application(
        &self,
        caller: &Caller,
        id: Uuid,
        mut patch: ApplicationPatch,
    ) -> ApiResult<JobApplication> {
        let application = self.get_application(id).await?;
        let access = authorize_owner(caller, &application.owner)?;
        if access == OwnerAccess::Owner {
            patch.restrict_to_owner();
        }
        if let Some(ref key) = patch.resume_key {
            balcao_storage::validate_key(key)
                .map_err(|e| ApiError::validation(e.to_string()))?;
        }

        self.applications
            .update(id, &patch)
            .await?
            .ok_or_else(|| ApiError::not_found("application not found"))
    }

    /// Moderation: move an application through review.
    pub async fn review_application(
        &self,
        id: Uuid,
        status: ApplicationStatus,
    ) -> ApiResult<JobApplication> {
        self.applications
            .set_status(id, status)
            .await?
            .ok_or_else(|| ApiError::not_found("application not found"))
    }

    pub async fn delete_application(&self, caller: &Caller, id: Uuid) -> ApiResult<()> {
        let application = self.get_application(id).await?;
        authorize_owner(caller, &application.owner)?;
        self.applications.delete(id).await?;
        Ok(())
    }
}
