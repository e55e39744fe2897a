//! Admin moderation handlers.
//!
//! Everything here sits behind the `admin` permission label: listing
//! approval, featuring, application review, post publication.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use balcao_models::{
    ApplicationStatus, BlogPost, Company, JobApplication, JobPosting, ListingStatus, Page,
    PageQuery, Professional,
};
use balcao_postgrest::{ApplicationFilter, CompanyFilter, ProfessionalFilter};

use crate::auth::permission::LABEL_ADMIN;
use crate::auth::Caller;
use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListingStatusRequest {
    pub status: ListingStatus,
}

#[derive(Debug, Deserialize)]
pub struct FeaturedRequest {
    #[serde(rename = "destaque")]
    pub featured: bool,
}

#[derive(Debug, Deserialize)]
pub struct ApplicationStatusRequest {
    pub status: ApplicationStatus,
}

#[derive(Debug, Deserialize)]
pub struct ModerationQueueParams {
    #[serde(default)]
    pub status: Option<ListingStatus>,
}

/// Moderation queue: companies by status (pending by default).
pub async fn list_companies_for_moderation(
    State(state): State<AppState>,
    caller: Caller,
    Query(params): Query<ModerationQueueParams>,
    Query(page): Query<PageQuery>,
) -> ApiResult<Json<Page<Company>>> {
    state.permissions.require(&caller, LABEL_ADMIN)?;
    let filter = CompanyFilter {
        status: Some(params.status.unwrap_or(ListingStatus::Pending)),
        ..Default::default()
    };
    let companies = state.listings.list_companies(&filter, page).await?;
    Ok(Json(companies))
}

pub async fn set_company_status(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<Uuid>,
    Json(request): Json<ListingStatusRequest>,
) -> ApiResult<Json<Company>> {
    state.permissions.require(&caller, LABEL_ADMIN)?;
    let company = state.listings.moderate_company(id, request.status).await?;
    info!(
        moderator = %caller.subject,
        company = %company.id,
        status = %company.status,
        "company moderated"
    );
    Ok(Json(company))
}

pub async fn set_company_featured(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<Uuid>,
    Json(request): Json<FeaturedRequest>,
) -> ApiResult<Json<Company>> {
    state.permissions.require(&caller, LABEL_ADMIN)?;
    let company = state.listings.feature_company(id, request.featured).await?;
    Ok(Json(company))
}

/// Moderation queue: professional profiles by status.
pub async fn list_professionals_for_moderation(
    State(state): State<AppState>,
    caller: Caller,
    Query(params): Query<ModerationQueueParams>,
    Query(page): Query<PageQuery>,
) -> ApiResult<Json<Page<Professional>>> {
    state.permissions.require(&caller, LABEL_ADMIN)?;
    let filter = ProfessionalFilter {
        status: Some(params.status.unwrap_or(ListingStatus::Pending)),
        ..Default::default()
    };
    let profiles = state.listings.list_professionals(&filter, page).await?;
    Ok(Json(profiles))
}

pub async fn set_professional_status(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<Uuid>,
    Json(request): Json<ListingStatusRequest>,
) -> ApiResult<Json<Professional>> {
    state.permissions.require(&caller, LABEL_ADMIN)?;
    let profile = state
        .listings
        .moderate_professional(id, request.status)
        .await?;
    info!(
        moderator = %caller.subject,
        professional = %profile.id,
        status = %profile.status,
        "professional profile moderated"
    );
    Ok(Json(profile))
}

pub async fn set_job_featured(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<Uuid>,
    Json(request): Json<FeaturedRequest>,
) -> ApiResult<Json<JobPosting>> {
    state.permissions.require(&caller, LABEL_ADMIN)?;
    let job = state.jobs.feature_job(id, request.featured).await?;
    Ok(Json(job))
}

/// Review queue: applications by status.
pub async fn list_applications_for_review(
    State(state): State<AppState>,
    caller: Caller,
    Query(page): Query<PageQuery>,
) -> ApiResult<Json<Page<JobApplication>>> {
    state.permissions.require(&caller, LABEL_ADMIN)?;
    let filter = ApplicationFilter {
        status: Some(ApplicationStatus::Received),
        ..Default::default()
    };
    let applications = state.jobs.list_applications(&filter, page).await?;
    Ok(Json(applications))
}

pub async fn review_application(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<Uuid>,
    Json(request): Json<ApplicationStatusRequest>,
) -> ApiResult<Json<JobApplication>> {
    state.permissions.require(&caller, LABEL_ADMIN)?;
    let application = state.jobs.review_application(id, request.status).await?;
    info!(
        moderator = %caller.subject,
        application = %application.id,
        status = %application.status,
        "application reviewed"
    );
    Ok(Json(application))
}

pub async fn publish_post(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<BlogPost>> {
    state.permissions.require(&caller, LABEL_ADMIN)?;
    let post = state.blog.publish_post(id).await?;
    info!(moderator = %caller.subject, post = %post.id, "post published");
    Ok(Json(post))
}

/// System info response.
#[derive(Serialize)]
pub struct SystemInfoResponse {
    pub version: String,
    pub environment: String,
}

pub async fn get_system_info(
    State(state): State<AppState>,
    caller: Caller,
) -> ApiResult<Json<SystemInfoResponse>> {
    state.permissions.require(&caller, LABEL_ADMIN)?;
    Ok(Json(SystemInfoResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
        environment: if state.config.is_production() {
            "production".to_string()
        } else {
            "development".to_string()
        },
    }))
}
