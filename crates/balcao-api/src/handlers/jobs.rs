//! Job posting (vaga) handlers.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use balcao_models::{ContractType, JobPatch, JobPosting, JobStatus, Page, PageQuery};
use balcao_postgrest::JobFilter;

use crate::auth::permission::LABEL_SELF;
use crate::auth::Caller;
use crate::error::{ApiError, ApiResult};
use crate::security::sanitize_string;
use crate::services::jobs::JobDraft;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateJobRequest {
    #[serde(rename = "empresa_id")]
    pub company_id: Uuid,
    #[serde(rename = "titulo")]
    #[validate(length(min = 3, max = 160))]
    pub title: String,
    #[serde(rename = "descricao")]
    #[validate(length(min = 10, max = 10000))]
    pub description: String,
    #[serde(rename = "cidade")]
    #[validate(length(min = 2, max = 80))]
    pub city: String,
    #[serde(rename = "tipo_contrato", default)]
    pub contract: ContractType,
    #[serde(rename = "salario", default)]
    #[validate(length(max = 60))]
    pub salary: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct JobListParams {
    #[serde(rename = "cidade", default)]
    pub city: Option<String>,
    #[serde(rename = "tipo_contrato", default)]
    pub contract: Option<ContractType>,
    #[serde(rename = "empresa_id", default)]
    pub company_id: Option<Uuid>,
    #[serde(rename = "busca", default)]
    pub search: Option<String>,
    #[serde(rename = "destaque", default)]
    pub featured: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct JobStatusRequest {
    pub status: JobStatus,
}

/// Public board: open postings only.
pub async fn list_jobs(
    State(state): State<AppState>,
    Query(params): Query<JobListParams>,
    Query(page): Query<PageQuery>,
) -> ApiResult<Json<Page<JobPosting>>> {
    let filter = JobFilter {
        city: params.city,
        contract: params.contract,
        company_id: params.company_id,
        search: params.search.as_deref().map(sanitize_string),
        featured: params.featured,
        status: Some(JobStatus::Open),
        owner: None,
    };
    let jobs = state.jobs.list_jobs(&filter, page).await?;
    Ok(Json(jobs))
}

pub async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<JobPosting>> {
    let job = state.jobs.get_job(id).await?;
    Ok(Json(job))
}

/// Postings owned by the caller, any lifecycle state.
pub async fn list_my_jobs(
    State(state): State<AppState>,
    caller: Caller,
    Query(page): Query<PageQuery>,
) -> ApiResult<Json<Page<JobPosting>>> {
    state.permissions.require(&caller, LABEL_SELF)?;
    let filter = JobFilter {
        owner: Some(caller.subject.clone()),
        ..Default::default()
    };
    let jobs = state.jobs.list_jobs(&filter, page).await?;
    Ok(Json(jobs))
}

pub async fn create_job(
    State(state): State<AppState>,
    caller: Caller,
    Json(request): Json<CreateJobRequest>,
) -> ApiResult<(StatusCode, Json<JobPosting>)> {
    state.permissions.require(&caller, LABEL_SELF)?;
    request
        .validate()
        .map_err(|e| ApiError::validation(e.to_string()))?;

    let draft = JobDraft {
        company_id: request.company_id,
        title: sanitize_string(&request.title),
        description: sanitize_string(&request.description),
        city: sanitize_string(&request.city),
        contract: request.contract,
        salary: request.salary,
    };

    let job = state.jobs.create_job(&caller, draft).await?;
    Ok((StatusCode::CREATED, Json(job)))
}

pub async fn update_job(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<Uuid>,
    Json(patch): Json<JobPatch>,
) -> ApiResult<Json<JobPosting>> {
    state.permissions.require(&caller, LABEL_SELF)?;
    let job = state.jobs.update_job(&caller, id, patch).await?;
    Ok(Json(job))
}

/// Lifecycle transition endpoint (draft -> open -> closed for owners).
pub async fn transition_job(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<Uuid>,
    Json(request): Json<JobStatusRequest>,
) -> ApiResult<Json<JobPosting>> {
    state.permissions.require(&caller, LABEL_SELF)?;
    let job = state.jobs.transition_job(&caller, id, request.status).await?;
    Ok(Json(job))
}

pub async fn delete_job(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.permissions.require(&caller, LABEL_SELF)?;
    state.jobs.delete_job(&caller, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
