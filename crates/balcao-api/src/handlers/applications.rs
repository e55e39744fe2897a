//! Job application (candidatura) handlers.

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use balcao_models::{ApplicationPatch, JobApplication, Page, PageQuery};

use crate::auth::permission::LABEL_SELF;
use crate::auth::resolver::bearer_from_headers;
use crate::auth::Caller;
use crate::error::{ApiError, ApiResult};
use crate::security::sanitize_string;
use crate::services::jobs::ApplicationDraft;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct ApplyRequest {
    #[serde(rename = "nome")]
    #[validate(length(min = 2, max = 120))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[serde(rename = "telefone", default)]
    #[validate(length(max = 40))]
    pub phone: Option<String>,
    #[serde(rename = "curriculo_key", default)]
    pub resume_key: Option<String>,
    #[serde(rename = "mensagem", default)]
    #[validate(length(max = 5000))]
    pub message: Option<String>,
    /// Legacy clients send the bearer token in the body on this route.
    #[serde(default)]
    pub token: Option<String>,
}

/// Submit an application. The one route that also accepts a body token,
/// forwarded to the same resolver as every other request.
pub async fn apply_to_job(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    headers: HeaderMap,
    Json(request): Json<ApplyRequest>,
) -> ApiResult<(StatusCode, Json<JobApplication>)> {
    let token = bearer_from_headers(&headers).or_else(|| request.token.clone());
    let caller = state.authenticator.resolve(token.as_deref()).await?;
    state.permissions.require(&caller, LABEL_SELF)?;

    request
        .validate()
        .map_err(|e| ApiError::validation(e.to_string()))?;

    let draft = ApplicationDraft {
        name: sanitize_string(&request.name),
        email: request.email,
        phone: request.phone,
        resume_key: request.resume_key,
        message: request.message.as_deref().map(sanitize_string),
    };

    let application = state.jobs.apply(&caller, job_id, draft).await?;
    Ok((StatusCode::CREATED, Json(application)))
}

/// Applicants for a posting; restricted to the posting owner and admins.
pub async fn list_job_applications(
    State(state): State<AppState>,
    caller: Caller,
    Path(job_id): Path<Uuid>,
    Query(page): Query<PageQuery>,
) -> ApiResult<Json<Page<JobApplication>>> {
    state.permissions.require(&caller, LABEL_SELF)?;
    let applications = state
        .jobs
        .list_applications_for_job(&caller, job_id, page)
        .await?;
    Ok(Json(applications))
}

/// The caller's own applications.
pub async fn list_my_applications(
    State(state): State<AppState>,
    caller: Caller,
    Query(page): Query<PageQuery>,
) -> ApiResult<Json<Page<JobApplication>>> {
    state.permissions.require(&caller, LABEL_SELF)?;
    let applications = state.jobs.list_own_applications(&caller, page).await?;
    Ok(Json(applications))
}

pub async fn update_application(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<Uuid>,
    Json(patch): Json<ApplicationPatch>,
) -> ApiResult<Json<JobApplication>> {
    state.permissions.require(&caller, LABEL_SELF)?;
    let application = state.jobs.update_application(&caller, id, patch).await?;
    Ok(Json(application))
}

pub async fn delete_application(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.permissions.require(&caller, LABEL_SELF)?;
    state.jobs.delete_application(&caller, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
