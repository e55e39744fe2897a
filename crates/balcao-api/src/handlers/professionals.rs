//! Professional profile (profissional) handlers.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use balcao_models::{ListingStatus, Page, PageQuery, Professional, ProfessionalPatch};
use balcao_postgrest::ProfessionalFilter;

use crate::auth::permission::LABEL_SELF;
use crate::auth::Caller;
use crate::error::{ApiError, ApiResult};
use crate::security::sanitize_string;
use crate::services::listings::ProfessionalDraft;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateProfessionalRequest {
    #[serde(rename = "nome")]
    #[validate(length(min = 2, max = 120))]
    pub name: String,
    #[serde(rename = "profissao")]
    #[validate(length(min = 2, max = 80))]
    pub profession: String,
    #[serde(rename = "cidade")]
    #[validate(length(min = 2, max = 80))]
    pub city: String,
    #[serde(rename = "telefone", default)]
    #[validate(length(max = 40))]
    pub phone: Option<String>,
    #[serde(default)]
    #[validate(email)]
    pub email: Option<String>,
    #[serde(default)]
    #[validate(length(max = 10000))]
    pub bio: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ProfessionalListParams {
    #[serde(rename = "cidade", default)]
    pub city: Option<String>,
    #[serde(rename = "profissao", default)]
    pub profession: Option<String>,
    #[serde(rename = "busca", default)]
    pub search: Option<String>,
}

/// Public directory: approved profiles only.
pub async fn list_professionals(
    State(state): State<AppState>,
    Query(params): Query<ProfessionalListParams>,
    Query(page): Query<PageQuery>,
) -> ApiResult<Json<Page<Professional>>> {
    let filter = ProfessionalFilter {
        city: params.city,
        profession: params.profession,
        search: params.search.as_deref().map(sanitize_string),
        status: Some(ListingStatus::Approved),
    };
    let profiles = state.listings.list_professionals(&filter, page).await?;
    Ok(Json(profiles))
}

pub async fn get_professional(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Professional>> {
    let profile = state.listings.get_professional(id).await?;
    Ok(Json(profile))
}

pub async fn create_professional(
    State(state): State<AppState>,
    caller: Caller,
    Json(request): Json<CreateProfessionalRequest>,
) -> ApiResult<(StatusCode, Json<Professional>)> {
    state.permissions.require(&caller, LABEL_SELF)?;
    request
        .validate()
        .map_err(|e| ApiError::validation(e.to_string()))?;

    let draft = ProfessionalDraft {
        name: sanitize_string(&request.name),
        profession: sanitize_string(&request.profession),
        city: sanitize_string(&request.city),
        phone: request.phone,
        email: request.email,
        bio: request.bio.as_deref().map(sanitize_string),
    };

    let profile = state.listings.create_professional(&caller, draft).await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

pub async fn update_professional(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<Uuid>,
    Json(patch): Json<ProfessionalPatch>,
) -> ApiResult<Json<Professional>> {
    state.permissions.require(&caller, LABEL_SELF)?;
    let profile = state
        .listings
        .update_professional(&caller, id, patch)
        .await?;
    Ok(Json(profile))
}

pub async fn delete_professional(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.permissions.require(&caller, LABEL_SELF)?;
    state.listings.delete_professional(&caller, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
