//! Company (empresa) handlers.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use balcao_models::{Company, CompanyPatch, ListingStatus, Page, PageQuery};
use balcao_postgrest::CompanyFilter;

use crate::auth::permission::LABEL_SELF;
use crate::auth::Caller;
use crate::error::{ApiError, ApiResult};
use crate::security::sanitize_string;
use crate::services::listings::CompanyDraft;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCompanyRequest {
    #[serde(rename = "nome")]
    #[validate(length(min = 2, max = 120))]
    pub name: String,
    #[serde(rename = "descricao", default)]
    #[validate(length(max = 10000))]
    pub description: Option<String>,
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
    #[validate(length(max = 200))]
    pub website: Option<String>,
    #[serde(rename = "logo_key", default)]
    pub logo_key: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CompanyListParams {
    #[serde(rename = "cidade", default)]
    pub city: Option<String>,
    #[serde(rename = "busca", default)]
    pub search: Option<String>,
    #[serde(rename = "destaque", default)]
    pub featured: Option<bool>,
}

/// Public directory: approved listings only.
pub async fn list_companies(
    State(state): State<AppState>,
    Query(params): Query<CompanyListParams>,
    Query(page): Query<PageQuery>,
) -> ApiResult<Json<Page<Company>>> {
    let filter = CompanyFilter {
        city: params.city,
        search: params.search.as_deref().map(sanitize_string),
        featured: params.featured,
        status: Some(ListingStatus::Approved),
        owner: None,
    };
    let companies = state.listings.list_companies(&filter, page).await?;
    Ok(Json(companies))
}

pub async fn get_company(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Company>> {
    let company = state.listings.get_company(id).await?;
    Ok(Json(company))
}

/// Listings owned by the caller, any moderation status.
pub async fn list_my_companies(
    State(state): State<AppState>,
    caller: Caller,
    Query(page): Query<PageQuery>,
) -> ApiResult<Json<Page<Company>>> {
    state.permissions.require(&caller, LABEL_SELF)?;
    let filter = CompanyFilter {
        owner: Some(caller.subject.clone()),
        ..Default::default()
    };
    let companies = state.listings.list_companies(&filter, page).await?;
    Ok(Json(companies))
}

pub async fn create_company(
    State(state): State<AppState>,
    caller: Caller,
    Json(request): Json<CreateCompanyRequest>,
) -> ApiResult<(StatusCode, Json<Company>)> {
    state.permissions.require(&caller, LABEL_SELF)?;
    request
        .validate()
        .map_err(|e| ApiError::validation(e.to_string()))?;

    let draft = CompanyDraft {
        name: sanitize_string(&request.name),
        description: request.description.as_deref().map(sanitize_string),
        city: sanitize_string(&request.city),
        phone: request.phone,
        email: request.email,
        website: request.website,
        logo_key: request.logo_key,
    };

    let company = state.listings.create_company(&caller, draft).await?;
    Ok((StatusCode::CREATED, Json(company)))
}

pub async fn update_company(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<Uuid>,
    Json(patch): Json<CompanyPatch>,
) -> ApiResult<Json<Company>> {
    state.permissions.require(&caller, LABEL_SELF)?;
    let company = state.listings.update_company(&caller, id, patch).await?;
    Ok(Json(company))
}

pub async fn delete_company(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.permissions.require(&caller, LABEL_SELF)?;
    state.listings.delete_company(&caller, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
