//! Upload passthrough: presigned PUT URLs for resumes and company logos.

use std::time::Duration;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use balcao_storage::{logo_key, resume_key};

use crate::auth::permission::LABEL_SELF;
use crate::auth::Caller;
use crate::error::{ApiError, ApiResult};
use crate::security::{is_allowed_logo_type, is_allowed_resume_type};
use crate::services::ownership::authorize_owner;
use crate::state::AppState;

/// Presigned URLs stay valid long enough for a browser upload, no longer.
const UPLOAD_URL_TTL: Duration = Duration::from_secs(900);

#[derive(Debug, Deserialize, Validate)]
pub struct PresignResumeRequest {
    #[serde(rename = "nome_arquivo")]
    #[validate(length(min = 1, max = 128))]
    pub file_name: String,
    #[serde(rename = "tipo_conteudo")]
    pub content_type: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct PresignLogoRequest {
    #[serde(rename = "empresa_id")]
    pub company_id: Uuid,
    #[serde(rename = "nome_arquivo")]
    #[validate(length(min = 1, max = 128))]
    pub file_name: String,
    #[serde(rename = "tipo_conteudo")]
    pub content_type: String,
}

#[derive(Serialize)]
pub struct PresignResponse {
    pub key: String,
    pub upload_url: String,
    pub expires_in_secs: u64,
}

pub async fn presign_resume(
    State(state): State<AppState>,
    caller: Caller,
    Json(request): Json<PresignResumeRequest>,
) -> ApiResult<Json<PresignResponse>> {
    state.permissions.require(&caller, LABEL_SELF)?;
    request
        .validate()
        .map_err(|e| ApiError::validation(e.to_string()))?;

    if !is_allowed_resume_type(&request.content_type) {
        return Err(ApiError::validation(format!(
            "content type '{}' is not accepted for resumes",
            request.content_type
        )));
    }

    let key = resume_key(&request.file_name).map_err(|e| ApiError::validation(e.to_string()))?;
    let upload_url = state
        .storage
        .presign_put(&key, &request.content_type, UPLOAD_URL_TTL)
        .await?;

    Ok(Json(PresignResponse {
        key,
        upload_url,
        expires_in_secs: UPLOAD_URL_TTL.as_secs(),
    }))
}

/// Logo uploads are scoped to a company the caller owns.
pub async fn presign_logo(
    State(state): State<AppState>,
    caller: Caller,
    Json(request): Json<PresignLogoRequest>,
) -> ApiResult<Json<PresignResponse>> {
    state.permissions.require(&caller, LABEL_SELF)?;
    request
        .validate()
        .map_err(|e| ApiError::validation(e.to_string()))?;

    if !is_allowed_logo_type(&request.content_type) {
        return Err(ApiError::validation(format!(
            "content type '{}' is not accepted for logos",
            request.content_type
        )));
    }

    let company = state.listings.get_company(request.company_id).await?;
    authorize_owner(&caller, &company.owner)?;

    let key = logo_key(company.id, &request.file_name)
        .map_err(|e| ApiError::validation(e.to_string()))?;
    let upload_url = state
        .storage
        .presign_put(&key, &request.content_type, UPLOAD_URL_TTL)
        .await?;

    Ok(Json(PresignResponse {
        key,
        upload_url,
        expires_in_secs: UPLOAD_URL_TTL.as_secs(),
    }))
}
