//! Blog handlers: posts, categories, tags.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use balcao_models::{BlogPost, Category, Page, PageQuery, PostPatch, PostStatus, Tag};
use balcao_postgrest::PostFilter;

use crate::auth::permission::{LABEL_ADMIN, LABEL_SELF};
use crate::auth::Caller;
use crate::error::{ApiError, ApiResult};
use crate::security::sanitize_string;
use crate::services::blog::PostDraft;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[serde(rename = "titulo")]
    #[validate(length(min = 3, max = 200))]
    pub title: String,
    #[serde(rename = "conteudo")]
    #[validate(length(min = 10))]
    pub body: String,
    #[serde(rename = "categoria_id", default)]
    pub category_id: Option<Uuid>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateLookupRequest {
    #[serde(rename = "nome")]
    #[validate(length(min = 2, max = 60))]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct PostListParams {
    #[serde(rename = "categoria_id", default)]
    pub category_id: Option<Uuid>,
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(rename = "busca", default)]
    pub search: Option<String>,
}

/// Public feed: published posts only.
pub async fn list_posts(
    State(state): State<AppState>,
    Query(params): Query<PostListParams>,
    Query(page): Query<PageQuery>,
) -> ApiResult<Json<Page<BlogPost>>> {
    let filter = PostFilter {
        status: Some(PostStatus::Published),
        category_id: params.category_id,
        tag: params.tag,
        search: params.search.as_deref().map(sanitize_string),
        author: None,
    };
    let posts = state.blog.list_posts(&filter, page).await?;
    Ok(Json(posts))
}

pub async fn get_post_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Json<BlogPost>> {
    let post = state.blog.get_published_by_slug(&slug).await?;
    Ok(Json(post))
}

/// Editors are admin accounts; drafts are created here, published via the
/// moderation endpoint.
pub async fn create_post(
    State(state): State<AppState>,
    caller: Caller,
    Json(request): Json<CreatePostRequest>,
) -> ApiResult<(StatusCode, Json<BlogPost>)> {
    state.permissions.require(&caller, LABEL_ADMIN)?;
    request
        .validate()
        .map_err(|e| ApiError::validation(e.to_string()))?;

    let draft = PostDraft {
        title: sanitize_string(&request.title),
        body: sanitize_string(&request.body),
        category_id: request.category_id,
        tags: request.tags,
    };

    let post = state.blog.create_post(&caller, draft).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

pub async fn update_post(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<Uuid>,
    Json(patch): Json<PostPatch>,
) -> ApiResult<Json<BlogPost>> {
    state.permissions.require(&caller, LABEL_SELF)?;
    let post = state.blog.update_post(&caller, id, patch).await?;
    Ok(Json(post))
}

pub async fn delete_post(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.permissions.require(&caller, LABEL_SELF)?;
    state.blog.delete_post(&caller, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// -----------------------------------------------------------------------------
// Categories and tags
// -----------------------------------------------------------------------------

pub async fn list_categories(State(state): State<AppState>) -> ApiResult<Json<Vec<Category>>> {
    let categories = state.blog.list_categories().await?;
    Ok(Json(categories))
}

pub async fn create_category(
    State(state): State<AppState>,
    caller: Caller,
    Json(request): Json<CreateLookupRequest>,
) -> ApiResult<(StatusCode, Json<Category>)> {
    state.permissions.require(&caller, LABEL_ADMIN)?;
    request
        .validate()
        .map_err(|e| ApiError::validation(e.to_string()))?;

    let category = state.blog.create_category(&request.name).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn delete_category(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.permissions.require(&caller, LABEL_ADMIN)?;
    state.blog.delete_category(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_tags(State(state): State<AppState>) -> ApiResult<Json<Vec<Tag>>> {
    let tags = state.blog.list_tags().await?;
    Ok(Json(tags))
}

pub async fn create_tag(
    State(state): State<AppState>,
    caller: Caller,
    Json(request): Json<CreateLookupRequest>,
) -> ApiResult<(StatusCode, Json<Tag>)> {
    state.permissions.require(&caller, LABEL_ADMIN)?;
    request
        .validate()
        .map_err(|e| ApiError::validation(e.to_string()))?;

    let tag = state.blog.create_tag(&request.name).await?;
    Ok((StatusCode::CREATED, Json(tag)))
}

pub async fn delete_tag(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.permissions.require(&caller, LABEL_ADMIN)?;
    state.blog.delete_tag(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
