//! Blog rules: drafts, publication and the category/tag lookups.

use chrono::Utc;
use uuid::Uuid;

use balcao_models::{
    BlogPost, Category, NewPost, Page, PageQuery, PostPatch, PostStatus, Tag,
};
use balcao_postgrest::{
    CategoryRepository, PostFilter, PostRepository, PostgrestClient, TagRepository,
};

use crate::auth::Caller;
use crate::error::{ApiError, ApiResult};
use crate::security::slugify;
use crate::services::ownership::{authorize_owner, OwnerAccess};

/// Validated post create input.
#[derive(Debug, Clone)]
pub struct PostDraft {
    pub title: String,
    pub body: String,
    pub category_id: Option<Uuid>,
    pub tags: Vec<String>,
}

#[derive(Clone)]
pub struct BlogService {
    posts: PostRepository,
    categories: CategoryRepository,
    tags: TagRepository,
}

impl BlogService {
    pub fn new(db: PostgrestClient) -> Self {
        Self {
            posts: PostRepository::new(db.clone()),
            categories: CategoryRepository::new(db.clone()),
            tags: TagRepository::new(db),
        }
    }

    // -------------------------------------------------------------------------
    // Posts
    // -------------------------------------------------------------------------

    pub async fn list_posts(
        &self,
        filter: &PostFilter,
        page: PageQuery,
    ) -> ApiResult<Page<BlogPost>> {
        Ok(self.posts.list(filter, page).await?)
    }

    pub async fn get_post(&self, id: Uuid) -> ApiResult<BlogPost> {
        self.posts
            .get(id)
            .await?
            .ok_or_else(|| ApiError::not_found("post not found"))
    }

    /// Public slug lookup: drafts stay invisible.
    pub async fn get_published_by_slug(&self, slug: &str) -> ApiResult<BlogPost> {
        match self.posts.find_by_slug(slug).await? {
            Some(post) if post.status == PostStatus::Published => Ok(post),
            _ => Err(ApiError::not_found("post not found")),
        }
    }

    /// Posts are created as drafts; publication is a separate admin action.
    pub async fn create_post(&self, caller: &Caller, draft: PostDraft) -> ApiResult<BlogPost> {
        let slug = slugify(&draft.title);
        if slug.is_empty() {
            return Err(ApiError::validation("post title yields an empty slug"));
        }
        if self.posts.find_by_slug(&slug).await?.is_some() {
            return Err(ApiError::conflict(format!(
                "a post with slug '{slug}' already exists"
            )));
        }
        if let Some(category_id) = draft.category_id {
            // Category references must resolve; tags are free-form slugs.
            let known = self
                .categories
                .list_all()
                .await?
                .iter()
                .any(|c| c.id == category_id);
            if !known {
                return Err(ApiError::validation("unknown category"));
            }
        }

        let row = NewPost {
            title: draft.title,
            slug,
            body: draft.body,
            category_id: draft.category_id,
            tags: draft.tags,
            status: PostStatus::Draft,
            author: caller.subject.clone(),
        };
        Ok(self.posts.insert(&row).await?)
    }

    pub async fn update_post(
        &self,
        caller: &Caller,
        id: Uuid,
        mut patch: PostPatch,
    ) -> ApiResult<BlogPost> {
        let post = self.get_post(id).await?;
        let access = authorize_owner(caller, &post.author)?;
        if access == OwnerAccess::Owner {
            patch.restrict_to_owner();
        }

        self.posts
            .update(id, &patch)
            .await?
            .ok_or_else(|| ApiError::not_found("post not found"))
    }

    /// Moderation: publish a draft.
    pub async fn publish_post(&self, id: Uuid) -> ApiResult<BlogPost> {
        self.posts
            .publish(id, Utc::now())
            .await?
            .ok_or_else(|| ApiError::not_found("post not found"))
    }

    pub async fn delete_post(&self, caller: &Caller, id: Uuid) -> ApiResult<()> {
        let post = self.get_post(id).await?;
        authorize_owner(caller, &post.author)?;
        self.posts.delete(id).await?;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Categories and tags
    // -------------------------------------------------------------------------

    pub async fn list_categories(&self) -> ApiResult<Vec<Category>> {
        Ok(self.categories.list_all().await?)
    }

    pub async fn create_category(&self, name: &str) -> ApiResult<Category> {
        let slug = slugify(name);
        if slug.is_empty() {
            return Err(ApiError::validation("category name yields an empty slug"));
        }
        if self.categories.find_by_slug(&slug).await?.is_some() {
            return Err(ApiError::conflict(format!(
                "a category with slug '{slug}' already exists"
            )));
        }
        Ok(self.categories.insert(name, &slug).await?)
    }

    pub async fn delete_category(&self, id: Uuid) -> ApiResult<()> {
        if !self.categories.delete(id).await? {
            return Err(ApiError::not_found("category not found"));
        }
        Ok(())
    }

    pub async fn list_tags(&self) -> ApiResult<Vec<Tag>> {
        Ok(self.tags.list_all().await?)
    }

    pub async fn create_tag(&self, name: &str) -> ApiResult<Tag> {
        let slug = slugify(name);
        if slug.is_empty() {
            return Err(ApiError::validation("tag name yields an empty slug"));
        }
        if self.tags.find_by_slug(&slug).await?.is_some() {
            return Err(ApiError::conflict(format!(
                "a tag with slug '{slug}' already exists"
            )));
        }
        Ok(self.tags.insert(name, &slug).await?)
    }

    pub async fn delete_tag(&self, id: Uuid) -> ApiResult<()> {
        if !self.tags.delete(id).await? {
            return Err(ApiError::not_found("tag not found"));
        }
        Ok(())
    }
}
