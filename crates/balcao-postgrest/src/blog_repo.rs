//! Typed repositories for blog posts, categories and tags.

use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use balcao_models::{BlogPost, Category, NewPost, Page, PageQuery, PostPatch, PostStatus, Tag};

use crate::client::PostgrestClient;
use crate::error::PostgrestResult;
use crate::query::Query;
use crate::repos::patch_with_timestamp;

const POSTS: &str = "posts";
const CATEGORIES: &str = "categorias";
const TAGS: &str = "tags";

/// List filters for posts.
#[derive(Debug, Clone, Default)]
pub struct PostFilter {
    pub status: Option<PostStatus>,
    pub category_id: Option<Uuid>,
    pub tag: Option<String>,
    pub search: Option<String>,
    pub author: Option<String>,
}

impl PostFilter {
    fn apply(&self, mut query: Query) -> Query {
        if let Some(status) = self.status {
            query = query.eq("status", status);
        }
        if let Some(category_id) = self.category_id {
            query = query.eq("categoria_id", category_id);
        }
        if let Some(ref tag) = self.tag {
            query = query.contains("tags", tag);
        }
        if let Some(ref term) = self.search {
            query = query.search("titulo", term);
        }
        if let Some(ref author) = self.author {
            query = query.eq("autor", author);
        }
        query
    }
}

/// Repository for the `posts` table.
#[derive(Clone)]
pub struct PostRepository {
    client: PostgrestClient,
}

impl PostRepository {
    pub fn new(client: PostgrestClient) -> Self {
        Self { client }
    }

    pub async fn get(&self, id: Uuid) -> PostgrestResult<Option<BlogPost>> {
        self.client.find_by_id(POSTS, &id.to_string()).await
    }

    pub async fn find_by_slug(&self, slug: &str) -> PostgrestResult<Option<BlogPost>> {
        self.client
            .find_one(POSTS, &Query::new().eq("slug", slug))
            .await
    }

    /// Published posts order by publication date; drafts by creation date.
    pub async fn list(
        &self,
        filter: &PostFilter,
        page: PageQuery,
    ) -> PostgrestResult<Page<BlogPost>> {
        let mut query = filter.apply(Query::new());
        query = if filter.status == Some(PostStatus::Published) {
            query.order_desc("publicado_em")
        } else {
            query.order_desc("criado_em")
        };
        let (rows, total) = self
            .client
            .select_counted(POSTS, &query.paginate(page))
            .await?;
        Ok(Page::new(rows, total, page.normalized()))
    }

    pub async fn insert(&self, row: &NewPost) -> PostgrestResult<BlogPost> {
        let post: BlogPost = self.client.insert(POSTS, row).await?;
        info!("Created blog post: {} ({})", post.id, post.slug);
        Ok(post)
    }

    pub async fn update(&self, id: Uuid, patch: &PostPatch) -> PostgrestResult<Option<BlogPost>> {
        let body = patch_with_timestamp(patch)?;
        self.client.update_by_id(POSTS, &id.to_string(), &body).await
    }

    /// Publish: flips status and stamps the publication time.
    pub async fn publish(
        &self,
        id: Uuid,
        at: DateTime<Utc>,
    ) -> PostgrestResult<Option<BlogPost>> {
        let body = patch_with_timestamp(&serde_json::json!({
            "status": PostStatus::Published,
            "publicado_em": at,
        }))?;
        self.client.update_by_id(POSTS, &id.to_string(), &body).await
    }

    pub async fn delete(&self, id: Uuid) -> PostgrestResult<bool> {
        self.client.delete_by_id(POSTS, &id.to_string()).await
    }
}

/// Repository for the `categorias` lookup table.
#[derive(Clone)]
pub struct CategoryRepository {
    client: PostgrestClient,
}

impl CategoryRepository {
    pub fn new(client: PostgrestClient) -> Self {
        Self { client }
    }

    pub async fn list_all(&self) -> PostgrestResult<Vec<Category>> {
        self.client
            .select(CATEGORIES, &Query::new().order_asc("nome"))
            .await
    }

    pub async fn find_by_slug(&self, slug: &str) -> PostgrestResult<Option<Category>> {
        self.client
            .find_one(CATEGORIES, &Query::new().eq("slug", slug))
            .await
    }

    pub async fn insert(&self, name: &str, slug: &str) -> PostgrestResult<Category> {
        self.client
            .insert(
                CATEGORIES,
                &serde_json::json!({ "nome": name, "slug": slug }),
            )
            .await
    }

    pub async fn delete(&self, id: Uuid) -> PostgrestResult<bool> {
        self.client.delete_by_id(CATEGORIES, &id.to_string()).await
    }
}

/// Repository for the `tags` lookup table.
#[derive(Clone)]
pub struct TagRepository {
    client: PostgrestClient,
}

impl TagRepository {
    pub fn new(client: PostgrestClient) -> Self {
        Self { client }
    }

    pub async fn list_all(&self) -> PostgrestResult<Vec<Tag>> {
        self.client.select(TAGS, &Query::new().order_asc("nome")).await
    }

    pub async fn find_by_slug(&self, slug: &str) -> PostgrestResult<Option<Tag>> {
        self.client
            .find_one(TAGS, &Query::new().eq("slug", slug))
            .await
    }

    pub async fn insert(&self, name: &str, slug: &str) -> PostgrestResult<Tag> {
        self.client
            .insert(TAGS, &serde_json::json!({ "nome": name, "slug": slug }))
            .await
    }

    pub async fn delete(&self, id: Uuid) -> PostgrestResult<bool> {
        self.client.delete_by_id(TAGS, &id.to_string()).await
    }
}
