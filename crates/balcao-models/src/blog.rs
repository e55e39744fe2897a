//! Blog models: posts, categories and tags.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Publication status of a post. Publishing is admin-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PostStatus {
    #[default]
    #[serde(rename = "rascunho")]
    Draft,
    #[serde(rename = "publicado")]
    Published,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "rascunho",
            PostStatus::Published => "publicado",
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Blog post as stored in the `posts` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogPost {
    pub id: Uuid,
    #[serde(rename = "titulo")]
    pub title: String,
    pub slug: String,
    #[serde(rename = "conteudo")]
    pub body: String,
    #[serde(rename = "categoria_id", default)]
    pub category_id: Option<Uuid>,
    /// Tag slugs attached to the post.
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub status: PostStatus,
    #[serde(rename = "publicado_em", default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(rename = "autor")]
    pub author: String,
    #[serde(rename = "criado_em")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "atualizado_em")]
    pub updated_at: DateTime<Utc>,
}

/// Insert payload for a new post.
#[derive(Debug, Clone, Serialize)]
pub struct NewPost {
    #[serde(rename = "titulo")]
    pub title: String,
    pub slug: String,
    #[serde(rename = "conteudo")]
    pub body: String,
    #[serde(rename = "categoria_id", skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Uuid>,
    pub tags: Vec<String>,
    pub status: PostStatus,
    #[serde(rename = "autor")]
    pub author: String,
}

/// Partial update for a post.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostPatch {
    #[serde(rename = "titulo", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "conteudo", skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(rename = "categoria_id", skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PostStatus>,
    #[serde(rename = "publicado_em", skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
}

impl PostPatch {
    /// Authors edit content; publication is admin-only.
    pub fn restrict_to_owner(&mut self) {
        self.status = None;
        self.published_at = None;
    }
}

/// Blog category lookup row (`categorias` table).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    #[serde(rename = "nome")]
    pub name: String,
    pub slug: String,
}

/// Tag lookup row (`tags` table).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    pub id: Uuid,
    #[serde(rename = "nome")]
    pub name: String,
    pub slug: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_post_has_no_publication_date() {
        let json = serde_json::json!({
            "id": "8f5b1f9e-6f9c-4a3e-9f3e-0c1a2b3c4d5e",
            "titulo": "Feira de empregos em marco",
            "slug": "feira-de-empregos-em-marco",
            "conteudo": "...",
            "autor": "auth0|editor",
            "criado_em": "2025-02-01T09:00:00Z",
            "atualizado_em": "2025-02-01T09:00:00Z"
        });
        let post: BlogPost = serde_json::from_value(json).unwrap();
        assert_eq!(post.status, PostStatus::Draft);
        assert!(post.published_at.is_none());
        assert!(post.tags.is_empty());
    }

    #[test]
    fn author_patch_cannot_publish() {
        let mut patch = PostPatch {
            body: Some("texto novo".to_string()),
            status: Some(PostStatus::Published),
            published_at: Some(Utc::now()),
            ..Default::default()
        };
        patch.restrict_to_owner();
        assert!(patch.status.is_none());
        assert!(patch.published_at.is_none());
        assert!(patch.body.is_some());
    }
}
