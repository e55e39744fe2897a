//! Professional profile (profissional) models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use crate::company::ListingStatus;

/// Professional profile as stored in the `profissionais` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Professional {
    pub id: Uuid,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "profissao")]
    pub profession: String,
    #[serde(rename = "cidade")]
    pub city: String,
    #[serde(rename = "telefone", default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub status: ListingStatus,
    #[serde(rename = "destaque", default)]
    pub featured: bool,
    #[serde(rename = "criado_por")]
    pub owner: String,
    #[serde(rename = "criado_em")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "atualizado_em")]
    pub updated_at: DateTime<Utc>,
}

/// Insert payload for a new professional profile.
#[derive(Debug, Clone, Serialize)]
pub struct NewProfessional {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "profissao")]
    pub profession: String,
    #[serde(rename = "cidade")]
    pub city: String,
    #[serde(rename = "telefone", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    pub status: ListingStatus,
    #[serde(rename = "destaque")]
    pub featured: bool,
    #[serde(rename = "criado_por")]
    pub owner: String,
}

/// Partial update for a professional profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfessionalPatch {
    #[serde(rename = "nome", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "profissao", skip_serializing_if = "Option::is_none")]
    pub profession: Option<String>,
    #[serde(rename = "cidade", skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(rename = "telefone", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ListingStatus>,
    #[serde(rename = "destaque", skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
}

impl ProfessionalPatch {
    /// Drop moderation fields from an owner-initiated update.
    pub fn restrict_to_owner(&mut self) {
        self.status = None;
        self.featured = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_defaults_to_pending() {
        let json = serde_json::json!({
            "id": "8f5b1f9e-6f9c-4a3e-9f3e-0c1a2b3c4d5e",
            "nome": "Joana Prado",
            "profissao": "Eletricista",
            "cidade": "Itajuba",
            "criado_por": "gotrue|u1",
            "criado_em": "2025-01-10T12:00:00Z",
            "atualizado_em": "2025-01-10T12:00:00Z"
        });
        let profile: Professional = serde_json::from_value(json).unwrap();
        assert_eq!(profile.status, ListingStatus::Pending);
        assert!(!profile.featured);
    }

    #[test]
    fn owner_patch_cannot_carry_moderation_fields() {
        let mut patch: ProfessionalPatch = serde_json::from_value(serde_json::json!({
            "bio": "20 anos de experiencia",
            "status": "aprovado",
            "destaque": true
        }))
        .unwrap();
        patch.restrict_to_owner();
        let value = serde_json::to_value(&patch).unwrap();
        let obj = value.as_object().unwrap();
        assert!(obj.contains_key("bio"));
        assert!(!obj.contains_key("status"));
        assert!(!obj.contains_key("destaque"));
    }
}
