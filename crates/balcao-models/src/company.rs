//! Company (empresa) listing models.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Moderation status shared by company and professional listings.
///
/// Listings are created as `Pending` and only become publicly visible once
/// an administrator approves them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ListingStatus {
    #[default]
    #[serde(rename = "pendente")]
    Pending,
    #[serde(rename = "aprovado")]
    Approved,
    #[serde(rename = "recusado")]
    Rejected,
}

impl ListingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingStatus::Pending => "pendente",
            ListingStatus::Approved => "aprovado",
            ListingStatus::Rejected => "recusado",
        }
    }
}

impl fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Company record as stored in the `empresas` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    pub id: Uuid,
    #[serde(rename = "nome")]
    pub name: String,
    pub slug: String,
    #[serde(rename = "descricao", default)]
    pub description: Option<String>,
    #[serde(rename = "cidade")]
    pub city: String,
    #[serde(rename = "telefone", default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(rename = "logo_key", default)]
    pub logo_key: Option<String>,
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

/// Insert payload for a new company row.
#[derive(Debug, Clone, Serialize)]
pub struct NewCompany {
    #[serde(rename = "nome")]
    pub name: String,
    pub slug: String,
    #[serde(rename = "descricao", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "cidade")]
    pub city: String,
    #[serde(rename = "telefone", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(rename = "logo_key", skip_serializing_if = "Option::is_none")]
    pub logo_key: Option<String>,
    pub status: ListingStatus,
    #[serde(rename = "destaque")]
    pub featured: bool,
    #[serde(rename = "criado_por")]
    pub owner: String,
}

/// Partial update for a company row.
///
/// `status` and `featured` are moderation fields: non-admin updates have
/// them stripped before the patch is applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompanyPatch {
    #[serde(rename = "nome", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "descricao", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "cidade", skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(rename = "telefone", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(rename = "logo_key", skip_serializing_if = "Option::is_none")]
    pub logo_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ListingStatus>,
    #[serde(rename = "destaque", skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
}

impl CompanyPatch {
    /// Drop moderation fields from an owner-initiated update.
    pub fn restrict_to_owner(&mut self) {
        self.status = None;
        self.featured = None;
    }

    pub fn is_empty(&self) -> bool {
        serde_json::to_value(self)
            .map(|v| v.as_object().map(|o| o.is_empty()).unwrap_or(true))
            .unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn company_deserializes_portuguese_wire_names() {
        let json = serde_json::json!({
            "id": "8f5b1f9e-6f9c-4a3e-9f3e-0c1a2b3c4d5e",
            "nome": "Padaria Central",
            "slug": "padaria-central",
            "cidade": "Itajuba",
            "status": "aprovado",
            "destaque": true,
            "criado_por": "auth0|owner1",
            "criado_em": "2025-01-10T12:00:00Z",
            "atualizado_em": "2025-01-11T12:00:00Z"
        });
        let company: Company = serde_json::from_value(json).unwrap();
        assert_eq!(company.name, "Padaria Central");
        assert_eq!(company.status, ListingStatus::Approved);
        assert!(company.featured);
        assert_eq!(company.owner, "auth0|owner1");
    }

    #[test]
    fn patch_restrict_to_owner_drops_moderation_fields() {
        let mut patch = CompanyPatch {
            name: Some("Novo Nome".to_string()),
            status: Some(ListingStatus::Approved),
            featured: Some(true),
            ..Default::default()
        };
        patch.restrict_to_owner();
        assert_eq!(patch.name.as_deref(), Some("Novo Nome"));
        assert!(patch.status.is_none());
        assert!(patch.featured.is_none());
    }

    #[test]
    fn empty_patch_detected_after_stripping() {
        let mut patch = CompanyPatch {
            status: Some(ListingStatus::Approved),
            ..Default::default()
        };
        patch.restrict_to_owner();
        assert!(patch.is_empty());
    }

    #[test]
    fn patch_serializes_only_present_fields() {
        let patch = CompanyPatch {
            city: Some("Pouso Alegre".to_string()),
            ..Default::default()
        };
        let value = serde_json::to_value(&patch).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), 1);
        assert_eq!(obj["cidade"], "Pouso Alegre");
    }
}
