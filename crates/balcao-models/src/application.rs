//! Job application (candidatura) models.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Review status of an application. Changed by admins only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ApplicationStatus {
    #[default]
    #[serde(rename = "recebida")]
    Received,
    #[serde(rename = "em_analise")]
    InReview,
    #[serde(rename = "aprovada")]
    Approved,
    #[serde(rename = "recusada")]
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Received => "recebida",
            ApplicationStatus::InReview => "em_analise",
            ApplicationStatus::Approved => "aprovada",
            ApplicationStatus::Rejected => "recusada",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Application as stored in the `candidaturas` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobApplication {
    pub id: Uuid,
    #[serde(rename = "vaga_id")]
    pub job_id: Uuid,
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
    #[serde(rename = "telefone", default)]
    pub phone: Option<String>,
    /// Object-store key of the uploaded resume, if any.
    #[serde(rename = "curriculo_key", default)]
    pub resume_key: Option<String>,
    #[serde(rename = "mensagem", default)]
    pub message: Option<String>,
    #[serde(default)]
    pub status: ApplicationStatus,
    #[serde(rename = "criado_por")]
    pub owner: String,
    #[serde(rename = "criado_em")]
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a new application.
#[derive(Debug, Clone, Serialize)]
pub struct NewApplication {
    #[serde(rename = "vaga_id")]
    pub job_id: Uuid,
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
    #[serde(rename = "telefone", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(rename = "curriculo_key", skip_serializing_if = "Option::is_none")]
    pub resume_key: Option<String>,
    #[serde(rename = "mensagem", skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub status: ApplicationStatus,
    #[serde(rename = "criado_por")]
    pub owner: String,
}

/// Partial update for an application.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApplicationPatch {
    #[serde(rename = "nome", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "telefone", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(rename = "curriculo_key", skip_serializing_if = "Option::is_none")]
    pub resume_key: Option<String>,
    #[serde(rename = "mensagem", skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ApplicationStatus>,
}

impl ApplicationPatch {
    /// Applicants may fix their contact data; review status is admin-only.
    pub fn restrict_to_owner(&mut self) {
        self.status = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_uses_portuguese_wire_values() {
        assert_eq!(
            serde_json::to_string(&ApplicationStatus::InReview).unwrap(),
            "\"em_analise\""
        );
        let status: ApplicationStatus = serde_json::from_str("\"recusada\"").unwrap();
        assert_eq!(status, ApplicationStatus::Rejected);
    }

    #[test]
    fn owner_patch_cannot_change_status() {
        let mut patch = ApplicationPatch {
            phone: Some("35 99999-0000".to_string()),
            status: Some(ApplicationStatus::Approved),
            ..Default::default()
        };
        patch.restrict_to_owner();
        assert!(patch.status.is_none());
        assert!(patch.phone.is_some());
    }
}
