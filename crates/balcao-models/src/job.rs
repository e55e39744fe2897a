//! Job posting (vaga) models.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Contract type offered by a posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ContractType {
    #[default]
    #[serde(rename = "clt")]
    Clt,
    #[serde(rename = "pj")]
    Pj,
    #[serde(rename = "temporario")]
    Temporary,
    #[serde(rename = "estagio")]
    Internship,
}

impl ContractType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContractType::Clt => "clt",
            ContractType::Pj => "pj",
            ContractType::Temporary => "temporario",
            ContractType::Internship => "estagio",
        }
    }
}

impl FromStr for ContractType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "clt" => Ok(ContractType::Clt),
            "pj" => Ok(ContractType::Pj),
            "temporario" => Ok(ContractType::Temporary),
            "estagio" => Ok(ContractType::Internship),
            other => Err(format!("unknown contract type: {other}")),
        }
    }
}

impl fmt::Display for ContractType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle of a job posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum JobStatus {
    #[default]
    #[serde(rename = "rascunho")]
    Draft,
    #[serde(rename = "aberta")]
    Open,
    #[serde(rename = "encerrada")]
    Closed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Draft => "rascunho",
            JobStatus::Open => "aberta",
            JobStatus::Closed => "encerrada",
        }
    }

    /// Valid transitions: draft -> open -> closed, plus open -> open edits.
    pub fn can_transition_to(&self, next: JobStatus) -> bool {
        matches!(
            (self, next),
            (JobStatus::Draft, JobStatus::Open)
                | (JobStatus::Open, JobStatus::Closed)
                | (JobStatus::Draft, JobStatus::Draft)
                | (JobStatus::Open, JobStatus::Open)
                | (JobStatus::Closed, JobStatus::Closed)
        )
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Job posting as stored in the `vagas` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobPosting {
    pub id: Uuid,
    #[serde(rename = "empresa_id")]
    pub company_id: Uuid,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "descricao")]
    pub description: String,
    #[serde(rename = "cidade")]
    pub city: String,
    #[serde(rename = "tipo_contrato", default)]
    pub contract: ContractType,
    #[serde(rename = "salario", default)]
    pub salary: Option<String>,
    #[serde(default)]
    pub status: JobStatus,
    #[serde(rename = "destaque", default)]
    pub featured: bool,
    #[serde(rename = "criado_por")]
    pub owner: String,
    #[serde(rename = "criado_em")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "atualizado_em")]
    pub updated_at: DateTime<Utc>,
}

/// Insert payload for a new posting.
#[derive(Debug, Clone, Serialize)]
pub struct NewJob {
    #[serde(rename = "empresa_id")]
    pub company_id: Uuid,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "descricao")]
    pub description: String,
    #[serde(rename = "cidade")]
    pub city: String,
    #[serde(rename = "tipo_contrato")]
    pub contract: ContractType,
    #[serde(rename = "salario", skip_serializing_if = "Option::is_none")]
    pub salary: Option<String>,
    pub status: JobStatus,
    #[serde(rename = "destaque")]
    pub featured: bool,
    #[serde(rename = "criado_por")]
    pub owner: String,
}

/// Partial update for a posting.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobPatch {
    #[serde(rename = "titulo", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "descricao", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "cidade", skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(rename = "tipo_contrato", skip_serializing_if = "Option::is_none")]
    pub contract: Option<ContractType>,
    #[serde(rename = "salario", skip_serializing_if = "Option::is_none")]
    pub salary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<JobStatus>,
    #[serde(rename = "destaque", skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
}

impl JobPatch {
    /// Drop moderation fields from an owner-initiated update.
    ///
    /// Owners change status through the dedicated transition endpoint, not
    /// through the generic patch.
    pub fn restrict_to_owner(&mut self) {
        self.status = None;
        self.featured = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contract_type_round_trips_wire_values() {
        assert_eq!("temporario".parse::<ContractType>().unwrap(), ContractType::Temporary);
        assert_eq!(ContractType::Internship.as_str(), "estagio");
        assert!("freelancer".parse::<ContractType>().is_err());
    }

    #[test]
    fn job_status_transitions() {
        assert!(JobStatus::Draft.can_transition_to(JobStatus::Open));
        assert!(JobStatus::Open.can_transition_to(JobStatus::Closed));
        assert!(!JobStatus::Closed.can_transition_to(JobStatus::Open));
        assert!(!JobStatus::Draft.can_transition_to(JobStatus::Closed));
    }

    #[test]
    fn owner_patch_drops_status_and_featured() {
        let mut patch = JobPatch {
            title: Some("Vendedor".to_string()),
            status: Some(JobStatus::Open),
            featured: Some(true),
            ..Default::default()
        };
        patch.restrict_to_owner();
        assert_eq!(patch.title.as_deref(), Some("Vendedor"));
        assert!(patch.status.is_none());
        assert!(patch.featured.is_none());
    }
}
