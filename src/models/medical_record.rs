// src/models/medical_record.rs
use serde::{Deserialize, Serialize};
use validator::Validate;
use chrono::{DateTime, Utc};
use crate::models::wire::nullable;
use crate::models::AccountSummary;

/// Medical record joined with its author's account, if any.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct MedicalRecord {
    pub id: String,
    pub patient_id: String,
    pub notes: String,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
    #[sqlx(default)]
    pub author_username: Option<String>,
    #[sqlx(default)]
    pub author_first_name: Option<String>,
    #[sqlx(default)]
    pub author_last_name: Option<String>,
    #[sqlx(default)]
    pub author_email: Option<String>,
}

impl MedicalRecord {
    pub fn author(&self) -> Option<AccountSummary> {
        let id = self.created_by.clone()?;
        Some(AccountSummary {
            id,
            username: self.author_username.clone().unwrap_or_default(),
            first_name: self.author_first_name.clone().unwrap_or_default(),
            last_name: self.author_last_name.clone().unwrap_or_default(),
            email: self.author_email.clone().unwrap_or_default(),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct MedicalRecordResponse {
    pub id: String,
    pub patient: String,
    pub notes: String,
    pub created_by: Option<AccountSummary>,
    pub created_at: DateTime<Utc>,
}

impl From<MedicalRecord> for MedicalRecordResponse {
    fn from(r: MedicalRecord) -> Self {
        let created_by = r.author();
        Self {
            id: r.id,
            patient: r.patient_id,
            notes: r.notes,
            created_by,
            created_at: r.created_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, Clone)]
pub struct MedicalRecordRequest {
    #[validate(length(min = 1, message = "Patient is required"))]
    pub patient: String,

    #[validate(length(min = 1, max = 10000, message = "Notes must be between 1 and 10000 characters"))]
    pub notes: String,

    pub created_by: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct PatchMedicalRecordRequest {
    #[validate(length(min = 1, message = "Patient is required"))]
    pub patient: Option<String>,

    #[validate(length(min = 1, max = 10000, message = "Notes must be between 1 and 10000 characters"))]
    pub notes: Option<String>,

    #[serde(default, deserialize_with = "nullable")]
    pub created_by: Option<Option<String>>,
}

impl MedicalRecordRequest {
    pub fn merged(existing: MedicalRecord, patch: PatchMedicalRecordRequest) -> Self {
        Self {
            patient: patch.patient.unwrap_or(existing.patient_id),
            notes: patch.notes.unwrap_or(existing.notes),
            created_by: patch.created_by.unwrap_or(existing.created_by),
        }
    }
}
