// src/models/patient.rs
use serde::{Deserialize, Serialize};
use validator::Validate;
use chrono::{DateTime, NaiveDate, Utc};
use crate::models::wire::nullable;
use crate::projection;
use crate::validation::not_blank;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Patient {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub dob: Option<NaiveDate>,
    pub gender: String,
    pub phone: String,
    pub email: Option<String>,
    pub address: String,
    pub blood_type: String,
    pub last_visit: Option<NaiveDate>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Patient {
    pub fn name(&self) -> String {
        projection::display_name(&self.first_name, &self.last_name)
    }

    pub fn age_on(&self, today: NaiveDate) -> Option<i32> {
        projection::age(self.dob, today)
    }
}

#[derive(Debug, Serialize)]
pub struct PatientResponse {
    #[serde(flatten)]
    pub patient: Patient,
    pub name: String,
    pub age: Option<i32>,
}

impl PatientResponse {
    pub fn new(patient: Patient, today: NaiveDate) -> Self {
        let name = patient.name();
        let age = patient.age_on(today);
        Self { patient, name, age }
    }
}

#[derive(Debug, Deserialize, Validate, Clone)]
pub struct PatientRequest {
    #[validate(length(min = 1, max = 100, message = "First name must be between 1 and 100 characters"))]
    #[validate(custom(function = "not_blank"))]
    pub first_name: String,

    #[validate(length(min = 1, max = 100, message = "Last name must be between 1 and 100 characters"))]
    #[validate(custom(function = "not_blank"))]
    pub last_name: String,

    pub dob: Option<NaiveDate>,

    #[validate(length(max = 20, message = "Gender cannot exceed 20 characters"))]
    pub gender: Option<String>,

    #[validate(length(max = 20, message = "Phone cannot exceed 20 characters"))]
    pub phone: Option<String>,

    #[validate(email(message = "Enter a valid email address"))]
    pub email: Option<String>,

    #[validate(length(max = 255, message = "Address cannot exceed 255 characters"))]
    pub address: Option<String>,

    #[validate(length(max = 10, message = "Blood type cannot exceed 10 characters"))]
    pub blood_type: Option<String>,

    pub last_visit: Option<NaiveDate>,

    #[validate(length(min = 1, max = 20, message = "Status must be between 1 and 20 characters"))]
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct PatchPatientRequest {
    #[validate(length(min = 1, max = 100, message = "First name must be between 1 and 100 characters"))]
    pub first_name: Option<String>,

    #[validate(length(min = 1, max = 100, message = "Last name must be between 1 and 100 characters"))]
    pub last_name: Option<String>,

    #[serde(default, deserialize_with = "nullable")]
    pub dob: Option<Option<NaiveDate>>,

    #[validate(length(max = 20, message = "Gender cannot exceed 20 characters"))]
    pub gender: Option<String>,

    #[validate(length(max = 20, message = "Phone cannot exceed 20 characters"))]
    pub phone: Option<String>,

    /// Checked on the merged request; `null` clears it.
    #[serde(default, deserialize_with = "nullable")]
    pub email: Option<Option<String>>,

    #[validate(length(max = 255, message = "Address cannot exceed 255 characters"))]
    pub address: Option<String>,

    #[validate(length(max = 10, message = "Blood type cannot exceed 10 characters"))]
    pub blood_type: Option<String>,

    #[serde(default, deserialize_with = "nullable")]
    pub last_visit: Option<Option<NaiveDate>>,

    #[validate(length(min = 1, max = 20, message = "Status must be between 1 and 20 characters"))]
    pub status: Option<String>,
}

impl PatientRequest {
    pub fn merged(existing: Patient, patch: PatchPatientRequest) -> Self {
        Self {
            first_name: patch.first_name.unwrap_or(existing.first_name),
            last_name: patch.last_name.unwrap_or(existing.last_name),
            dob: patch.dob.unwrap_or(existing.dob),
            gender: Some(patch.gender.unwrap_or(existing.gender)),
            phone: Some(patch.phone.unwrap_or(existing.phone)),
            email: patch.email.unwrap_or(existing.email),
            address: Some(patch.address.unwrap_or(existing.address)),
            blood_type: Some(patch.blood_type.unwrap_or(existing.blood_type)),
            last_visit: patch.last_visit.unwrap_or(existing.last_visit),
            status: Some(patch.status.unwrap_or(existing.status)),
        }
    }
}
