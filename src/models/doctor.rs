// src/models/doctor.rs
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use validator::Validate;
use chrono::{DateTime, Utc};
use crate::models::wire::nullable;
use crate::projection::{self, AccountName};
use crate::validation::not_blank;

// === ENUMS ===

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DoctorAvailability {
    Available,
    Unavailable,
    OnLeave,
}

impl Default for DoctorAvailability {
    fn default() -> Self {
        DoctorAvailability::Available
    }
}

impl DoctorAvailability {
    pub const CHOICES: &'static [&'static str] = &["available", "unavailable", "on_leave"];
}

// === DOCTOR ===

/// Doctor row joined with its linked account and department.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Doctor {
    pub id: String,
    pub user_id: Option<String>,
    pub department_id: Option<String>,
    pub specialization: String,
    pub experience: i64,
    pub phone: String,
    pub availability: String,
    pub rating: f64,
    pub patients: i64,
    pub created_at: DateTime<Utc>,
    #[sqlx(default)]
    pub account_first_name: Option<String>,
    #[sqlx(default)]
    pub account_last_name: Option<String>,
    #[sqlx(default)]
    pub account_email: Option<String>,
    #[sqlx(default)]
    pub department_name: Option<String>,
}

impl Doctor {
    pub fn account(&self) -> Option<AccountName<'_>> {
        match (&self.account_first_name, &self.account_last_name) {
            (Some(first_name), Some(last_name)) => Some(AccountName { first_name, last_name }),
            _ => None,
        }
    }

    /// Account holder's name, or the generic doctor label without an account.
    pub fn name(&self) -> String {
        match self.account() {
            Some(account) => projection::full_name(account),
            None => projection::doctor_label(None, self.department_name.as_deref()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DoctorResponse {
    pub id: String,
    pub user: Option<String>,
    pub name: String,
    pub email: Option<String>,
    pub department: Option<String>,
    pub department_name: Option<String>,
    pub specialization: String,
    pub experience: i64,
    pub phone: String,
    pub availability: String,
    pub patients: i64,
    pub rating: f64,
}

impl From<Doctor> for DoctorResponse {
    fn from(d: Doctor) -> Self {
        let name = d.name();
        Self {
            id: d.id,
            user: d.user_id,
            name,
            email: d.account_email,
            department: d.department_id,
            department_name: d.department_name,
            specialization: d.specialization,
            experience: d.experience,
            phone: d.phone,
            availability: d.availability,
            patients: d.patients,
            rating: d.rating,
        }
    }
}

/// Full doctor representation accepted by POST and PUT. `user_name` and
/// `user_email` describe the linked account rather than doctor columns.
#[derive(Debug, Deserialize, Validate, Clone)]
pub struct DoctorRequest {
    #[validate(length(min = 1, max = 150, message = "Name must be between 1 and 150 characters"))]
    #[validate(custom(function = "not_blank"))]
    pub user_name: String,

    #[validate(email(message = "Enter a valid email address"))]
    pub user_email: String,

    pub department: Option<String>,

    #[validate(length(max = 100, message = "Specialization cannot exceed 100 characters"))]
    pub specialization: Option<String>,

    #[validate(range(min = 0, max = 80, message = "Experience must be between 0 and 80 years"))]
    pub experience: Option<i64>,

    #[validate(length(max = 20, message = "Phone cannot exceed 20 characters"))]
    pub phone: Option<String>,

    pub availability: Option<String>,

    #[validate(range(min = 0.0, max = 5.0, message = "Rating must be between 0 and 5"))]
    pub rating: Option<f64>,

    #[validate(range(min = 0, message = "Patient count cannot be negative"))]
    pub patients: Option<i64>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct PatchDoctorRequest {
    #[validate(length(min = 1, max = 150, message = "Name must be between 1 and 150 characters"))]
    pub user_name: Option<String>,

    #[validate(email(message = "Enter a valid email address"))]
    pub user_email: Option<String>,

    #[serde(default, deserialize_with = "nullable")]
    pub department: Option<Option<String>>,

    #[validate(length(max = 100, message = "Specialization cannot exceed 100 characters"))]
    pub specialization: Option<String>,

    #[validate(range(min = 0, max = 80, message = "Experience must be between 0 and 80 years"))]
    pub experience: Option<i64>,

    #[validate(length(max = 20, message = "Phone cannot exceed 20 characters"))]
    pub phone: Option<String>,

    pub availability: Option<String>,

    #[validate(range(min = 0.0, max = 5.0, message = "Rating must be between 0 and 5"))]
    pub rating: Option<f64>,

    #[validate(range(min = 0, message = "Patient count cannot be negative"))]
    pub patients: Option<i64>,
}

impl DoctorRequest {
    pub fn merged(existing: Doctor, patch: PatchDoctorRequest) -> Self {
        let current_name = existing.account().map(projection::full_name).unwrap_or_default();
        Self {
            user_name: patch.user_name.unwrap_or(current_name),
            user_email: patch.user_email.or(existing.account_email).unwrap_or_default(),
            department: patch.department.unwrap_or(existing.department_id),
            specialization: Some(patch.specialization.unwrap_or(existing.specialization)),
            experience: Some(patch.experience.unwrap_or(existing.experience)),
            phone: Some(patch.phone.unwrap_or(existing.phone)),
            availability: Some(patch.availability.unwrap_or(existing.availability)),
            rating: Some(patch.rating.unwrap_or(existing.rating)),
            patients: Some(patch.patients.unwrap_or(existing.patients)),
        }
    }
}

/// Splits a full name at the first space: the first token becomes the first
/// name, everything after it the last name (empty for a single token).
pub fn split_full_name(full_name: &str) -> (String, String) {
    match full_name.trim().split_once(' ') {
        Some((first, rest)) => (first.to_string(), rest.to_string()),
        None => (full_name.trim().to_string(), String::new()),
    }
}
