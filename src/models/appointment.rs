// src/models/appointment.rs
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use validator::Validate;
use chrono::{DateTime, NaiveDateTime, Utc};
use crate::models::wire::{datetime, nullable, optional_datetime};
use crate::projection::{self, AccountName};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Scheduled,
    Confirmed,
    Completed,
    Cancelled,
}

impl Default for AppointmentStatus {
    fn default() -> Self {
        AppointmentStatus::Scheduled
    }
}

impl AppointmentStatus {
    pub const CHOICES: &'static [&'static str] =
        &["scheduled", "confirmed", "completed", "cancelled"];
}

/// Appointment row joined with the patient's name and the doctor's account
/// and department, enough to project every read-only field.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Appointment {
    pub id: String,
    pub patient_id: String,
    pub doctor_id: Option<String>,
    pub scheduled_at: NaiveDateTime,
    pub appointment_type: String,
    pub reason: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    #[sqlx(default)]
    pub patient_first_name: String,
    #[sqlx(default)]
    pub patient_last_name: String,
    #[sqlx(default)]
    pub doctor_account_first_name: Option<String>,
    #[sqlx(default)]
    pub doctor_account_last_name: Option<String>,
    #[sqlx(default)]
    pub doctor_department_name: Option<String>,
}

impl Appointment {
    fn doctor_account(&self) -> Option<AccountName<'_>> {
        match (&self.doctor_account_first_name, &self.doctor_account_last_name) {
            (Some(first_name), Some(last_name)) => Some(AccountName { first_name, last_name }),
            _ => None,
        }
    }

    pub fn patient_name(&self) -> String {
        projection::display_name(&self.patient_first_name, &self.patient_last_name)
    }

    pub fn doctor_name(&self) -> Option<String> {
        projection::doctor_name(
            self.doctor_id.is_some(),
            self.doctor_account(),
            self.doctor_department_name.as_deref(),
        )
    }
}

#[derive(Debug, Serialize)]
pub struct AppointmentResponse {
    pub id: String,
    pub patient: String,
    #[serde(rename = "patientName")]
    pub patient_name: String,
    pub doctor: Option<String>,
    #[serde(rename = "doctorName")]
    pub doctor_name: Option<String>,
    pub scheduled_at: NaiveDateTime,
    pub date: String,
    pub time: String,
    #[serde(rename = "type")]
    pub appointment_type: String,
    pub reason: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<Appointment> for AppointmentResponse {
    fn from(a: Appointment) -> Self {
        let patient_name = a.patient_name();
        let doctor_name = a.doctor_name();
        Self {
            id: a.id,
            patient: a.patient_id,
            patient_name,
            doctor: a.doctor_id,
            doctor_name,
            date: projection::appointment_date(a.scheduled_at),
            time: projection::appointment_time(a.scheduled_at),
            scheduled_at: a.scheduled_at,
            appointment_type: a.appointment_type,
            reason: a.reason,
            status: a.status,
            created_at: a.created_at,
        }
    }
}

/// Writable appointment fields. The projected names, `date` and `time` are
/// not accepted; unknown keys are ignored.
#[derive(Debug, Deserialize, Validate, Clone)]
pub struct AppointmentRequest {
    #[validate(length(min = 1, message = "Patient is required"))]
    pub patient: String,

    pub doctor: Option<String>,

    #[serde(deserialize_with = "datetime")]
    pub scheduled_at: NaiveDateTime,

    #[serde(rename = "type")]
    #[validate(length(max = 100, message = "Type cannot exceed 100 characters"))]
    pub appointment_type: Option<String>,

    #[validate(length(max = 1000, message = "Reason cannot exceed 1000 characters"))]
    pub reason: Option<String>,

    pub status: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct PatchAppointmentRequest {
    #[validate(length(min = 1, message = "Patient is required"))]
    pub patient: Option<String>,

    #[serde(default, deserialize_with = "nullable")]
    pub doctor: Option<Option<String>>,

    #[serde(default, deserialize_with = "optional_datetime")]
    pub scheduled_at: Option<NaiveDateTime>,

    #[serde(rename = "type")]
    #[validate(length(max = 100, message = "Type cannot exceed 100 characters"))]
    pub appointment_type: Option<String>,

    #[validate(length(max = 1000, message = "Reason cannot exceed 1000 characters"))]
    pub reason: Option<String>,

    pub status: Option<String>,
}

impl AppointmentRequest {
    pub fn merged(existing: Appointment, patch: PatchAppointmentRequest) -> Self {
        Self {
            patient: patch.patient.unwrap_or(existing.patient_id),
            doctor: patch.doctor.unwrap_or(existing.doctor_id),
            scheduled_at: patch.scheduled_at.unwrap_or(existing.scheduled_at),
            appointment_type: Some(patch.appointment_type.unwrap_or(existing.appointment_type)),
            reason: Some(patch.reason.unwrap_or(existing.reason)),
            status: Some(patch.status.unwrap_or(existing.status)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn appointment() -> Appointment {
        Appointment {
            id: "a1".to_string(),
            patient_id: "p1".to_string(),
            doctor_id: Some("d1".to_string()),
            scheduled_at: NaiveDate::from_ymd_opt(2024, 1, 20)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
            appointment_type: "Cardiology Checkup".to_string(),
            reason: String::new(),
            status: "confirmed".to_string(),
            created_at: Utc::now(),
            patient_first_name: "Wanjiku".to_string(),
            patient_last_name: "Kamau".to_string(),
            doctor_account_first_name: Some("Njoroge".to_string()),
            doctor_account_last_name: Some("Mwangi".to_string()),
            doctor_department_name: Some("Cardiology".to_string()),
        }
    }

    #[test]
    fn test_response_projection() {
        let json = serde_json::to_value(AppointmentResponse::from(appointment())).unwrap();
        assert_eq!(json["patientName"], "Wanjiku Kamau");
        assert_eq!(json["doctorName"], "Njoroge Mwangi");
        assert_eq!(json["date"], "2024-01-20");
        assert_eq!(json["time"], "09:00 AM");
        assert_eq!(json["type"], "Cardiology Checkup");
        assert_eq!(json["patient"], "p1");
    }

    #[test]
    fn test_response_without_doctor() {
        let mut a = appointment();
        a.doctor_id = None;
        a.doctor_account_first_name = None;
        a.doctor_account_last_name = None;
        a.doctor_department_name = None;
        let json = serde_json::to_value(AppointmentResponse::from(a)).unwrap();
        assert!(json["doctor"].is_null());
        assert!(json["doctorName"].is_null());
    }

    #[test]
    fn test_request_ignores_projected_fields() {
        let request: AppointmentRequest = serde_json::from_str(
            r#"{"patient": "p1", "patientName": "Someone Else", "doctorName": "X",
                "scheduled_at": "2024-01-20T09:00", "type": "Checkup", "date": "1999-01-01"}"#,
        )
        .unwrap();
        assert_eq!(request.patient, "p1");
        assert_eq!(request.doctor, None);
        assert_eq!(request.appointment_type.as_deref(), Some("Checkup"));
        assert_eq!(projection::appointment_date(request.scheduled_at), "2024-01-20");
    }

    #[test]
    fn test_merged_clears_doctor() {
        let patch: PatchAppointmentRequest = serde_json::from_str(r#"{"doctor": null}"#).unwrap();
        let merged = AppointmentRequest::merged(appointment(), patch);
        assert_eq!(merged.doctor, None);
        assert_eq!(merged.patient, "p1");
        assert_eq!(merged.status.as_deref(), Some("confirmed"));
    }
}
