// src/repositories/appointments.rs
use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use crate::error::{ApiError, ApiResult};
use crate::models::{
    Appointment, AppointmentRequest, AppointmentResponse, AppointmentStatus,
    PatchAppointmentRequest,
};
use crate::validation::{FieldValidator, ValidationResult};
use super::{new_id, CrudRepository};

pub struct AppointmentRepository;

impl AppointmentRepository {
    fn status(data: &AppointmentRequest) -> String {
        data.status
            .clone()
            .unwrap_or_else(|| AppointmentStatus::default().to_string())
    }
}

#[async_trait]
impl CrudRepository for AppointmentRepository {
    type Row = Appointment;
    type View = AppointmentResponse;
    type Write = AppointmentRequest;
    type Patch = PatchAppointmentRequest;

    fn label(&self) -> &'static str {
        "Appointment"
    }

    fn table_name(&self) -> &'static str {
        "appointments"
    }

    fn select_sql(&self) -> String {
        r#"SELECT a.*,
                  p.first_name AS patient_first_name,
                  p.last_name AS patient_last_name,
                  u.first_name AS doctor_account_first_name,
                  u.last_name AS doctor_account_last_name,
                  dep.name AS doctor_department_name
           FROM appointments a
           JOIN patients p ON p.id = a.patient_id
           LEFT JOIN doctors d ON d.id = a.doctor_id
           LEFT JOIN users u ON u.id = d.user_id
           LEFT JOIN departments dep ON dep.id = d.department_id"#
            .to_string()
    }

    fn id_column(&self) -> &'static str {
        "a.id"
    }

    fn default_order(&self) -> &'static str {
        "a.scheduled_at DESC"
    }

    async fn check(
        &self,
        pool: &SqlitePool,
        data: &AppointmentRequest,
        result: &mut ValidationResult,
    ) -> ApiResult<()> {
        FieldValidator::choice::<AppointmentStatus>(
            result,
            "status",
            data.status.as_deref(),
            AppointmentStatus::CHOICES,
        );
        if !data.patient.is_empty() {
            let patient = Some(data.patient.as_str());
            FieldValidator::reference(pool, result, "patient", "patients", patient).await?;
        }
        FieldValidator::reference(pool, result, "doctor", "doctors", data.doctor.as_deref()).await
    }

    async fn insert(&self, pool: &SqlitePool, data: AppointmentRequest) -> ApiResult<String> {
        let id = new_id();

        sqlx::query(
            r#"INSERT INTO appointments (id, patient_id, doctor_id, scheduled_at, appointment_type,
                                         reason, status, created_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&id)
        .bind(&data.patient)
        .bind(&data.doctor)
        .bind(data.scheduled_at)
        .bind(data.appointment_type.clone().unwrap_or_default())
        .bind(data.reason.clone().unwrap_or_default())
        .bind(Self::status(&data))
        .bind(Utc::now())
        .execute(pool)
        .await?;

        log::info!(
            "Appointment created: {} for patient {} at {}",
            id,
            data.patient,
            data.scheduled_at
        );
        Ok(id)
    }

    async fn replace(
        &self,
        pool: &SqlitePool,
        id: &str,
        data: AppointmentRequest,
    ) -> ApiResult<()> {
        let result = sqlx::query(
            r#"UPDATE appointments SET patient_id = ?, doctor_id = ?, scheduled_at = ?,
                                       appointment_type = ?, reason = ?, status = ?
               WHERE id = ?"#,
        )
        .bind(&data.patient)
        .bind(&data.doctor)
        .bind(data.scheduled_at)
        .bind(data.appointment_type.clone().unwrap_or_default())
        .bind(data.reason.clone().unwrap_or_default())
        .bind(Self::status(&data))
        .bind(id)
        .execute(pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::not_found(self.label()));
        }

        log::info!("Appointment updated: {}", id);
        Ok(())
    }

    fn merge(&self, existing: Appointment, patch: PatchAppointmentRequest) -> AppointmentRequest {
        AppointmentRequest::merged(existing, patch)
    }

    fn project(&self, row: Appointment) -> AppointmentResponse {
        AppointmentResponse::from(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::memory_pool;

    async fn seed_patient(pool: &SqlitePool) {
        sqlx::query(
            r#"INSERT INTO patients (id, first_name, last_name, created_at, updated_at)
               VALUES ('p1', 'Wanjiku', 'Kamau', datetime('now'), datetime('now'))"#,
        )
        .execute(pool)
        .await
        .unwrap();
    }

    fn request(patient: &str, scheduled_at: &str) -> AppointmentRequest {
        serde_json::from_value(serde_json::json!({
            "patient": patient,
            "scheduled_at": scheduled_at,
            "type": "Checkup",
        }))
        .unwrap()
    }

    #[actix_rt::test]
    async fn test_listed_latest_first() {
        let pool = memory_pool().await;
        seed_patient(&pool).await;
        let repo = AppointmentRepository;
        repo.insert(&pool, request("p1", "2024-01-20T09:00")).await.unwrap();
        repo.insert(&pool, request("p1", "2024-02-01T14:30")).await.unwrap();

        let rows = repo.fetch_all(&pool).await.unwrap();
        let views: Vec<AppointmentResponse> = rows.into_iter().map(|r| repo.project(r)).collect();
        assert_eq!(views[0].date, "2024-02-01");
        assert_eq!(views[0].time, "02:30 PM");
        assert_eq!(views[1].time, "09:00 AM");
        assert_eq!(views[1].patient_name, "Wanjiku Kamau");
        assert_eq!(views[1].doctor_name, None);
        assert_eq!(views[1].status, "scheduled");
    }

    #[actix_rt::test]
    async fn test_check_flags_missing_references() {
        let pool = memory_pool().await;
        let mut data = request("ghost", "2024-01-20T09:00");
        data.doctor = Some("nobody".to_string());
        data.status = Some("pending".to_string());

        let mut result = ValidationResult::new();
        AppointmentRepository.check(&pool, &data, &mut result).await.unwrap();
        assert_eq!(
            result.errors["patient"],
            vec!["Invalid pk \"ghost\" - object does not exist.".to_string()]
        );
        assert!(result.errors.contains_key("doctor"));
        assert!(result.errors.contains_key("status"));
    }

    #[actix_rt::test]
    async fn test_doctor_without_account_uses_label() {
        let pool = memory_pool().await;
        seed_patient(&pool).await;
        sqlx::query("INSERT INTO departments (id, name) VALUES ('dep1', 'Cardiology')")
            .execute(&pool).await.unwrap();
        sqlx::query(
            "INSERT INTO doctors (id, department_id, created_at) VALUES ('doc1', 'dep1', datetime('now'))",
        )
        .execute(&pool)
        .await
        .unwrap();

        let repo = AppointmentRepository;
        let mut data = request("p1", "2024-01-20T09:00");
        data.doctor = Some("doc1".to_string());
        let id = repo.insert(&pool, data).await.unwrap();

        let view = repo.project(repo.fetch_existing(&pool, &id).await.unwrap());
        assert_eq!(view.doctor_name.as_deref(), Some("Doctor - Cardiology"));
    }
}
