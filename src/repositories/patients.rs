// src/repositories/patients.rs
use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use crate::error::{ApiError, ApiResult};
use crate::models::{PatchPatientRequest, Patient, PatientRequest, PatientResponse};
use crate::projection;
use super::{new_id, CrudRepository};

pub struct PatientRepository;

const DEFAULT_STATUS: &str = "active";

#[async_trait]
impl CrudRepository for PatientRepository {
    type Row = Patient;
    type View = PatientResponse;
    type Write = PatientRequest;
    type Patch = PatchPatientRequest;

    fn label(&self) -> &'static str {
        "Patient"
    }

    fn table_name(&self) -> &'static str {
        "patients"
    }

    async fn insert(&self, pool: &SqlitePool, data: PatientRequest) -> ApiResult<String> {
        let id = new_id();
        let now = Utc::now();

        sqlx::query(
            r#"INSERT INTO patients (id, first_name, last_name, dob, gender, phone, email, address,
                                     blood_type, last_visit, status, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&id)
        .bind(data.first_name.trim())
        .bind(data.last_name.trim())
        .bind(data.dob)
        .bind(data.gender.unwrap_or_default())
        .bind(data.phone.unwrap_or_default())
        .bind(&data.email)
        .bind(data.address.unwrap_or_default())
        .bind(data.blood_type.unwrap_or_default())
        .bind(data.last_visit)
        .bind(data.status.unwrap_or_else(|| DEFAULT_STATUS.to_string()))
        .bind(now)
        .bind(now)
        .execute(pool)
        .await?;

        log::info!(
            "Patient created: {} {} ({})",
            data.first_name.trim(),
            data.last_name.trim(),
            id
        );
        Ok(id)
    }

    async fn replace(&self, pool: &SqlitePool, id: &str, data: PatientRequest) -> ApiResult<()> {
        let result = sqlx::query(
            r#"UPDATE patients SET first_name = ?, last_name = ?, dob = ?, gender = ?, phone = ?,
                                   email = ?, address = ?, blood_type = ?, last_visit = ?,
                                   status = ?, updated_at = ?
               WHERE id = ?"#,
        )
        .bind(data.first_name.trim())
        .bind(data.last_name.trim())
        .bind(data.dob)
        .bind(data.gender.unwrap_or_default())
        .bind(data.phone.unwrap_or_default())
        .bind(&data.email)
        .bind(data.address.unwrap_or_default())
        .bind(data.blood_type.unwrap_or_default())
        .bind(data.last_visit)
        .bind(data.status.unwrap_or_else(|| DEFAULT_STATUS.to_string()))
        .bind(Utc::now())
        .bind(id)
        .execute(pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::not_found(self.label()));
        }

        log::info!("Patient updated: {}", id);
        Ok(())
    }

    fn merge(&self, existing: Patient, patch: PatchPatientRequest) -> PatientRequest {
        PatientRequest::merged(existing, patch)
    }

    fn project(&self, row: Patient) -> PatientResponse {
        PatientResponse::new(row, projection::today())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use crate::test_support::memory_pool;

    fn request() -> PatientRequest {
        serde_json::from_value(serde_json::json!({
            "first_name": "Wanjiku",
            "last_name": "Kamau",
            "dob": "1990-05-14",
            "phone": "+254712345678"
        }))
        .unwrap()
    }

    #[actix_rt::test]
    async fn test_insert_applies_defaults() {
        let pool = memory_pool().await;
        let repo = PatientRepository;
        let id = repo.insert(&pool, request()).await.unwrap();

        let patient = repo.fetch_existing(&pool, &id).await.unwrap();
        assert_eq!(patient.status, "active");
        assert_eq!(patient.gender, "");
        assert_eq!(patient.dob, NaiveDate::from_ymd_opt(1990, 5, 14));
        assert_eq!(patient.email, None);
    }

    #[actix_rt::test]
    async fn test_patch_clears_dob() {
        let pool = memory_pool().await;
        let repo = PatientRepository;
        let id = repo.insert(&pool, request()).await.unwrap();

        let existing = repo.fetch_existing(&pool, &id).await.unwrap();
        let patch: PatchPatientRequest = serde_json::from_str(r#"{"dob": null}"#).unwrap();
        repo.replace(&pool, &id, repo.merge(existing, patch)).await.unwrap();

        let view = repo.project(repo.fetch_existing(&pool, &id).await.unwrap());
        assert_eq!(view.age, None);
        assert_eq!(view.name, "Wanjiku Kamau");
    }

    #[actix_rt::test]
    async fn test_delete_missing_is_not_found() {
        let pool = memory_pool().await;
        let err = PatientRepository.delete(&pool, "missing").await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }
}
