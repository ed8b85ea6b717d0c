// src/repositories/records.rs
use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use crate::error::{ApiError, ApiResult};
use crate::models::{
    MedicalRecord, MedicalRecordRequest, MedicalRecordResponse, PatchMedicalRecordRequest,
};
use crate::validation::{FieldValidator, ValidationResult};
use super::{new_id, CrudRepository};

pub struct MedicalRecordRepository;

#[async_trait]
impl CrudRepository for MedicalRecordRepository {
    type Row = MedicalRecord;
    type View = MedicalRecordResponse;
    type Write = MedicalRecordRequest;
    type Patch = PatchMedicalRecordRequest;

    fn label(&self) -> &'static str {
        "Medical record"
    }

    fn table_name(&self) -> &'static str {
        "medical_records"
    }

    fn select_sql(&self) -> String {
        r#"SELECT r.*,
                  u.username AS author_username,
                  u.first_name AS author_first_name,
                  u.last_name AS author_last_name,
                  u.email AS author_email
           FROM medical_records r
           LEFT JOIN users u ON u.id = r.created_by"#
            .to_string()
    }

    fn id_column(&self) -> &'static str {
        "r.id"
    }

    fn default_order(&self) -> &'static str {
        "r.created_at ASC"
    }

    async fn check(
        &self,
        pool: &SqlitePool,
        data: &MedicalRecordRequest,
        result: &mut ValidationResult,
    ) -> ApiResult<()> {
        if !data.patient.is_empty() {
            let patient = Some(data.patient.as_str());
            FieldValidator::reference(pool, result, "patient", "patients", patient).await?;
        }
        let author = data.created_by.as_deref();
        FieldValidator::reference(pool, result, "created_by", "users", author).await
    }

    async fn insert(&self, pool: &SqlitePool, data: MedicalRecordRequest) -> ApiResult<String> {
        let id = new_id();

        sqlx::query(
            "INSERT INTO medical_records (id, patient_id, notes, created_by, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(&data.patient)
        .bind(&data.notes)
        .bind(&data.created_by)
        .bind(Utc::now())
        .execute(pool)
        .await?;

        log::info!("Medical record created: {} for patient {}", id, data.patient);
        Ok(id)
    }

    async fn replace(
        &self,
        pool: &SqlitePool,
        id: &str,
        data: MedicalRecordRequest,
    ) -> ApiResult<()> {
        let result = sqlx::query(
            "UPDATE medical_records SET patient_id = ?, notes = ?, created_by = ? WHERE id = ?",
        )
        .bind(&data.patient)
        .bind(&data.notes)
        .bind(&data.created_by)
        .bind(id)
        .execute(pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::not_found(self.label()));
        }

        log::info!("Medical record updated: {}", id);
        Ok(())
    }

    fn merge(
        &self,
        existing: MedicalRecord,
        patch: PatchMedicalRecordRequest,
    ) -> MedicalRecordRequest {
        MedicalRecordRequest::merged(existing, patch)
    }

    fn project(&self, row: MedicalRecord) -> MedicalRecordResponse {
        MedicalRecordResponse::from(row)
    }
}
