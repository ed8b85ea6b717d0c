// src/repositories/doctors.rs
//! Doctors own no name or email; both live on the linked account, which is
//! written in the same transaction as the doctor row.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Sqlite, SqlitePool, Transaction};
use crate::error::{ApiError, ApiResult};
use crate::models::{
    split_full_name, Doctor, DoctorAvailability, DoctorRequest, DoctorResponse, PatchDoctorRequest,
    UserRole,
};
use crate::validation::{FieldValidator, ValidationResult};
use super::{new_id, CrudRepository};

pub struct DoctorRepository;

/// Doctor columns after applying defaults for omitted fields.
struct DoctorColumns {
    department_id: Option<String>,
    specialization: String,
    experience: i64,
    phone: String,
    availability: String,
    rating: f64,
    patients: i64,
}

impl From<&DoctorRequest> for DoctorColumns {
    fn from(data: &DoctorRequest) -> Self {
        Self {
            department_id: data.department.clone(),
            specialization: data.specialization.clone().unwrap_or_default(),
            experience: data.experience.unwrap_or(0),
            phone: data.phone.clone().unwrap_or_default(),
            availability: data
                .availability
                .clone()
                .unwrap_or_else(|| DoctorAvailability::default().to_string()),
            rating: data.rating.unwrap_or(0.0),
            patients: data.patients.unwrap_or(0),
        }
    }
}

impl DoctorRepository {
    /// Rejects `username` if an account other than `exclude_user` holds it.
    async fn ensure_username_free(
        tx: &mut Transaction<'_, Sqlite>,
        username: &str,
        exclude_user: Option<&str>,
    ) -> ApiResult<()> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE username = ? AND id != ?")
                .bind(username)
                .bind(exclude_user.unwrap_or(""))
                .fetch_one(&mut **tx)
                .await?;

        if count > 0 {
            log::warn!("Rejected doctor account: username '{}' already exists", username);
            return Err(ApiError::conflict(&format!(
                "A user with username '{}' already exists",
                username
            )));
        }
        Ok(())
    }

    async fn create_account(
        tx: &mut Transaction<'_, Sqlite>,
        full_name: &str,
        email: &str,
    ) -> ApiResult<String> {
        let (first_name, last_name) = split_full_name(full_name);
        let user_id = new_id();

        sqlx::query(
            r#"INSERT INTO users (id, username, first_name, last_name, email, role, created_at)
               VALUES (?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&user_id)
        .bind(email)
        .bind(&first_name)
        .bind(&last_name)
        .bind(email)
        .bind(UserRole::Doctor.as_ref())
        .bind(Utc::now())
        .execute(&mut **tx)
        .await?;

        Ok(user_id)
    }
}

#[async_trait]
impl CrudRepository for DoctorRepository {
    type Row = Doctor;
    type View = DoctorResponse;
    type Write = DoctorRequest;
    type Patch = PatchDoctorRequest;

    fn label(&self) -> &'static str {
        "Doctor"
    }

    fn table_name(&self) -> &'static str {
        "doctors"
    }

    fn select_sql(&self) -> String {
        r#"SELECT d.*,
                  u.first_name AS account_first_name,
                  u.last_name AS account_last_name,
                  u.email AS account_email,
                  dep.name AS department_name
           FROM doctors d
           LEFT JOIN users u ON u.id = d.user_id
           LEFT JOIN departments dep ON dep.id = d.department_id"#
            .to_string()
    }

    fn id_column(&self) -> &'static str {
        "d.id"
    }

    fn default_order(&self) -> &'static str {
        "d.created_at ASC"
    }

    async fn check(
        &self,
        pool: &SqlitePool,
        data: &DoctorRequest,
        result: &mut ValidationResult,
    ) -> ApiResult<()> {
        FieldValidator::choice::<DoctorAvailability>(
            result,
            "availability",
            data.availability.as_deref(),
            DoctorAvailability::CHOICES,
        );
        let department = data.department.as_deref();
        FieldValidator::reference(pool, result, "department", "departments", department).await
    }

    async fn insert(&self, pool: &SqlitePool, data: DoctorRequest) -> ApiResult<String> {
        let email = data.user_email.trim().to_string();
        let columns = DoctorColumns::from(&data);

        let mut tx = pool.begin().await?;
        Self::ensure_username_free(&mut tx, &email, None).await?;
        let user_id = Self::create_account(&mut tx, &data.user_name, &email).await?;

        let id = new_id();
        sqlx::query(
            r#"INSERT INTO doctors (id, user_id, department_id, specialization, experience,
                                    phone, availability, rating, patients, created_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&id)
        .bind(&user_id)
        .bind(&columns.department_id)
        .bind(&columns.specialization)
        .bind(columns.experience)
        .bind(&columns.phone)
        .bind(&columns.availability)
        .bind(columns.rating)
        .bind(columns.patients)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        log::info!("Doctor created: {} <{}> ({})", data.user_name.trim(), email, id);
        Ok(id)
    }

    async fn replace(&self, pool: &SqlitePool, id: &str, data: DoctorRequest) -> ApiResult<()> {
        let email = data.user_email.trim().to_string();
        let columns = DoctorColumns::from(&data);

        let mut tx = pool.begin().await?;

        let linked: Option<(Option<String>,)> =
            sqlx::query_as("SELECT user_id FROM doctors WHERE id = ?")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some((user_id,)) = linked else {
            return Err(ApiError::not_found(self.label()));
        };

        Self::ensure_username_free(&mut tx, &email, user_id.as_deref()).await?;

        let user_id = match user_id {
            Some(user_id) => {
                let (first_name, last_name) = split_full_name(&data.user_name);
                sqlx::query(
                    "UPDATE users SET username = ?, first_name = ?, last_name = ?, email = ? WHERE id = ?",
                )
                .bind(&email)
                .bind(&first_name)
                .bind(&last_name)
                .bind(&email)
                .bind(&user_id)
                .execute(&mut *tx)
                .await?;
                user_id
            }
            None => Self::create_account(&mut tx, &data.user_name, &email).await?,
        };

        sqlx::query(
            r#"UPDATE doctors SET user_id = ?, department_id = ?, specialization = ?, experience = ?,
                                  phone = ?, availability = ?, rating = ?, patients = ?
               WHERE id = ?"#,
        )
        .bind(&user_id)
        .bind(&columns.department_id)
        .bind(&columns.specialization)
        .bind(columns.experience)
        .bind(&columns.phone)
        .bind(&columns.availability)
        .bind(columns.rating)
        .bind(columns.patients)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        log::info!("Doctor updated: {}", id);
        Ok(())
    }

    fn merge(&self, existing: Doctor, patch: PatchDoctorRequest) -> DoctorRequest {
        DoctorRequest::merged(existing, patch)
    }

    fn project(&self, row: Doctor) -> DoctorResponse {
        DoctorResponse::from(row)
    }
}
