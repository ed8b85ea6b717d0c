// src/repositories/mod.rs
//! Store access for each resource, behind one CRUD trait the generic
//! handlers are written against.

pub mod appointments;
pub mod departments;
pub mod doctors;
pub mod inventory;
pub mod patients;
pub mod records;
pub mod users;

pub use appointments::AppointmentRepository;
pub use departments::DepartmentRepository;
pub use doctors::DoctorRepository;
pub use inventory::InventoryRepository;
pub use patients::PatientRepository;
pub use records::MedicalRecordRepository;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::SqlitePool;
use validator::Validate;
use crate::error::{ApiError, ApiResult};
use crate::validation::ValidationResult;

/// Describes one resource: its table, row shape, wire representations and
/// the writes that persist it.
#[async_trait]
pub trait CrudRepository: Send + Sync + 'static {
    /// Stored row, possibly joined with related rows for projection.
    type Row: for<'r> sqlx::FromRow<'r, SqliteRow> + Send + Unpin;
    /// Response body for one row.
    type View: Serialize;
    /// Full representation accepted by POST and PUT.
    type Write: DeserializeOwned + Validate + Send + Sync + 'static;
    /// Partial representation accepted by PATCH.
    type Patch: DeserializeOwned + Validate + Send + 'static;

    /// Human-readable name used in messages, e.g. "Patient".
    fn label(&self) -> &'static str;

    fn table_name(&self) -> &'static str;

    fn select_sql(&self) -> String {
        format!("SELECT * FROM {}", self.table_name())
    }

    /// Qualified id column used in `select_sql` lookups.
    fn id_column(&self) -> &'static str {
        "id"
    }

    fn default_order(&self) -> &'static str {
        "created_at ASC"
    }

    async fn fetch_all(&self, pool: &SqlitePool) -> ApiResult<Vec<Self::Row>> {
        let query = format!("{} ORDER BY {}", self.select_sql(), self.default_order());
        let rows = sqlx::query_as::<_, Self::Row>(&query)
            .fetch_all(pool)
            .await?;
        Ok(rows)
    }

    async fn fetch_one(&self, pool: &SqlitePool, id: &str) -> ApiResult<Option<Self::Row>> {
        let query = format!("{} WHERE {} = ?", self.select_sql(), self.id_column());
        let row = sqlx::query_as::<_, Self::Row>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row)
    }

    async fn fetch_existing(&self, pool: &SqlitePool, id: &str) -> ApiResult<Self::Row> {
        self.fetch_one(pool, id)
            .await?
            .ok_or_else(|| ApiError::not_found(self.label()))
    }

    /// Store-backed checks (references, enumerated values) beyond the
    /// declarative `Validate` rules.
    async fn check(
        &self,
        _pool: &SqlitePool,
        _data: &Self::Write,
        _result: &mut ValidationResult,
    ) -> ApiResult<()> {
        Ok(())
    }

    /// Inserts a new row and returns its id.
    async fn insert(&self, pool: &SqlitePool, data: Self::Write) -> ApiResult<String>;

    /// Replaces every writable field of an existing row.
    async fn replace(&self, pool: &SqlitePool, id: &str, data: Self::Write) -> ApiResult<()>;

    async fn delete(&self, pool: &SqlitePool, id: &str) -> ApiResult<()> {
        let query = format!("DELETE FROM {} WHERE id = ?", self.table_name());

        let result = sqlx::query(&query)
            .bind(id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::not_found(self.label()));
        }

        Ok(())
    }

    /// Overlays a partial update on the stored row.
    fn merge(&self, existing: Self::Row, patch: Self::Patch) -> Self::Write;

    fn project(&self, row: Self::Row) -> Self::View;

    /// Runs the declarative rules and `check`, reporting every failing field
    /// at once.
    async fn validate_write(&self, pool: &SqlitePool, data: &Self::Write) -> ApiResult<()> {
        let mut result = ValidationResult::new();
        if let Err(errors) = data.validate() {
            result.merge(ValidationResult::from(errors));
        }
        self.check(pool, data, &mut result).await?;
        result.into_result()
    }
}

/// Fresh row id.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// `Conflict` unless no row other than `exclude_id` holds `value` in `column`.
pub async fn ensure_unique(
    pool: &SqlitePool,
    table: &str,
    column: &str,
    value: &str,
    exclude_id: Option<&str>,
    message: &str,
) -> ApiResult<()> {
    let query = format!(
        "SELECT COUNT(*) FROM {} WHERE {} = ? AND id != ?",
        table, column
    );
    let count: i64 = sqlx::query_scalar(&query)
        .bind(value)
        .bind(exclude_id.unwrap_or(""))
        .fetch_one(pool)
        .await?;

    if count > 0 {
        log::warn!("Rejected duplicate {}.{} = '{}'", table, column, value);
        return Err(ApiError::conflict(message));
    }
    Ok(())
}
