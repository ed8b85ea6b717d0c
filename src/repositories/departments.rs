// src/repositories/departments.rs
use async_trait::async_trait;
use sqlx::SqlitePool;
use crate::error::{ApiError, ApiResult};
use crate::models::{Department, DepartmentRequest, PatchDepartmentRequest};
use super::{ensure_unique, new_id, CrudRepository};

pub struct DepartmentRepository;

impl DepartmentRepository {
    async fn ensure_name_free(
        pool: &SqlitePool,
        name: &str,
        exclude_id: Option<&str>,
    ) -> ApiResult<()> {
        ensure_unique(
            pool,
            "departments",
            "name",
            name,
            exclude_id,
            &format!("Department with name '{}' already exists", name),
        )
        .await
    }
}

#[async_trait]
impl CrudRepository for DepartmentRepository {
    type Row = Department;
    type View = Department;
    type Write = DepartmentRequest;
    type Patch = PatchDepartmentRequest;

    fn label(&self) -> &'static str {
        "Department"
    }

    fn table_name(&self) -> &'static str {
        "departments"
    }

    fn default_order(&self) -> &'static str {
        "name ASC"
    }

    async fn insert(&self, pool: &SqlitePool, data: DepartmentRequest) -> ApiResult<String> {
        let name = data.name.trim().to_string();
        Self::ensure_name_free(pool, &name, None).await?;

        let id = new_id();
        sqlx::query("INSERT INTO departments (id, name, location) VALUES (?, ?, ?)")
            .bind(&id)
            .bind(&name)
            .bind(data.location.trim())
            .execute(pool)
            .await?;

        log::info!("Department created: {} ({})", name, id);
        Ok(id)
    }

    async fn replace(&self, pool: &SqlitePool, id: &str, data: DepartmentRequest) -> ApiResult<()> {
        let name = data.name.trim().to_string();
        Self::ensure_name_free(pool, &name, Some(id)).await?;

        let result = sqlx::query("UPDATE departments SET name = ?, location = ? WHERE id = ?")
            .bind(&name)
            .bind(data.location.trim())
            .bind(id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::not_found(self.label()));
        }
        Ok(())
    }

    fn merge(&self, existing: Department, patch: PatchDepartmentRequest) -> DepartmentRequest {
        DepartmentRequest::merged(existing, patch)
    }

    fn project(&self, row: Department) -> Department {
        row
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::memory_pool;

    fn request(name: &str) -> DepartmentRequest {
        DepartmentRequest { name: name.to_string(), location: "Block A".to_string() }
    }

    #[actix_rt::test]
    async fn test_departments_listed_by_name() {
        let pool = memory_pool().await;
        let repo = DepartmentRepository;
        repo.insert(&pool, request("Pediatrics")).await.unwrap();
        repo.insert(&pool, request("Cardiology")).await.unwrap();

        let names: Vec<String> = repo.fetch_all(&pool).await.unwrap()
            .into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["Cardiology", "Pediatrics"]);
    }

    #[actix_rt::test]
    async fn test_duplicate_name_conflicts() {
        let pool = memory_pool().await;
        let repo = DepartmentRepository;
        let id = repo.insert(&pool, request("Cardiology")).await.unwrap();

        let err = repo.insert(&pool, request("Cardiology")).await.unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));

        // Renaming a department to its own name is not a conflict.
        repo.replace(&pool, &id, request("Cardiology")).await.unwrap();
    }

    #[actix_rt::test]
    async fn test_replace_missing_is_not_found() {
        let pool = memory_pool().await;
        let err = DepartmentRepository.replace(&pool, "nope", request("X")).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }
}
