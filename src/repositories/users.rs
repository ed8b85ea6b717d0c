// src/repositories/users.rs
//! Accounts are created as a side effect of doctor writes; over HTTP they
//! are only listed.

use sqlx::SqlitePool;
use crate::error::{ApiError, ApiResult};
use crate::models::UserAccount;

pub async fn list_users(pool: &SqlitePool) -> ApiResult<Vec<UserAccount>> {
    let users = sqlx::query_as::<_, UserAccount>("SELECT * FROM users ORDER BY created_at ASC")
        .fetch_all(pool)
        .await?;
    Ok(users)
}

pub async fn get_user(pool: &SqlitePool, id: &str) -> ApiResult<UserAccount> {
    sqlx::query_as::<_, UserAccount>("SELECT * FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| ApiError::not_found("User"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::memory_pool;

    #[actix_rt::test]
    async fn test_get_user() {
        let pool = memory_pool().await;
        sqlx::query(
            r#"INSERT INTO users (id, username, first_name, last_name, email, role, created_at)
               VALUES ('u1', 'admin', 'Grace', 'Mwangi', 'admin@hospital.com', 'admin', datetime('now'))"#,
        )
        .execute(&pool)
        .await
        .unwrap();

        let user = get_user(&pool, "u1").await.unwrap();
        assert_eq!(user.first_name, "Grace");
        assert_eq!(list_users(&pool).await.unwrap().len(), 1);
        assert!(matches!(get_user(&pool, "u2").await, Err(ApiError::NotFound(_))));
    }
}
