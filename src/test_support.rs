// src/test_support.rs
//! Shared fixtures for handler and repository tests.

use std::str::FromStr;
use std::sync::Arc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use crate::config::Config;
use crate::AppState;

/// Fresh in-memory database with the schema applied. A single connection
/// keeps every query on the same memory database.
pub async fn memory_pool() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .unwrap();
    crate::db::run_migrations(&pool).await.unwrap();
    pool
}

pub async fn app_state() -> Arc<AppState> {
    Arc::new(AppState {
        db_pool: memory_pool().await,
        config: Config::default(),
    })
}

/// Builds an initialised test service with every API route registered.
macro_rules! test_app {
    ($state:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .wrap(actix_web::middleware::NormalizePath::trim())
                .app_data(actix_web::web::Data::new($state.clone()))
                .app_data(crate::error::json_config(1024 * 1024))
                .configure(crate::routes::configure),
        )
        .await
    };
}

pub(crate) use test_app;
