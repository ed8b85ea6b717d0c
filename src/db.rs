// src/db.rs - Schema bootstrap and pool setup

use std::str::FromStr;
use std::time::Duration;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use anyhow::{Context, Result};
use crate::config::DatabaseConfig;

pub async fn create_database_pool(db_config: &DatabaseConfig) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&db_config.url)
        .with_context(|| format!("Invalid database url: {}", db_config.url))?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(db_config.max_connections)
        .min_connections(db_config.min_connections)
        .acquire_timeout(Duration::from_secs(db_config.connect_timeout))
        .connect_with(options)
        .await
        .with_context(|| format!("Failed to open database: {}", db_config.url))?;

    Ok(pool)
}

pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(pool)
        .await?;

    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(pool)
        .await?;

    // Login identities; doctors and record authors reference these
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            username TEXT NOT NULL UNIQUE CHECK(length(username) > 0 AND length(username) <= 150),
            first_name TEXT NOT NULL DEFAULT '',
            last_name TEXT NOT NULL DEFAULT '',
            email TEXT NOT NULL DEFAULT '',
            role TEXT NOT NULL DEFAULT 'staff' CHECK(role IN ('admin', 'doctor', 'staff')),
            created_at DATETIME NOT NULL
        )
        "#,
    )
        .execute(pool)
        .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS departments (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL UNIQUE CHECK(length(name) > 0 AND length(name) <= 100),
            location TEXT NOT NULL DEFAULT '' CHECK(length(location) <= 100)
        )
        "#,
    )
        .execute(pool)
        .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS doctors (
            id TEXT PRIMARY KEY,
            user_id TEXT UNIQUE,
            department_id TEXT,
            specialization TEXT NOT NULL DEFAULT '',
            experience INTEGER NOT NULL DEFAULT 0,
            phone TEXT NOT NULL DEFAULT '',
            availability TEXT NOT NULL DEFAULT 'available' CHECK(
                availability IN ('available', 'unavailable', 'on_leave')
            ),
            rating REAL NOT NULL DEFAULT 0.0,
            patients INTEGER NOT NULL DEFAULT 0,
            created_at DATETIME NOT NULL,
            FOREIGN KEY (user_id) REFERENCES users (id) ON DELETE CASCADE,
            FOREIGN KEY (department_id) REFERENCES departments (id) ON DELETE SET NULL
        )
        "#,
    )
        .execute(pool)
        .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS patients (
            id TEXT PRIMARY KEY,
            first_name TEXT NOT NULL CHECK(length(first_name) > 0 AND length(first_name) <= 100),
            last_name TEXT NOT NULL CHECK(length(last_name) > 0 AND length(last_name) <= 100),
            dob DATE,
            gender TEXT NOT NULL DEFAULT '',
            phone TEXT NOT NULL DEFAULT '',
            email TEXT,
            address TEXT NOT NULL DEFAULT '',
            blood_type TEXT NOT NULL DEFAULT '',
            last_visit DATE,
            status TEXT NOT NULL DEFAULT 'active',
            created_at DATETIME NOT NULL,
            updated_at DATETIME NOT NULL
        )
        "#,
    )
        .execute(pool)
        .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS appointments (
            id TEXT PRIMARY KEY,
            patient_id TEXT NOT NULL,
            doctor_id TEXT,
            scheduled_at DATETIME NOT NULL,
            appointment_type TEXT NOT NULL DEFAULT '',
            reason TEXT NOT NULL DEFAULT '',
            status TEXT NOT NULL DEFAULT 'scheduled' CHECK(
                status IN ('scheduled', 'confirmed', 'completed', 'cancelled')
            ),
            created_at DATETIME NOT NULL,
            FOREIGN KEY (patient_id) REFERENCES patients (id) ON DELETE CASCADE,
            FOREIGN KEY (doctor_id) REFERENCES doctors (id) ON DELETE SET NULL
        )
        "#,
    )
        .execute(pool)
        .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS medical_records (
            id TEXT PRIMARY KEY,
            patient_id TEXT NOT NULL,
            notes TEXT NOT NULL,
            created_by TEXT,
            created_at DATETIME NOT NULL,
            FOREIGN KEY (patient_id) REFERENCES patients (id) ON DELETE CASCADE,
            FOREIGN KEY (created_by) REFERENCES users (id) ON DELETE SET NULL
        )
        "#,
    )
        .execute(pool)
        .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS inventory_items (
            id TEXT PRIMARY KEY,
            sku TEXT NOT NULL UNIQUE CHECK(length(sku) > 0 AND length(sku) <= 50),
            name TEXT NOT NULL CHECK(length(name) > 0 AND length(name) <= 200),
            category TEXT NOT NULL DEFAULT '',
            uses TEXT NOT NULL DEFAULT '',
            stock INTEGER NOT NULL DEFAULT 0,
            min_stock INTEGER NOT NULL DEFAULT 0,
            unit TEXT NOT NULL DEFAULT '',
            expiry_date DATE,
            created_at DATETIME NOT NULL,
            updated_at DATETIME NOT NULL
        )
        "#,
    )
        .execute(pool)
        .await?;

    let indexes = [
        "CREATE INDEX IF NOT EXISTS idx_doctors_department ON doctors(department_id)",
        "CREATE INDEX IF NOT EXISTS idx_appointments_patient ON appointments(patient_id)",
        "CREATE INDEX IF NOT EXISTS idx_appointments_doctor ON appointments(doctor_id)",
        "CREATE INDEX IF NOT EXISTS idx_appointments_scheduled ON appointments(scheduled_at)",
        "CREATE INDEX IF NOT EXISTS idx_records_patient ON medical_records(patient_id)",
        "CREATE INDEX IF NOT EXISTS idx_inventory_category ON inventory_items(category)",
    ];
    for statement in indexes {
        sqlx::query(statement).execute(pool).await?;
    }

    log::info!("Database schema is up to date");
    Ok(())
}
