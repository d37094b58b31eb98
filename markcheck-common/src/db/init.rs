//! Database initialization
//!
//! Opens (or creates) the SQLite database in the root folder and brings the
//! schema up idempotently. Safe to call on every startup.

use crate::settings::{CameraRoster, SettingValue};
use crate::verdict::Thresholds;
use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // mode=rwc: read, write, create
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await?;

    // WAL allows concurrent readers with one writer
    sqlx::query("PRAGMA journal_mode = WAL").execute(&pool).await?;

    sqlx::query("PRAGMA busy_timeout = 5000").execute(&pool).await?;

    create_schema(&pool).await?;
    init_default_settings(&pool).await?;

    Ok(pool)
}

/// Create all tables (idempotent)
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    create_inspections_table(pool).await?;
    create_detections_table(pool).await?;
    create_datasheets_table(pool).await?;
    create_system_settings_table(pool).await?;
    Ok(())
}

async fn create_inspections_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS inspections (
            id TEXT PRIMARY KEY,
            timestamp TEXT NOT NULL,
            camera_id TEXT NOT NULL,
            image_url TEXT NOT NULL,
            status TEXT NOT NULL,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_detections_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS detections (
            id TEXT PRIMARY KEY,
            inspection_id TEXT NOT NULL REFERENCES inspections(id),
            bbox_x1 REAL NOT NULL,
            bbox_y1 REAL NOT NULL,
            bbox_x2 REAL NOT NULL,
            bbox_y2 REAL NOT NULL,
            crop_url TEXT NOT NULL,
            ocr_text TEXT NOT NULL,
            ocr_confidence REAL NOT NULL,
            match_score REAL NOT NULL,
            verdict TEXT NOT NULL,
            datasheet_id TEXT,
            datasheet_excerpt TEXT,
            override_by TEXT,
            override_verdict TEXT,
            override_notes TEXT,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_detections_inspection ON detections(inspection_id)",
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_detections_verdict ON detections(verdict)")
        .execute(pool)
        .await?;

    Ok(())
}

async fn create_datasheets_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS datasheets (
            id TEXT PRIMARY KEY,
            vendor TEXT NOT NULL,
            part_number TEXT NOT NULL,
            datasheet_url TEXT NOT NULL,
            notes TEXT NOT NULL DEFAULT '',
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_system_settings_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS system_settings (
            setting_key TEXT PRIMARY KEY,
            setting_value TEXT NOT NULL,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Seed the two settings singletons when absent
pub async fn init_default_settings(pool: &SqlitePool) -> Result<()> {
    let defaults = [
        SettingValue::Thresholds(Thresholds::default()),
        SettingValue::CameraConfig(CameraRoster::default()),
    ];

    for value in defaults {
        sqlx::query(
            "INSERT INTO system_settings (setting_key, setting_value) VALUES (?, ?)
             ON CONFLICT(setting_key) DO NOTHING",
        )
        .bind(value.key())
        .bind(value.encode()?)
        .execute(pool)
        .await?;
    }

    Ok(())
}
