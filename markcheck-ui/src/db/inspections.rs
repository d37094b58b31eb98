//! Inspection database operations
//!
//! Inspections are created by the intake flow and never updated afterwards.

use markcheck_common::db::models::Inspection;
use markcheck_common::{Error, Result};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// Fields supplied by the intake flow; id and created_at are server-assigned
#[derive(Debug, Clone)]
pub struct NewInspection {
    pub timestamp: String,
    pub camera_id: String,
    pub image_url: String,
    pub status: String,
}

/// Insert a new inspection and return the stored record
pub async fn create_inspection(pool: &SqlitePool, new: NewInspection) -> Result<Inspection> {
    let id = Uuid::new_v4().to_string();

    sqlx::query(
        r#"
        INSERT INTO inspections (id, timestamp, camera_id, image_url, status)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&new.timestamp)
    .bind(&new.camera_id)
    .bind(&new.image_url)
    .bind(&new.status)
    .execute(pool)
    .await?;

    load_inspection(pool, &id)
        .await?
        .ok_or_else(|| Error::Internal(format!("Inspection vanished after insert: {}", id)))
}

/// Load inspection by id
pub async fn load_inspection(pool: &SqlitePool, id: &str) -> Result<Option<Inspection>> {
    let row = sqlx::query(
        "SELECT id, timestamp, camera_id, image_url, status, created_at
         FROM inspections WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.map(|row| from_row(&row)).transpose()
}

/// List inspections, most recent capture first
pub async fn list_inspections(
    pool: &SqlitePool,
    limit: i64,
    offset: i64,
) -> Result<Vec<Inspection>> {
    let rows = sqlx::query(
        "SELECT id, timestamp, camera_id, image_url, status, created_at
         FROM inspections
         ORDER BY timestamp DESC
         LIMIT ? OFFSET ?",
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    rows.iter().map(from_row).collect()
}

pub async fn count_inspections(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM inspections")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Inspection> {
    Ok(Inspection {
        id: row.get("id"),
        timestamp: row.get("timestamp"),
        camera_id: row.get("camera_id"),
        image_url: row.get("image_url"),
        status: row.get("status"),
        created_at: row.get("created_at"),
    })
}
