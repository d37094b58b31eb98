//! Datasheet database operations
//!
//! The one entity with a full create/update/delete lifecycle, managed from
//! the admin view. Nothing enforces that detections pointing at a datasheet
//! keep pointing at a live row; the link is advisory.

use markcheck_common::db::models::Datasheet;
use markcheck_common::{Error, Result};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// Editable datasheet fields
#[derive(Debug, Clone)]
pub struct DatasheetFields {
    pub vendor: String,
    pub part_number: String,
    pub datasheet_url: String,
    pub notes: String,
}

/// Insert a new datasheet and return the stored record
pub async fn create_datasheet(pool: &SqlitePool, fields: DatasheetFields) -> Result<Datasheet> {
    let id = Uuid::new_v4().to_string();

    sqlx::query(
        r#"
        INSERT INTO datasheets (id, vendor, part_number, datasheet_url, notes)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&fields.vendor)
    .bind(&fields.part_number)
    .bind(&fields.datasheet_url)
    .bind(&fields.notes)
    .execute(pool)
    .await?;

    load_datasheet(pool, &id)
        .await?
        .ok_or_else(|| Error::Internal(format!("Datasheet vanished after insert: {}", id)))
}

/// Load datasheet by id
pub async fn load_datasheet(pool: &SqlitePool, id: &str) -> Result<Option<Datasheet>> {
    let row = sqlx::query(
        "SELECT id, vendor, part_number, datasheet_url, notes, created_at, updated_at
         FROM datasheets WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.map(|row| from_row(&row)).transpose()
}

/// List datasheets, newest first
pub async fn list_datasheets(pool: &SqlitePool, limit: i64, offset: i64) -> Result<Vec<Datasheet>> {
    let rows = sqlx::query(
        "SELECT id, vendor, part_number, datasheet_url, notes, created_at, updated_at
         FROM datasheets
         ORDER BY created_at DESC, id DESC
         LIMIT ? OFFSET ?",
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    rows.iter().map(from_row).collect()
}

pub async fn count_datasheets(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM datasheets")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Case-insensitive substring search over vendor OR part number
///
/// SQLite's LIKE is case-insensitive for ASCII, which matches the search
/// behavior the admin view expects.
pub async fn search_datasheets(
    pool: &SqlitePool,
    query: &str,
    limit: i64,
    offset: i64,
) -> Result<Vec<Datasheet>> {
    let rows = sqlx::query(
        "SELECT id, vendor, part_number, datasheet_url, notes, created_at, updated_at
         FROM datasheets
         WHERE vendor LIKE '%' || ? || '%' OR part_number LIKE '%' || ? || '%'
         ORDER BY created_at DESC, id DESC
         LIMIT ? OFFSET ?",
    )
    .bind(query)
    .bind(query)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    rows.iter().map(from_row).collect()
}

pub async fn count_search(pool: &SqlitePool, query: &str) -> Result<i64> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM datasheets
         WHERE vendor LIKE '%' || ? || '%' OR part_number LIKE '%' || ? || '%'",
    )
    .bind(query)
    .bind(query)
    .fetch_one(pool)
    .await?;
    Ok(count)
}

/// Update all editable fields, bumping updated_at
///
/// Returns the updated record, or None when the datasheet does not exist.
pub async fn update_datasheet(
    pool: &SqlitePool,
    id: &str,
    fields: DatasheetFields,
) -> Result<Option<Datasheet>> {
    let result = sqlx::query(
        "UPDATE datasheets
         SET vendor = ?, part_number = ?, datasheet_url = ?, notes = ?,
             updated_at = CURRENT_TIMESTAMP
         WHERE id = ?",
    )
    .bind(&fields.vendor)
    .bind(&fields.part_number)
    .bind(&fields.datasheet_url)
    .bind(&fields.notes)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    load_datasheet(pool, id).await
}

/// Delete a datasheet; returns whether a row was removed
pub async fn delete_datasheet(pool: &SqlitePool, id: &str) -> Result<bool> {
    let result = sqlx::query("DELETE FROM datasheets WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Datasheet> {
    Ok(Datasheet {
        id: row.get("id"),
        vendor: row.get("vendor"),
        part_number: row.get("part_number"),
        datasheet_url: row.get("datasheet_url"),
        notes: row.get("notes"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn setup_test_db() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        markcheck_common::db::init::create_schema(&pool).await.unwrap();
        pool
    }

    fn fields(vendor: &str, part_number: &str) -> DatasheetFields {
        DatasheetFields {
            vendor: vendor.to_string(),
            part_number: part_number.to_string(),
            datasheet_url: "http://example/ds.pdf".to_string(),
            notes: String::new(),
        }
    }

    #[tokio::test]
    async fn test_create_update_delete_lifecycle() {
        let pool = setup_test_db().await;

        let created = create_datasheet(&pool, fields("AcmeSemicon", "AX-100"))
            .await
            .unwrap();

        let updated = update_datasheet(&pool, &created.id, fields("AcmeSemicon", "AX-200"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.part_number, "AX-200");

        assert!(delete_datasheet(&pool, &created.id).await.unwrap());
        assert!(load_datasheet(&pool, &created.id).await.unwrap().is_none());
        // Deleting again removes nothing
        assert!(!delete_datasheet(&pool, &created.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_update_missing_returns_none() {
        let pool = setup_test_db().await;
        let result = update_datasheet(&pool, "no-such-id", fields("V", "P"))
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_substring() {
        let pool = setup_test_db().await;

        create_datasheet(&pool, fields("AcmeSemicon", "AX-100"))
            .await
            .unwrap();
        create_datasheet(&pool, fields("Microchip", "PIC16F877"))
            .await
            .unwrap();

        let hits = search_datasheets(&pool, "acme", 50, 0).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].vendor, "AcmeSemicon");
        assert_eq!(count_search(&pool, "acme").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_search_matches_part_number_too() {
        let pool = setup_test_db().await;

        create_datasheet(&pool, fields("Microchip", "PIC16F877"))
            .await
            .unwrap();

        let hits = search_datasheets(&pool, "16f", 50, 0).await.unwrap();
        assert_eq!(hits.len(), 1);

        let misses = search_datasheets(&pool, "toshiba", 50, 0).await.unwrap();
        assert!(misses.is_empty());
    }
}
