//! Detection database operations
//!
//! Detections are written once by the intake flow; the only mutation is the
//! reviewer override, which replaces any prior override wholesale.

use markcheck_common::db::models::Detection;
use markcheck_common::verdict::Verdict;
use markcheck_common::{Error, Result};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

const DETECTION_COLUMNS: &str = "id, inspection_id, bbox_x1, bbox_y1, bbox_x2, bbox_y2, \
     crop_url, ocr_text, ocr_confidence, match_score, verdict, datasheet_id, \
     datasheet_excerpt, override_by, override_verdict, override_notes, created_at";

/// Fields supplied by the intake flow; the verdict is classified by the
/// caller before insertion and never recomputed afterwards
#[derive(Debug, Clone)]
pub struct NewDetection {
    pub inspection_id: String,
    pub bbox_x1: f64,
    pub bbox_y1: f64,
    pub bbox_x2: f64,
    pub bbox_y2: f64,
    pub crop_url: String,
    pub ocr_text: String,
    pub ocr_confidence: f64,
    pub match_score: f64,
    pub verdict: Verdict,
    pub datasheet_id: Option<String>,
    pub datasheet_excerpt: Option<String>,
}

/// A reviewer's verdict correction
#[derive(Debug, Clone)]
pub struct VerdictOverride {
    pub reviewer: String,
    pub verdict: Verdict,
    pub notes: String,
}

/// Insert a new detection and return the stored record
pub async fn create_detection(pool: &SqlitePool, new: NewDetection) -> Result<Detection> {
    let id = Uuid::new_v4().to_string();

    sqlx::query(
        r#"
        INSERT INTO detections (
            id, inspection_id, bbox_x1, bbox_y1, bbox_x2, bbox_y2,
            crop_url, ocr_text, ocr_confidence, match_score, verdict,
            datasheet_id, datasheet_excerpt
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&new.inspection_id)
    .bind(new.bbox_x1)
    .bind(new.bbox_y1)
    .bind(new.bbox_x2)
    .bind(new.bbox_y2)
    .bind(&new.crop_url)
    .bind(&new.ocr_text)
    .bind(new.ocr_confidence)
    .bind(new.match_score)
    .bind(new.verdict.as_str())
    .bind(&new.datasheet_id)
    .bind(&new.datasheet_excerpt)
    .execute(pool)
    .await?;

    load_detection(pool, &id)
        .await?
        .ok_or_else(|| Error::Internal(format!("Detection vanished after insert: {}", id)))
}

/// Load detection by id
pub async fn load_detection(pool: &SqlitePool, id: &str) -> Result<Option<Detection>> {
    let row = sqlx::query(&format!(
        "SELECT {} FROM detections WHERE id = ?",
        DETECTION_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.map(|row| from_row(&row)).transpose()
}

/// Detections belonging to one inspection, oldest first
pub async fn list_for_inspection(pool: &SqlitePool, inspection_id: &str) -> Result<Vec<Detection>> {
    let rows = sqlx::query(&format!(
        "SELECT {} FROM detections WHERE inspection_id = ? ORDER BY created_at ASC",
        DETECTION_COLUMNS
    ))
    .bind(inspection_id)
    .fetch_all(pool)
    .await?;

    rows.iter().map(from_row).collect()
}

/// Review queue: detections whose computed verdict is Suspicious, newest
/// first. Filters on the original verdict, so an overridden item stays in
/// the queue with its correction displayed.
pub async fn list_suspicious(pool: &SqlitePool, limit: i64, offset: i64) -> Result<Vec<Detection>> {
    let rows = sqlx::query(&format!(
        "SELECT {} FROM detections WHERE verdict = ?
         ORDER BY created_at DESC, id DESC
         LIMIT ? OFFSET ?",
        DETECTION_COLUMNS
    ))
    .bind(Verdict::Suspicious.as_str())
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    rows.iter().map(from_row).collect()
}

pub async fn count_suspicious(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM detections WHERE verdict = ?")
        .bind(Verdict::Suspicious.as_str())
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Apply a verdict override, replacing any prior override wholesale
///
/// The originally computed verdict column is never touched. Returns the
/// updated record, or None when the detection does not exist.
pub async fn apply_override(
    pool: &SqlitePool,
    id: &str,
    ovr: &VerdictOverride,
) -> Result<Option<Detection>> {
    let result = sqlx::query(
        "UPDATE detections
         SET override_by = ?, override_verdict = ?, override_notes = ?
         WHERE id = ?",
    )
    .bind(&ovr.reviewer)
    .bind(ovr.verdict.as_str())
    .bind(&ovr.notes)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    load_detection(pool, id).await
}

fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Detection> {
    let verdict: String = row.get("verdict");
    let override_verdict: Option<String> = row.get("override_verdict");

    Ok(Detection {
        id: row.get("id"),
        inspection_id: row.get("inspection_id"),
        bbox_x1: row.get("bbox_x1"),
        bbox_y1: row.get("bbox_y1"),
        bbox_x2: row.get("bbox_x2"),
        bbox_y2: row.get("bbox_y2"),
        crop_url: row.get("crop_url"),
        ocr_text: row.get("ocr_text"),
        ocr_confidence: row.get("ocr_confidence"),
        match_score: row.get("match_score"),
        verdict: verdict.parse()?,
        datasheet_id: row.get("datasheet_id"),
        datasheet_excerpt: row.get("datasheet_excerpt"),
        override_by: row.get("override_by"),
        override_verdict: override_verdict.map(|v| v.parse()).transpose()?,
        override_notes: row.get("override_notes"),
        created_at: row.get("created_at"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::inspections::{create_inspection, NewInspection};
    use sqlx::sqlite::SqlitePoolOptions;

    async fn setup_test_db() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::query("PRAGMA foreign_keys = ON")
            .execute(&pool)
            .await
            .unwrap();
        markcheck_common::db::init::create_schema(&pool).await.unwrap();
        pool
    }

    async fn insert_inspection(pool: &SqlitePool) -> String {
        let inspection = create_inspection(
            pool,
            NewInspection {
                timestamp: "2026-08-06T10:00:00Z".to_string(),
                camera_id: "CAM-01".to_string(),
                image_url: "http://example/image.png".to_string(),
                status: "completed".to_string(),
            },
        )
        .await
        .unwrap();
        inspection.id
    }

    fn sample(inspection_id: &str, score: f64, verdict: Verdict) -> NewDetection {
        NewDetection {
            inspection_id: inspection_id.to_string(),
            bbox_x1: 100.0,
            bbox_y1: 80.0,
            bbox_x2: 300.0,
            bbox_y2: 180.0,
            crop_url: "http://example/crop.png".to_string(),
            ocr_text: "IC4821".to_string(),
            ocr_confidence: 0.9,
            match_score: score,
            verdict,
            datasheet_id: None,
            datasheet_excerpt: Some("Marking analysis performed".to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_and_load_detection() {
        let pool = setup_test_db().await;
        let inspection_id = insert_inspection(&pool).await;

        let created = create_detection(&pool, sample(&inspection_id, 0.7, Verdict::Suspicious))
            .await
            .unwrap();

        let loaded = load_detection(&pool, &created.id).await.unwrap().unwrap();
        assert_eq!(loaded.verdict, Verdict::Suspicious);
        assert_eq!(loaded.match_score, 0.7);
        assert!(loaded.override_verdict.is_none());
        assert_eq!(loaded.effective_verdict(), Verdict::Suspicious);
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_inspection() {
        let pool = setup_test_db().await;

        let result =
            create_detection(&pool, sample("no-such-inspection", 0.7, Verdict::Suspicious)).await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_override_replaces_previous_wholesale() {
        let pool = setup_test_db().await;
        let inspection_id = insert_inspection(&pool).await;
        let detection = create_detection(&pool, sample(&inspection_id, 0.7, Verdict::Suspicious))
            .await
            .unwrap();

        apply_override(
            &pool,
            &detection.id,
            &VerdictOverride {
                reviewer: "alice".to_string(),
                verdict: Verdict::Genuine,
                notes: "ok".to_string(),
            },
        )
        .await
        .unwrap()
        .unwrap();

        let after_bob = apply_override(
            &pool,
            &detection.id,
            &VerdictOverride {
                reviewer: "bob".to_string(),
                verdict: Verdict::Counterfeit,
                notes: "recheck".to_string(),
            },
        )
        .await
        .unwrap()
        .unwrap();

        // Exactly Bob's values remain; Alice's are unrecoverable
        assert_eq!(after_bob.override_by.as_deref(), Some("bob"));
        assert_eq!(after_bob.override_verdict, Some(Verdict::Counterfeit));
        assert_eq!(after_bob.override_notes.as_deref(), Some("recheck"));
        // The computed verdict is untouched
        assert_eq!(after_bob.verdict, Verdict::Suspicious);
        assert_eq!(after_bob.effective_verdict(), Verdict::Counterfeit);
    }

    #[tokio::test]
    async fn test_override_missing_detection() {
        let pool = setup_test_db().await;

        let result = apply_override(
            &pool,
            "no-such-id",
            &VerdictOverride {
                reviewer: "alice".to_string(),
                verdict: Verdict::Genuine,
                notes: String::new(),
            },
        )
        .await
        .unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_suspicious_queue_ignores_overrides() {
        let pool = setup_test_db().await;
        let inspection_id = insert_inspection(&pool).await;

        create_detection(&pool, sample(&inspection_id, 0.9, Verdict::Genuine))
            .await
            .unwrap();
        let suspicious = create_detection(&pool, sample(&inspection_id, 0.7, Verdict::Suspicious))
            .await
            .unwrap();

        // Overriding to Genuine keeps the item in the queue: the filter is
        // on the computed verdict
        apply_override(
            &pool,
            &suspicious.id,
            &VerdictOverride {
                reviewer: "alice".to_string(),
                verdict: Verdict::Genuine,
                notes: String::new(),
            },
        )
        .await
        .unwrap();

        let queue = list_suspicious(&pool, 50, 0).await.unwrap();
        assert_eq!(queue.len(), 1);
        assert_eq!(queue[0].id, suspicious.id);
        assert_eq!(count_suspicious(&pool).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_list_for_inspection() {
        let pool = setup_test_db().await;
        let first = insert_inspection(&pool).await;
        let second = insert_inspection(&pool).await;

        create_detection(&pool, sample(&first, 0.9, Verdict::Genuine))
            .await
            .unwrap();
        create_detection(&pool, sample(&second, 0.3, Verdict::Counterfeit))
            .await
            .unwrap();

        let detections = list_for_inspection(&pool, &first).await.unwrap();
        assert_eq!(detections.len(), 1);
        assert_eq!(detections[0].verdict, Verdict::Genuine);
    }
}
