//! Detection API: intake, review queue, and verdict overrides

use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::api::inspections::ListQuery;
use crate::db;
use crate::pagination::{paginate, PAGE_SIZE};
use crate::{ApiError, ApiResult, AppState};
use markcheck_common::db::models::Detection;
use markcheck_common::verdict::Verdict;

/// Request payload for recording a detection
///
/// Carries the external pipeline's output. The verdict is not part of the
/// payload: it is classified here, once, from the thresholds configured at
/// this moment, and never re-evaluated when thresholds change later.
#[derive(Debug, Deserialize)]
pub struct CreateDetectionRequest {
    pub inspection_id: String,
    pub bbox_x1: f64,
    pub bbox_y1: f64,
    pub bbox_x2: f64,
    pub bbox_y2: f64,
    pub crop_url: String,
    pub ocr_text: String,
    pub ocr_confidence: f64,
    pub match_score: f64,
    pub datasheet_id: Option<String>,
    pub datasheet_excerpt: Option<String>,
}

/// Request payload for a reviewer override
#[derive(Debug, Deserialize)]
pub struct OverrideRequest {
    pub reviewer: String,
    pub verdict: String,
    #[serde(default)]
    pub notes: String,
}

/// Paginated review queue response
#[derive(Debug, Serialize)]
pub struct ReviewQueueResponse {
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
    pub detections: Vec<Detection>,
}

/// POST /api/detections
pub async fn create_detection(
    State(state): State<AppState>,
    Json(payload): Json<CreateDetectionRequest>,
) -> ApiResult<Json<Detection>> {
    for (name, value) in [
        ("ocr_confidence", payload.ocr_confidence),
        ("match_score", payload.match_score),
    ] {
        if !value.is_finite() || !(0.0..=1.0).contains(&value) {
            return Err(ApiError::BadRequest(format!(
                "{} must be a fraction in [0,1], got {}",
                name, value
            )));
        }
    }

    let thresholds = db::settings::load_thresholds(&state.db).await?;
    let verdict = thresholds.classify(payload.match_score);

    let detection = db::detections::create_detection(
        &state.db,
        db::detections::NewDetection {
            inspection_id: payload.inspection_id,
            bbox_x1: payload.bbox_x1,
            bbox_y1: payload.bbox_y1,
            bbox_x2: payload.bbox_x2,
            bbox_y2: payload.bbox_y2,
            crop_url: payload.crop_url,
            ocr_text: payload.ocr_text,
            ocr_confidence: payload.ocr_confidence,
            match_score: payload.match_score,
            verdict,
            datasheet_id: payload.datasheet_id,
            datasheet_excerpt: payload.datasheet_excerpt,
        },
    )
    .await?;

    tracing::info!(
        detection_id = %detection.id,
        match_score = detection.match_score,
        verdict = %detection.verdict,
        "Recorded detection"
    );

    Ok(Json(detection))
}

/// GET /api/detections/:id
pub async fn get_detection(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Detection>> {
    let detection = db::detections::load_detection(&state.db, &id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Detection not found: {}", id)))?;

    Ok(Json(detection))
}

/// GET /api/review/queue?page=N
///
/// Detections whose computed verdict is Suspicious, newest first.
pub async fn review_queue(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<ReviewQueueResponse>> {
    let total = db::detections::count_suspicious(&state.db).await?;
    let p = paginate(total, query.page);

    let detections = db::detections::list_suspicious(&state.db, PAGE_SIZE, p.offset).await?;

    Ok(Json(ReviewQueueResponse {
        total,
        page: p.page,
        page_size: PAGE_SIZE,
        total_pages: p.total_pages,
        detections,
    }))
}

/// POST /api/detections/:id/override
///
/// Attaches (or replaces) the reviewer's standing override. The computed
/// verdict stays in place so both remain visible side by side.
pub async fn override_verdict(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<OverrideRequest>,
) -> ApiResult<Json<Detection>> {
    let reviewer = payload.reviewer.trim();
    if reviewer.is_empty() {
        return Err(ApiError::BadRequest(
            "reviewer name cannot be empty".to_string(),
        ));
    }

    let verdict: Verdict = payload.verdict.parse()?;

    let detection = db::detections::apply_override(
        &state.db,
        &id,
        &db::detections::VerdictOverride {
            reviewer: reviewer.to_string(),
            verdict,
            notes: payload.notes,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("Detection not found: {}", id)))?;

    tracing::info!(
        detection_id = %id,
        reviewer = %reviewer,
        override_verdict = %verdict,
        original_verdict = %detection.verdict,
        "Verdict overridden"
    );

    Ok(Json(detection))
}

/// Build detection routes
pub fn detection_routes() -> Router<AppState> {
    Router::new()
        .route("/api/detections", post(create_detection))
        .route("/api/detections/:id", get(get_detection))
        .route("/api/detections/:id/override", post(override_verdict))
        .route("/api/review/queue", get(review_queue))
}
