//! Inspection API: intake and browsing for the operator console

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::db;
use crate::pagination::{paginate, PAGE_SIZE};
use crate::{ApiError, ApiResult, AppState};
use markcheck_common::db::models::{Detection, Inspection};

/// Query parameters for inspection listing
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Page number (1-indexed)
    #[serde(default = "default_page")]
    pub page: i64,
}

fn default_page() -> i64 {
    1
}

/// Paginated inspection list response
#[derive(Debug, Serialize)]
pub struct InspectionListResponse {
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
    pub inspections: Vec<Inspection>,
}

/// Request payload for recording a new inspection
#[derive(Debug, Deserialize)]
pub struct CreateInspectionRequest {
    /// Capture time, RFC 3339
    pub timestamp: String,
    pub camera_id: String,
    pub image_url: String,
    pub status: String,
}

/// GET /api/inspections?page=N
///
/// Most recent capture first.
pub async fn list_inspections(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<InspectionListResponse>> {
    let total = db::inspections::count_inspections(&state.db).await?;
    let p = paginate(total, query.page);

    let inspections = db::inspections::list_inspections(&state.db, PAGE_SIZE, p.offset).await?;

    Ok(Json(InspectionListResponse {
        total,
        page: p.page,
        page_size: PAGE_SIZE,
        total_pages: p.total_pages,
        inspections,
    }))
}

/// GET /api/inspections/:id
pub async fn get_inspection(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Inspection>> {
    let inspection = db::inspections::load_inspection(&state.db, &id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Inspection not found: {}", id)))?;

    Ok(Json(inspection))
}

/// POST /api/inspections
///
/// Records one imaging event. The id and created_at are server-assigned;
/// the capture timestamp comes from the camera and must parse as RFC 3339.
pub async fn create_inspection(
    State(state): State<AppState>,
    Json(payload): Json<CreateInspectionRequest>,
) -> ApiResult<Json<Inspection>> {
    if chrono::DateTime::parse_from_rfc3339(&payload.timestamp).is_err() {
        return Err(ApiError::BadRequest(format!(
            "timestamp must be RFC 3339, got {:?}",
            payload.timestamp
        )));
    }
    if payload.camera_id.trim().is_empty() {
        return Err(ApiError::BadRequest("camera_id cannot be empty".to_string()));
    }

    let inspection = db::inspections::create_inspection(
        &state.db,
        db::inspections::NewInspection {
            timestamp: payload.timestamp,
            camera_id: payload.camera_id,
            image_url: payload.image_url,
            status: payload.status,
        },
    )
    .await?;

    tracing::info!(
        inspection_id = %inspection.id,
        camera_id = %inspection.camera_id,
        "Recorded inspection"
    );

    Ok(Json(inspection))
}

/// GET /api/inspections/:id/detections
pub async fn list_inspection_detections(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<Detection>>> {
    // 404 for an unknown inspection rather than an empty list
    db::inspections::load_inspection(&state.db, &id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Inspection not found: {}", id)))?;

    let detections = db::detections::list_for_inspection(&state.db, &id).await?;
    Ok(Json(detections))
}

/// Build inspection routes
pub fn inspection_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/inspections",
            get(list_inspections).post(create_inspection),
        )
        .route("/api/inspections/:id", get(get_inspection))
        .route(
            "/api/inspections/:id/detections",
            get(list_inspection_detections),
        )
}
