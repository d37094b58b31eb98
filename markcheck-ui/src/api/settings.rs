//! Settings API: detection thresholds and the camera roster
//!
//! Both singletons are validated here at the boundary before anything is
//! written. An inverted threshold pair would silently empty the suspicious
//! band, so it is rejected rather than stored.

use axum::{
    extract::{Path, State},
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::db;
use crate::{ApiResult, AppState};
use markcheck_common::settings::CameraRoster;
use markcheck_common::verdict::Thresholds;

/// Combined settings response
#[derive(Debug, Serialize)]
pub struct SettingsResponse {
    pub thresholds: Thresholds,
    pub camera_config: CameraRoster,
}

/// Mutation acknowledgement
#[derive(Debug, Serialize)]
pub struct SaveResponse {
    pub success: bool,
    pub message: String,
}

/// Request payload for adding one camera
#[derive(Debug, Deserialize)]
pub struct AddCameraRequest {
    pub name: String,
}

/// GET /api/settings
///
/// Both singletons; defaults when nothing has been configured yet.
pub async fn get_settings(State(state): State<AppState>) -> ApiResult<Json<SettingsResponse>> {
    let thresholds = db::settings::load_thresholds(&state.db).await?;
    let camera_config = db::settings::load_cameras(&state.db).await?;

    Ok(Json(SettingsResponse {
        thresholds,
        camera_config,
    }))
}

/// PUT /api/settings/thresholds
pub async fn put_thresholds(
    State(state): State<AppState>,
    Json(payload): Json<Thresholds>,
) -> ApiResult<Json<SaveResponse>> {
    payload.validate()?;
    db::settings::store_thresholds(&state.db, &payload).await?;

    tracing::info!(
        genuine = payload.genuine,
        suspicious = payload.suspicious,
        "Updated detection thresholds"
    );

    Ok(Json(SaveResponse {
        success: true,
        message: "Thresholds saved".to_string(),
    }))
}

/// PUT /api/settings/cameras
///
/// Replaces the roster wholesale; blank or duplicate names are rejected
/// without mutating the stored roster.
pub async fn put_cameras(
    State(state): State<AppState>,
    Json(payload): Json<CameraRoster>,
) -> ApiResult<Json<SaveResponse>> {
    payload.validate()?;
    db::settings::store_cameras(&state.db, &payload).await?;

    tracing::info!(cameras = payload.cameras.len(), "Updated camera roster");

    Ok(Json(SaveResponse {
        success: true,
        message: "Camera configuration saved".to_string(),
    }))
}

/// POST /api/settings/cameras
///
/// Adds one camera. Duplicates are rejected with 400 and nothing changes.
pub async fn add_camera(
    State(state): State<AppState>,
    Json(payload): Json<AddCameraRequest>,
) -> ApiResult<Json<CameraRoster>> {
    let mut roster = db::settings::load_cameras(&state.db).await?;
    roster.add(&payload.name)?;
    db::settings::store_cameras(&state.db, &roster).await?;

    Ok(Json(roster))
}

/// DELETE /api/settings/cameras/:name
///
/// Removing a camera that is not on the roster is a no-op, not an error.
pub async fn remove_camera(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Json<CameraRoster>> {
    let mut roster = db::settings::load_cameras(&state.db).await?;
    if roster.remove(&name) {
        db::settings::store_cameras(&state.db, &roster).await?;
        tracing::info!(camera = %name, "Removed camera from roster");
    }

    Ok(Json(roster))
}

/// Build settings routes
pub fn settings_routes() -> Router<AppState> {
    Router::new()
        .route("/api/settings", get(get_settings))
        .route("/api/settings/thresholds", put(put_thresholds))
        .route(
            "/api/settings/cameras",
            put(put_cameras).post(add_camera),
        )
        .route("/api/settings/cameras/:name", axum::routing::delete(remove_camera))
}
