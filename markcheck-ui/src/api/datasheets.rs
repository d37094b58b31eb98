//! Datasheet API: the admin view's CRUD surface

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::db;
use crate::pagination::{paginate, PAGE_SIZE};
use crate::{ApiError, ApiResult, AppState};
use markcheck_common::db::models::Datasheet;

/// Query parameters for datasheet listing
#[derive(Debug, Deserialize)]
pub struct DatasheetQuery {
    /// Case-insensitive substring filter on vendor or part number
    pub q: Option<String>,

    /// Page number (1-indexed)
    #[serde(default = "default_page")]
    pub page: i64,
}

fn default_page() -> i64 {
    1
}

/// Paginated datasheet list response
#[derive(Debug, Serialize)]
pub struct DatasheetListResponse {
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
    pub datasheets: Vec<Datasheet>,
}

/// Request payload for creating or updating a datasheet
#[derive(Debug, Deserialize)]
pub struct DatasheetRequest {
    pub vendor: String,
    pub part_number: String,
    pub datasheet_url: String,
    #[serde(default)]
    pub notes: String,
}

impl DatasheetRequest {
    fn into_fields(self) -> ApiResult<db::datasheets::DatasheetFields> {
        for (name, value) in [
            ("vendor", &self.vendor),
            ("part_number", &self.part_number),
            ("datasheet_url", &self.datasheet_url),
        ] {
            if value.trim().is_empty() {
                return Err(ApiError::BadRequest(format!("{} cannot be empty", name)));
            }
        }

        Ok(db::datasheets::DatasheetFields {
            vendor: self.vendor,
            part_number: self.part_number,
            datasheet_url: self.datasheet_url,
            notes: self.notes,
        })
    }
}

/// GET /api/datasheets?q=...&page=N
///
/// Newest first; with `q`, filters by case-insensitive substring match on
/// vendor OR part number.
pub async fn list_datasheets(
    State(state): State<AppState>,
    Query(query): Query<DatasheetQuery>,
) -> ApiResult<Json<DatasheetListResponse>> {
    let filter = query.q.as_deref().map(str::trim).filter(|q| !q.is_empty());

    let total = match filter {
        Some(q) => db::datasheets::count_search(&state.db, q).await?,
        None => db::datasheets::count_datasheets(&state.db).await?,
    };
    let p = paginate(total, query.page);

    let datasheets = match filter {
        Some(q) => db::datasheets::search_datasheets(&state.db, q, PAGE_SIZE, p.offset).await?,
        None => db::datasheets::list_datasheets(&state.db, PAGE_SIZE, p.offset).await?,
    };

    Ok(Json(DatasheetListResponse {
        total,
        page: p.page,
        page_size: PAGE_SIZE,
        total_pages: p.total_pages,
        datasheets,
    }))
}

/// GET /api/datasheets/:id
pub async fn get_datasheet(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Datasheet>> {
    let datasheet = db::datasheets::load_datasheet(&state.db, &id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Datasheet not found: {}", id)))?;

    Ok(Json(datasheet))
}

/// POST /api/datasheets
pub async fn create_datasheet(
    State(state): State<AppState>,
    Json(payload): Json<DatasheetRequest>,
) -> ApiResult<Json<Datasheet>> {
    let fields = payload.into_fields()?;
    let datasheet = db::datasheets::create_datasheet(&state.db, fields).await?;

    tracing::info!(
        datasheet_id = %datasheet.id,
        vendor = %datasheet.vendor,
        part_number = %datasheet.part_number,
        "Created datasheet"
    );

    Ok(Json(datasheet))
}

/// PUT /api/datasheets/:id
pub async fn update_datasheet(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<DatasheetRequest>,
) -> ApiResult<Json<Datasheet>> {
    let fields = payload.into_fields()?;

    let datasheet = db::datasheets::update_datasheet(&state.db, &id, fields)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Datasheet not found: {}", id)))?;

    Ok(Json(datasheet))
}

/// DELETE /api/datasheets/:id
pub async fn delete_datasheet(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let removed = db::datasheets::delete_datasheet(&state.db, &id).await?;
    if !removed {
        return Err(ApiError::NotFound(format!("Datasheet not found: {}", id)));
    }

    tracing::info!(datasheet_id = %id, "Deleted datasheet");

    Ok(StatusCode::NO_CONTENT)
}

/// Build datasheet routes
pub fn datasheet_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/datasheets",
            get(list_datasheets).post(create_datasheet),
        )
        .route(
            "/api/datasheets/:id",
            get(get_datasheet)
                .put(update_datasheet)
                .delete(delete_datasheet),
        )
}
