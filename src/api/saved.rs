//! Saved-trail endpoints.

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use super::trails::trail_not_found;
use super::{success, ApiResult};
use crate::errors::AppError;
use crate::export::{saved_trails_csv, EXPORT_FILENAME};
use crate::models::Trail;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct SavedTrails {
    pub ids: Vec<i64>,
    pub trails: Vec<Trail>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleResult {
    pub trail_id: i64,
    pub saved: bool,
}

/// GET /api/saved - Saved ids and the catalog trails they resolve to.
pub async fn list_saved(State(state): State<AppState>) -> ApiResult<SavedTrails> {
    let ids = state.saved.all().await;
    let trails = state.catalog.read().await.saved_trails(&ids);
    success(SavedTrails { ids, trails })
}

/// POST /api/saved/:id/toggle - Save or unsave a trail.
///
/// Only catalog trails can be saved; a stale id can still be removed.
pub async fn toggle_saved(
    State(state): State<AppState>,
    Path(trail_id): Path<i64>,
) -> ApiResult<ToggleResult> {
    let known = state.catalog.read().await.by_id(trail_id).is_some();
    if !known && !state.saved.contains(trail_id).await {
        return Err(trail_not_found(trail_id));
    }

    let saved = state.saved.toggle(trail_id).await;
    tracing::debug!("Trail {} saved: {}", trail_id, saved);
    success(ToggleResult { trail_id, saved })
}

/// DELETE /api/saved - Forget every saved trail.
pub async fn clear_saved(State(state): State<AppState>) -> ApiResult<Vec<i64>> {
    state.saved.clear().await;
    success(Vec::new())
}

/// GET /api/saved/export - Saved trails as a CSV download.
pub async fn export_saved(State(state): State<AppState>) -> Result<Response, AppError> {
    let ids = state.saved.all().await;
    let trails = state.catalog.read().await.saved_trails(&ids);

    let disposition = format!("attachment; filename=\"{}\"", EXPORT_FILENAME);
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        saved_trails_csv(&trails),
    )
        .into_response())
}
