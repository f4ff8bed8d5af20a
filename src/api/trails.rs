//! Trail catalog endpoints.

use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};

use super::{parse_param, success, ApiResult};
use crate::catalog::{self, SortKey, SortOrder, TrailQuery, TrailStats};
use crate::errors::AppError;
use crate::geo::{self, Viewport, DEFAULT_NEARBY_RADIUS_MILES};
use crate::models::{Coordinates, NearbyTrail, Trail};
use crate::AppState;

/// Query string shared by the list and stats routes.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrailListParams {
    pub q: Option<String>,
    pub difficulty: Option<String>,
    pub length: Option<String>,
    pub feature: Option<String>,
    pub sort_by: Option<String>,
    pub order: Option<String>,
}

impl TrailListParams {
    /// Either sort parameter switches sorting on; the other takes its default.
    pub fn into_query(self) -> Result<TrailQuery, AppError> {
        let key: Option<SortKey> = parse_param("sortBy", self.sort_by.as_deref())?;
        let order: Option<SortOrder> = parse_param("order", self.order.as_deref())?;
        let sort = match (key, order) {
            (None, None) => None,
            (key, order) => Some((key.unwrap_or_default(), order.unwrap_or_default())),
        };

        Ok(TrailQuery {
            search: self.q,
            difficulty: parse_param("difficulty", self.difficulty.as_deref())?,
            length: parse_param("length", self.length.as_deref())?,
            feature: self.feature,
            sort,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyParams {
    pub lat: Option<String>,
    pub lon: Option<String>,
    pub max_distance: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TrailBounds {
    pub coordinates: Vec<Coordinates>,
    pub viewport: Option<Viewport>,
}

/// GET /api/trails - Filtered, optionally sorted trail list.
pub async fn list_trails(
    State(state): State<AppState>,
    Query(params): Query<TrailListParams>,
) -> ApiResult<Vec<Trail>> {
    let query = params.into_query()?;
    let trails = state.catalog.read().await.query(&query);
    success(trails)
}

/// GET /api/trails/stats - Aggregates over the filtered list.
pub async fn trail_stats(
    State(state): State<AppState>,
    Query(params): Query<TrailListParams>,
) -> ApiResult<Option<TrailStats>> {
    let query = params.into_query()?;
    let trails = state.catalog.read().await.query(&query);
    success(catalog::stats(&trails))
}

/// GET /api/trails/bounds - Map markers and the viewport that fits them.
pub async fn trail_bounds(State(state): State<AppState>) -> ApiResult<TrailBounds> {
    let coordinates = geo::bounds(state.catalog.read().await.trails());
    let viewport = geo::viewport(&coordinates);
    success(TrailBounds {
        coordinates,
        viewport,
    })
}

/// GET /api/trails/nearby - Trails within a radius, closest first.
pub async fn nearby_trails(
    State(state): State<AppState>,
    Query(params): Query<NearbyParams>,
) -> ApiResult<Vec<NearbyTrail>> {
    let lat: f64 = parse_param("lat", params.lat.as_deref())?
        .ok_or_else(|| AppError::BadRequest("lat is required".to_string()))?;
    let lon: f64 = parse_param("lon", params.lon.as_deref())?
        .ok_or_else(|| AppError::BadRequest("lon is required".to_string()))?;
    let max_distance: f64 = parse_param("maxDistance", params.max_distance.as_deref())?
        .unwrap_or(DEFAULT_NEARBY_RADIUS_MILES);

    let origin = Coordinates::new(lat, lon);
    if !origin.is_valid() {
        return Err(AppError::BadRequest(format!(
            "Coordinates ({}, {}) are out of range",
            lat, lon
        )));
    }
    if !max_distance.is_finite() || max_distance < 0.0 {
        return Err(AppError::BadRequest(
            "maxDistance must be a non-negative number".to_string(),
        ));
    }

    let catalog = state.catalog.read().await;
    success(geo::nearby(catalog.trails(), origin, max_distance))
}

/// GET /api/trails/:id - Get a single trail.
pub async fn get_trail(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Trail> {
    let catalog = state.catalog.read().await;
    match catalog.by_id(id) {
        Some(trail) => success(trail.clone()),
        None => Err(trail_not_found(id)),
    }
}

pub(crate) fn trail_not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Trail {} not found", id))
}
