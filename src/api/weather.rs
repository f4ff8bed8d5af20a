//! Weather endpoints. Provider failures never surface here; the service
//! answers with mock data instead.

use axum::extract::{Path, Query, State};
use serde::Deserialize;

use super::trails::trail_not_found;
use super::{parse_param, success, ApiResult};
use crate::models::{TrailForecast, TrailWeather};
use crate::weather::{advice, DEFAULT_FORECAST_DAYS};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ForecastParams {
    pub days: Option<String>,
}

/// GET /api/trails/:id/weather - Current conditions and hiking advice.
pub async fn trail_weather(
    State(state): State<AppState>,
    Path(trail_id): Path<i64>,
) -> ApiResult<TrailWeather> {
    let trail = state
        .catalog
        .read()
        .await
        .by_id(trail_id)
        .cloned()
        .ok_or_else(|| trail_not_found(trail_id))?;

    let weather = state.weather.current(trail.coordinates).await;
    let advice = advice(&weather, &trail);
    tracing::debug!(
        "Weather for trail {} ({} cached lookups)",
        trail_id,
        state.weather.cached_entries().await
    );

    success(TrailWeather {
        trail_id,
        weather,
        advice,
    })
}

/// GET /api/trails/:id/forecast - Daily forecast, 1 to 5 days.
pub async fn trail_forecast(
    State(state): State<AppState>,
    Path(trail_id): Path<i64>,
    Query(params): Query<ForecastParams>,
) -> ApiResult<TrailForecast> {
    let coordinates = state
        .catalog
        .read()
        .await
        .by_id(trail_id)
        .map(|t| t.coordinates)
        .ok_or_else(|| trail_not_found(trail_id))?;
    let days: usize = parse_param("days", params.days.as_deref())?.unwrap_or(DEFAULT_FORECAST_DAYS);

    let days = state.weather.forecast(coordinates, days).await;
    success(TrailForecast { trail_id, days })
}
