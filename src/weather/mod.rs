//! Weather context for trails.
//!
//! Lookups go through two TTL caches (current conditions and forecasts) keyed
//! by coordinates. Any provider failure is answered with mock data, which is
//! never cached.

mod advice;
mod client;

pub use advice::advice;
pub use client::OpenWeatherClient;

use std::time::Duration;

use chrono::{Days, Utc};

use crate::cache::TtlCache;
use crate::config::WeatherConfig;
use crate::errors::AppError;
use crate::models::{Coordinates, DailyForecast, WeatherReport};

pub const DEFAULT_FORECAST_DAYS: usize = 5;
pub const MAX_FORECAST_DAYS: usize = 5;

/// Hashable cache key: coordinates in millionths of a degree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CoordKey {
    lat_e6: i64,
    lon_e6: i64,
}

impl From<Coordinates> for CoordKey {
    fn from(c: Coordinates) -> Self {
        Self {
            lat_e6: (c.lat * 1e6).round() as i64,
            lon_e6: (c.lon * 1e6).round() as i64,
        }
    }
}

pub struct WeatherService {
    client: OpenWeatherClient,
    current: TtlCache<CoordKey, WeatherReport>,
    forecasts: TtlCache<(CoordKey, usize), Vec<DailyForecast>>,
    ttl: Duration,
}

impl WeatherService {
    pub fn new(config: &WeatherConfig) -> Result<Self, AppError> {
        if config.api_key.is_none() {
            tracing::warn!("No weather API key configured (WEATHER_API_KEY). Serving mock weather");
        }

        Ok(Self {
            client: OpenWeatherClient::new(config)?,
            current: TtlCache::new(),
            forecasts: TtlCache::new(),
            ttl: config.cache_ttl,
        })
    }

    /// Current conditions; a trail without coordinates gets mock data
    /// without any lookup.
    pub async fn current(&self, coords: Option<Coordinates>) -> WeatherReport {
        let Some(coords) = coords else {
            return mock_weather();
        };

        self.current
            .get(
                coords.into(),
                self.ttl,
                || self.client.current(coords),
                |_| mock_weather(),
            )
            .await
    }

    pub async fn forecast(&self, coords: Option<Coordinates>, days: usize) -> Vec<DailyForecast> {
        let days = days.clamp(1, MAX_FORECAST_DAYS);
        let Some(coords) = coords else {
            return mock_forecast(days);
        };

        self.forecasts
            .get(
                (coords.into(), days),
                self.ttl,
                || self.client.forecast(coords, days),
                |_| mock_forecast(days),
            )
            .await
    }

    /// Number of cached lookups, current and forecast combined.
    pub async fn cached_entries(&self) -> usize {
        self.current.len().await + self.forecasts.len().await
    }
}

/// Stand-in conditions served when the provider is unavailable.
pub fn mock_weather() -> WeatherReport {
    WeatherReport {
        temperature: 72,
        feels_like: 75,
        humidity: 65,
        description: "partly cloudy".to_string(),
        icon: "02d".to_string(),
        wind_speed: 8,
        wind_direction: 180,
        visibility: 10,
        pressure: 1013,
        precipitation: 0.0,
        sunrise: None,
        sunset: None,
    }
}

/// Deterministic stand-in forecast starting today.
pub fn mock_forecast(days: usize) -> Vec<DailyForecast> {
    const CONDITIONS: [&str; 3] = ["Clear", "Cloudy", "Partly Cloudy"];
    let today = Utc::now().date_naive();

    (0..days)
        .map(|i| DailyForecast {
            date: today.checked_add_days(Days::new(i as u64)).unwrap_or(today),
            high: 78 - i as i64,
            low: 62 - i as i64,
            condition: CONDITIONS[i % CONDITIONS.len()].to_string(),
            description: "clear sky".to_string(),
            icon: "01d".to_string(),
            precipitation: 0.0,
            wind_speed: 8,
        })
        .collect()
}
