//! Normalized weather records returned to the front-end.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

/// Current conditions in imperial units.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeatherReport {
    /// °F
    pub temperature: i64,
    pub feels_like: i64,
    /// Percent
    pub humidity: i64,
    pub description: String,
    pub icon: String,
    /// mph
    pub wind_speed: i64,
    pub wind_direction: i64,
    /// Miles
    pub visibility: i64,
    /// hPa
    pub pressure: i64,
    /// Inches of rain over the last hour
    pub precipitation: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sunrise: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sunset: Option<DateTime<Utc>>,
}

/// One day of a multi-day forecast.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailyForecast {
    pub date: NaiveDate,
    pub high: i64,
    pub low: i64,
    pub condition: String,
    pub description: String,
    pub icon: String,
    pub precipitation: f64,
    pub wind_speed: i64,
}

/// Weather panel for a trail: conditions plus hiking advice.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrailWeather {
    pub trail_id: i64,
    pub weather: WeatherReport,
    pub advice: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrailForecast {
    pub trail_id: i64,
    pub days: Vec<DailyForecast>,
}
