//! OpenWeatherMap transport and payload normalization.

use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::config::WeatherConfig;
use crate::errors::AppError;
use crate::models::{Coordinates, DailyForecast, WeatherReport};

const METERS_PER_MILE: f64 = 1609.34;

/// HTTP client for the provider's `/weather` and `/forecast` endpoints.
pub struct OpenWeatherClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl OpenWeatherClient {
    pub fn new(config: &WeatherConfig) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    pub async fn current(&self, coords: Coordinates) -> Result<WeatherReport, AppError> {
        let payload: CurrentPayload = self.get_json("weather", coords).await?;
        normalize_current(payload)
    }

    pub async fn forecast(
        &self,
        coords: Coordinates,
        days: usize,
    ) -> Result<Vec<DailyForecast>, AppError> {
        let payload: ForecastPayload = self.get_json("forecast", coords).await?;
        normalize_forecast(payload, days)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        coords: Coordinates,
    ) -> Result<T, AppError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            AppError::SourceUnavailable("Weather API key is not configured".to_string())
        })?;

        let url = format!("{}/{}", self.base_url, endpoint);
        let response = self
            .http
            .get(&url)
            .query(&[
                ("lat", coords.lat.to_string()),
                ("lon", coords.lon.to_string()),
                ("appid", api_key.to_string()),
                ("units", "imperial".to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::SourceUnavailable(format!(
                "Weather provider returned {} for /{}",
                status, endpoint
            )));
        }

        Ok(response.json::<T>().await?)
    }
}

// Provider payload shapes, limited to the fields we read.

#[derive(Debug, Deserialize)]
pub(crate) struct MainBlock {
    temp: f64,
    #[serde(default)]
    feels_like: Option<f64>,
    #[serde(default)]
    humidity: f64,
    #[serde(default)]
    pressure: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ConditionBlock {
    #[serde(default)]
    main: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    icon: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WindBlock {
    #[serde(default)]
    speed: f64,
    #[serde(default)]
    deg: f64,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RainBlock {
    #[serde(rename = "1h", default)]
    one_hour: f64,
    #[serde(rename = "3h", default)]
    three_hours: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SysBlock {
    #[serde(default)]
    sunrise: Option<i64>,
    #[serde(default)]
    sunset: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CurrentPayload {
    main: MainBlock,
    weather: Vec<ConditionBlock>,
    wind: WindBlock,
    /// Meters
    #[serde(default)]
    visibility: f64,
    #[serde(default)]
    rain: Option<RainBlock>,
    sys: Option<SysBlock>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ForecastItem {
    dt: i64,
    main: MainBlock,
    weather: Vec<ConditionBlock>,
    wind: WindBlock,
    #[serde(default)]
    rain: Option<RainBlock>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ForecastPayload {
    list: Vec<ForecastItem>,
}

fn timestamp(secs: Option<i64>) -> Option<DateTime<Utc>> {
    secs.and_then(|s| DateTime::from_timestamp(s, 0))
}

pub(crate) fn normalize_current(payload: CurrentPayload) -> Result<WeatherReport, AppError> {
    let condition = payload.weather.first().ok_or_else(|| {
        AppError::SourceUnavailable("Weather payload has no conditions".to_string())
    })?;
    let sys = payload.sys.as_ref();

    Ok(WeatherReport {
        temperature: payload.main.temp.round() as i64,
        feels_like: payload.main.feels_like.unwrap_or(payload.main.temp).round() as i64,
        humidity: payload.main.humidity.round() as i64,
        description: condition.description.clone(),
        icon: condition.icon.clone(),
        wind_speed: payload.wind.speed.round() as i64,
        wind_direction: payload.wind.deg.round() as i64,
        visibility: (payload.visibility / METERS_PER_MILE).round() as i64,
        pressure: payload.main.pressure.round() as i64,
        precipitation: payload.rain.map(|r| r.one_hour).unwrap_or(0.0),
        sunrise: timestamp(sys.and_then(|s| s.sunrise)),
        sunset: timestamp(sys.and_then(|s| s.sunset)),
    })
}

/// Group 3-hour slots by calendar day (UTC) and summarize the first `days`.
pub(crate) fn normalize_forecast(
    payload: ForecastPayload,
    days: usize,
) -> Result<Vec<DailyForecast>, AppError> {
    let mut grouped: Vec<(NaiveDate, Vec<ForecastItem>)> = Vec::new();
    for item in payload.list {
        let date = DateTime::from_timestamp(item.dt, 0)
            .ok_or_else(|| AppError::SourceUnavailable(format!("Bad forecast time {}", item.dt)))?
            .date_naive();
        match grouped.last_mut() {
            Some((d, items)) if *d == date => items.push(item),
            _ => grouped.push((date, vec![item])),
        }
    }

    Ok(grouped
        .into_iter()
        .take(days)
        .map(|(date, items)| summarize_day(date, &items))
        .collect())
}

fn summarize_day(date: NaiveDate, items: &[ForecastItem]) -> DailyForecast {
    let temps = items.iter().map(|i| i.main.temp);
    let high = temps.clone().fold(f64::MIN, f64::max);
    let low = temps.fold(f64::MAX, f64::min);

    // Most frequent condition; the first one seen wins a tie.
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for item in items {
        if let Some(c) = item.weather.first() {
            match counts.iter_mut().find(|(name, _)| *name == c.main) {
                Some((_, n)) => *n += 1,
                None => counts.push((c.main.as_str(), 1)),
            }
        }
    }
    let condition = counts
        .iter()
        .fold(None::<(&str, usize)>, |best, &(name, n)| match best {
            Some((_, best_n)) if best_n >= n => best,
            _ => Some((name, n)),
        })
        .map(|(name, _)| name.to_string())
        .unwrap_or_default();

    let first = items.first().and_then(|i| i.weather.first());
    let precipitation: f64 = items
        .iter()
        .filter_map(|i| i.rain.as_ref())
        .map(|r| r.three_hours)
        .sum();
    let wind_speed = items.iter().map(|i| i.wind.speed).sum::<f64>() / items.len() as f64;

    DailyForecast {
        date,
        high: high.round() as i64,
        low: low.round() as i64,
        condition,
        description: first.map(|c| c.description.clone()).unwrap_or_default(),
        icon: first.map(|c| c.icon.clone()).unwrap_or_default(),
        precipitation,
        wind_speed: wind_speed.round() as i64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_current_payload() {
        let payload: CurrentPayload = serde_json::from_value(json!({
            "main": { "temp": 71.6, "feels_like": 70.2, "humidity": 40, "pressure": 1012 },
            "weather": [{ "main": "Clouds", "description": "scattered clouds", "icon": "03d" }],
            "wind": { "speed": 7.4, "deg": 250 },
            "visibility": 16093,
            "sys": { "sunrise": 1717243200, "sunset": 1717294800 }
        }))
        .unwrap();

        let report = normalize_current(payload).unwrap();
        assert_eq!(report.temperature, 72);
        assert_eq!(report.feels_like, 70);
        assert_eq!(report.wind_speed, 7);
        assert_eq!(report.visibility, 10);
        assert_eq!(report.description, "scattered clouds");
        assert_eq!(report.precipitation, 0.0);
        assert!(report.sunrise.is_some());
    }

    #[test]
    fn test_current_without_conditions_is_unavailable() {
        let payload: CurrentPayload = serde_json::from_value(json!({
            "main": { "temp": 50.0 },
            "weather": [],
            "wind": { "speed": 1.0 }
        }))
        .unwrap();
        assert!(normalize_current(payload).is_err());
    }

    #[test]
    fn test_normalize_forecast_groups_by_day() {
        // 2024-06-01 00:00, 03:00, 06:00 UTC then 2024-06-02 00:00 UTC
        let slot = |dt: i64, temp: f64, main: &str, rain: f64, wind: f64| {
            json!({
                "dt": dt,
                "main": { "temp": temp },
                "weather": [{ "main": main, "description": main.to_lowercase(), "icon": "01d" }],
                "wind": { "speed": wind },
                "rain": { "3h": rain }
            })
        };
        let payload: ForecastPayload = serde_json::from_value(json!({
            "list": [
                slot(1717200000, 60.0, "Clear", 0.0, 4.0),
                slot(1717210800, 70.4, "Rain", 0.2, 6.0),
                slot(1717221600, 65.0, "Rain", 0.1, 8.0),
                slot(1717286400, 55.0, "Clouds", 0.0, 3.0)
            ]
        }))
        .unwrap();

        let days = normalize_forecast(payload, 5).unwrap();
        assert_eq!(days.len(), 2);

        let first = &days[0];
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        assert_eq!(first.high, 70);
        assert_eq!(first.low, 60);
        assert_eq!(first.condition, "Rain");
        assert_eq!(first.description, "clear");
        assert!((first.precipitation - 0.3).abs() < 1e-9);
        assert_eq!(first.wind_speed, 6);
    }

    #[test]
    fn test_normalize_forecast_limits_days() {
        let payload: ForecastPayload = serde_json::from_value(json!({
            "list": [
                { "dt": 1717200000, "main": { "temp": 60.0 }, "weather": [], "wind": { "speed": 1.0 } },
                { "dt": 1717286400, "main": { "temp": 61.0 }, "weather": [], "wind": { "speed": 1.0 } }
            ]
        }))
        .unwrap();

        let days = normalize_forecast(payload, 1).unwrap();
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].condition, "");
    }

    #[tokio::test]
    async fn test_missing_api_key_is_unavailable() {
        let client = OpenWeatherClient::new(&WeatherConfig::default()).unwrap();
        let err = client.current(Coordinates::new(40.0, -105.0)).await.unwrap_err();
        assert!(matches!(err, AppError::SourceUnavailable(_)));
    }
}
