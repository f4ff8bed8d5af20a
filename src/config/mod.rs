//! Configuration module for the Trailhead backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::DEFAULT_TTL;

const DEFAULT_BIND_ADDR: ([u8; 4], u16) = ([127, 0, 0, 1], 8080);
const DEFAULT_WEATHER_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
const DEFAULT_WEATHER_TIMEOUT_SECS: u64 = 10;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Pre-shared key guarding mutating routes (disabled when unset)
    pub api_psk: Option<String>,
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Path to the `{ "trails": [...] }` document
    pub trails_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    pub weather: WeatherConfig,
}

/// Weather provider settings.
#[derive(Debug, Clone)]
pub struct WeatherConfig {
    /// OpenWeatherMap key; without it every lookup falls back to mock data
    pub api_key: Option<String>,
    pub base_url: String,
    pub cache_ttl: Duration,
    pub timeout: Duration,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_WEATHER_BASE_URL.to_string(),
            cache_ttl: DEFAULT_TTL,
            timeout: Duration::from_secs(DEFAULT_WEATHER_TIMEOUT_SECS),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let api_psk = non_empty_var("TRAILS_API_PSK");

        let db_path = env::var("TRAILS_DB_PATH")
            .unwrap_or_else(|_| "./data/trails.sqlite".to_string())
            .into();

        let trails_path = env::var("TRAILS_DATA_PATH")
            .unwrap_or_else(|_| "./data/trails.json".to_string())
            .into();

        let bind_addr = parse_var("TRAILS_BIND_ADDR", || SocketAddr::from(DEFAULT_BIND_ADDR));

        let log_level = env::var("TRAILS_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let weather = WeatherConfig {
            api_key: non_empty_var("WEATHER_API_KEY"),
            base_url: env::var("WEATHER_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_WEATHER_BASE_URL.to_string()),
            cache_ttl: Duration::from_secs(parse_var("WEATHER_CACHE_TTL_SECS", || {
                DEFAULT_TTL.as_secs()
            })),
            timeout: Duration::from_secs(parse_var("WEATHER_TIMEOUT_SECS", || {
                DEFAULT_WEATHER_TIMEOUT_SECS
            })),
        };

        Self {
            api_psk,
            db_path,
            trails_path,
            bind_addr,
            log_level,
            weather,
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Parse a variable, keeping the default when it is unset or invalid.
fn parse_var<T: FromStr>(key: &str, default: impl FnOnce() -> T) -> T {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Ignoring invalid {}={:?}, using default", key, raw);
            default()
        }),
        Err(_) => default(),
    }
}
