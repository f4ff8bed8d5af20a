//! Trailhead Backend
//!
//! A REST service for browsing a hiking trail catalog: composable filters and
//! stats, distance search, a review ledger, saved trails and cached weather.

mod api;
mod auth;
mod cache;
mod catalog;
mod config;
mod db;
mod errors;
mod export;
mod geo;
mod models;
mod reviews;
mod saved;
mod weather;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use catalog::Catalog;
use config::Config;
use db::Repository;
use errors::AppError;
use reviews::ReviewLedger;
use saved::SavedStore;
use weather::WeatherService;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<RwLock<Catalog>>,
    pub reviews: Arc<RwLock<ReviewLedger>>,
    pub saved: Arc<SavedStore>,
    pub weather: Arc<WeatherService>,
    pub repo: Arc<Repository>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Open storage, load the catalog and review ledger, and fold review
    /// aggregates into the trail ratings.
    pub async fn build(config: Config) -> Result<Self, AppError> {
        let pool = db::init_database(&config.db_path).await?;
        let repo = Repository::new(pool);

        let mut catalog = catalog::load_catalog(&config.trails_path).await;
        tracing::info!("Catalog ready with {} trails ({:?})", catalog.len(), catalog.origin());

        let ledger = load_reviews(&repo).await?;
        for (trail_id, average, count) in ledger.aggregates() {
            catalog.apply_review_aggregate(trail_id, average, count);
        }

        let saved = SavedStore::load(repo.clone()).await;
        let weather = WeatherService::new(&config.weather)?;

        Ok(Self {
            catalog: Arc::new(RwLock::new(catalog)),
            reviews: Arc::new(RwLock::new(ledger)),
            saved: Arc::new(saved),
            weather: Arc::new(weather),
            repo: Arc::new(repo),
            config: Arc::new(config),
        })
    }
}

/// Stored reviews, or the sample set on first start.
async fn load_reviews(repo: &Repository) -> Result<ReviewLedger, AppError> {
    let stored = repo.list_reviews().await?;
    if !stored.is_empty() {
        tracing::info!("Loaded {} reviews", stored.len());
        return Ok(ReviewLedger::from_reviews(stored));
    }

    let seed = reviews::seed_reviews();
    if let Err(e) = repo.insert_reviews(&seed).await {
        tracing::warn!("Failed to store seed reviews: {}", e);
    }
    tracing::info!("Seeded {} sample reviews", seed.len());
    Ok(ReviewLedger::from_reviews(seed))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Trailhead Backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Trail data path: {:?}", config.trails_path);
    tracing::info!("Bind address: {}", config.bind_addr);

    if config.api_psk.is_none() {
        tracing::warn!("No API PSK configured (TRAILS_API_PSK). Authentication is disabled!");
    }

    let bind_addr = config.bind_addr;
    let state = AppState::build(config).await?;
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!("Server listening on {}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let psk = state.config.api_psk.clone();

    // Read-only routes are public
    let public_routes = Router::new()
        // Trails
        .route("/trails", get(api::list_trails))
        .route("/trails/stats", get(api::trail_stats))
        .route("/trails/bounds", get(api::trail_bounds))
        .route("/trails/nearby", get(api::nearby_trails))
        .route("/trails/{id}", get(api::get_trail))
        // Reviews
        .route("/trails/{id}/reviews", get(api::list_reviews))
        .route("/reviews/recent", get(api::recent_reviews))
        // Weather
        .route("/trails/{id}/weather", get(api::trail_weather))
        .route("/trails/{id}/forecast", get(api::trail_forecast))
        // Saved
        .route("/saved", get(api::list_saved))
        .route("/saved/export", get(api::export_saved));

    let protected_routes = Router::new()
        .route("/trails/{id}/reviews", post(api::add_review))
        .route(
            "/trails/{id}/reviews/{review_id}/helpful",
            post(api::mark_helpful),
        )
        .route("/saved/{id}/toggle", post(api::toggle_saved))
        .route("/saved", delete(api::clear_saved))
        .route_layer(middleware::from_fn(move |req, next| {
            auth::require_psk(psk.clone(), req, next)
        }));

    // Health check (no auth required)
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", public_routes.merge(protected_routes))
        .merge(health_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
