//! medgen-server library crate
//!
//! Exposes `build_app`, `AppState` and `config` for integration tests.
//! The actual binary entrypoint is in `main.rs`.

pub mod ai;
pub mod config;
mod error;
mod middleware;
pub mod pipeline;
mod routes;
pub mod scrape;
pub mod store;

use std::sync::Arc;

use axum::{
    Extension, Router, extract::DefaultBodyLimit, http::HeaderValue, middleware as axum_mw,
    routing::get,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use ai::{GeminiClient, GeminiGenerator, ProfileSource};
use config::Config;
use scrape::{HttpFetcher, PageFetcher};
use store::ResultStore;

pub use error::AppError;

/// Shared handler state: the result store plus the two upstream collaborators
#[derive(Clone)]
pub struct AppState {
    pub store: ResultStore,
    pub generator: Arc<dyn ProfileSource>,
    pub fetcher: Arc<dyn PageFetcher>,
}

impl AppState {
    /// Wire the production collaborators from configuration.
    ///
    /// Without `GOOGLE_API_KEY` the generator is still installed, but every
    /// `/process` call fails with a generation error.
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let client = config
            .google_api_key
            .as_ref()
            .map(|key| {
                GeminiClient::new(key.clone(), config.gemini_model.clone(), config.upstream_timeout)
            })
            .transpose()
            .map_err(|e| AppError::Internal(format!("Failed to build Gemini client: {}", e)))?;
        let fetcher = HttpFetcher::new(config.upstream_timeout)
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            store: ResultStore::new(),
            generator: Arc::new(GeminiGenerator::new(client, config.generation_retries)),
            fetcher: Arc::new(fetcher),
        })
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

/// Build the full application router with all routes and middleware.
///
/// Extracted from `main()` so integration tests can construct the app
/// without binding to a TCP port.
pub fn build_app(state: AppState, config: &Config) -> Router {
    let rate_limiter = middleware::create_rate_limiter(config.rate_limit_rps);

    let dataset_routes = routes::dataset_routes()
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(axum_mw::from_fn(middleware::rate_limit_middleware))
        .layer(Extension(rate_limiter));

    // build_recorder() + set_global_recorder() so repeated calls (e.g. in
    // integration tests) still get a valid handle for /metrics
    let recorder = metrics_exporter_prometheus::PrometheusBuilder::new().build_recorder();
    let prometheus_handle = recorder.handle();
    let _ = metrics::set_global_recorder(recorder);

    let public_routes = Router::new()
        .route("/health", get(routes::health::check))
        .route("/metrics", get(routes::metrics::get))
        .layer(Extension(prometheus_handle));

    Router::new()
        .merge(public_routes)
        .merge(dataset_routes)
        .with_state(state)
        .layer(axum_mw::from_fn(middleware::audit_middleware))
        .layer(axum_mw::from_fn(middleware::request_id_middleware))
        .layer(cors_layer(&config.cors_origins))
        .layer(TraceLayer::new_for_http())
        .layer(axum_mw::from_fn(middleware::metrics_middleware))
}
