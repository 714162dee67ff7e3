//! Dataset ingestion and profiling service.
//!
//! Uploaded CSV, Excel, JSON and Parquet files are stored on disk, registered
//! under an opaque id and profiled on request: column typing, missing values,
//! duplicates, descriptive statistics, correlations and a quality score.

use std::num::NonZeroUsize;
use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, http::HeaderValue, routing::get, Router};
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod routes;
pub mod services;

use services::registry::DatasetRegistry;

/// Room for multipart boundaries and headers on top of the file itself.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

// Application state
pub struct AppState {
    pub config: config::Config,
    pub registry: DatasetRegistry,
}

impl AppState {
    pub fn new(config: config::Config) -> Self {
        let capacity = NonZeroUsize::new(config.dataset_capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            registry: DatasetRegistry::new(capacity),
            config,
        }
    }
}

fn cors_layer(config: &config::Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .max_age(std::time::Duration::from_secs(3600))
}

pub fn app(state: Arc<AppState>) -> Router {
    let body_limit = state.config.max_upload_size.saturating_add(MULTIPART_OVERHEAD);
    // `nest` only matches the bare prefix; the API root answers with a trailing slash too.
    let api_root_slash = format!("{}/", state.config.api_prefix);

    Router::new()
        .merge(routes::routes())
        .nest(&state.config.api_prefix, routes::api_routes())
        .route(&api_root_slash, get(routes::api_root))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors_layer(&state.config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
