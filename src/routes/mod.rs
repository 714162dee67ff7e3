use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};

use crate::AppState;

pub mod datasets;
pub mod pipeline;

/// Routes mounted at the server root.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
}

/// Routes mounted under the configured API prefix.
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(api_root))
        .merge(datasets::routes())
        .merge(pipeline::routes())
}

async fn root(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "message": format!("{} Backend API", state.config.project_name),
        "version": state.config.version,
        "status": "running"
    }))
}

async fn health_check() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

pub async fn api_root(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({ "message": format!("{} API v1", state.config.project_name) }))
}
