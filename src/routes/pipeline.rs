//! Pipeline and export endpoints.
//!
//! These are placeholders for the pipeline engine: they answer with fixed
//! payloads and do not run anything.

use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/pipeline/generate", post(generate_pipeline))
        .route("/pipeline/execute", post(execute_pipeline))
        .route("/pipeline/:pipeline_id/status", get(pipeline_status))
        .route("/export/code", post(export_code))
}

#[derive(Debug, Deserialize)]
pub struct GenerateParams {
    pub dataset_id: String,
}

#[derive(Debug, Deserialize)]
pub struct PipelineParams {
    pub pipeline_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ExportParams {
    pub pipeline_id: String,
    #[serde(default = "default_export_format")]
    pub format: String,
}

fn default_export_format() -> String {
    "python".to_string()
}

async fn generate_pipeline(Query(params): Query<GenerateParams>) -> Json<Value> {
    tracing::debug!("Pipeline generation requested for dataset {}", params.dataset_id);
    Json(json!({
        "pipeline_id": "pipeline_001",
        "status": "generated",
        "steps": [
            "data_preprocessing",
            "feature_engineering",
            "model_training",
            "validation"
        ]
    }))
}

async fn execute_pipeline(Query(params): Query<PipelineParams>) -> Json<Value> {
    Json(json!({
        "pipeline_id": params.pipeline_id,
        "status": "executing",
        "message": "Pipeline execution started"
    }))
}

async fn pipeline_status(Path(pipeline_id): Path<String>) -> Json<Value> {
    Json(json!({
        "pipeline_id": pipeline_id,
        "status": "completed",
        "progress": 100,
        "metrics": {
            "accuracy": 0.92,
            "f1_score": 0.89
        }
    }))
}

async fn export_code(Query(params): Query<ExportParams>) -> Json<Value> {
    Json(json!({
        "download_url": format!("/download/{}.zip", params.pipeline_id),
        "pipeline_id": params.pipeline_id,
        "format": params.format,
    }))
}
