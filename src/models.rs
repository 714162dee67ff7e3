use std::path::PathBuf;

use indexmap::IndexMap;
use serde::Serialize;

use crate::services::file_loader::FileFormat;
use crate::services::profiler::{preview::Row, ColumnTypes, DatasetProfile};

/// What the registry remembers about an uploaded dataset.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetMetadata {
    pub dataset_id: String,
    pub filename: String,
    pub file_type: FileFormat,
    pub size_bytes: usize,
    pub rows: usize,
    pub columns: usize,
    pub column_names: Vec<String>,
    pub dtypes: IndexMap<String, String>,
    #[serde(skip)]
    pub file_path: PathBuf,
}

/// Success envelope shared by every dataset endpoint.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub status: &'static str,
    pub message: String,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            status: "success",
            message: message.into(),
            data,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UploadData {
    pub dataset_id: String,
    pub filename: String,
    pub file_type: FileFormat,
    pub size_bytes: usize,
    pub size_mb: f64,
    pub rows: usize,
    pub columns: usize,
    pub column_names: Vec<String>,
    pub dtypes: IndexMap<String, String>,
    pub column_types: ColumnTypes,
    pub missing_values: IndexMap<String, usize>,
    pub total_missing: usize,
    pub duplicate_rows: usize,
    pub memory_usage_mb: f64,
    pub preview: Vec<Row>,
}

#[derive(Debug, Serialize)]
pub struct AnalysisData {
    pub dataset_id: String,
    pub filename: String,
    #[serde(flatten)]
    pub profile: DatasetProfile,
}
