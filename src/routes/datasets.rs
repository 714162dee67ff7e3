use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::{
    extract::{Multipart, Query, State},
    routing::post,
    Json, Router,
};
use bytes::Bytes;
use serde::Deserialize;

use crate::{
    error::AppError,
    models::{AnalysisData, ApiResponse, DatasetMetadata, UploadData},
    services::{
        file_loader::FileFormat,
        profiler::{bytes_to_mb, DatasetOverview, DatasetProfiler},
    },
    AppState,
};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/dataset/upload", post(upload_dataset))
        .route("/dataset/analyze", post(analyze_dataset))
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeParams {
    dataset_id: String,
}

struct UploadedFile {
    filename: String,
    data: Bytes,
}

async fn read_upload(mut multipart: Multipart) -> Result<UploadedFile, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(multipart_error)?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field
            .file_name()
            .map(str::to_string)
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| AppError::Validation("No filename provided".to_string()))?;
        let data = field.bytes().await.map_err(multipart_error)?;
        return Ok(UploadedFile { filename, data });
    }
    Err(AppError::Validation("No file provided".to_string()))
}

fn multipart_error(err: axum::extract::multipart::MultipartError) -> AppError {
    if err.status() == axum::http::StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge("File too large".to_string())
    } else {
        AppError::Validation(format!("Invalid multipart upload: {}", err.body_text()))
    }
}

fn validate_upload(upload: &UploadedFile, max_size: usize) -> Result<FileFormat, AppError> {
    let format = FileFormat::from_filename(&upload.filename).ok_or_else(|| {
        AppError::Validation(format!(
            "Unsupported file type. Supported formats: {}",
            FileFormat::supported_list()
        ))
    })?;

    if upload.data.len() > max_size {
        return Err(AppError::PayloadTooLarge(format!(
            "File too large. Maximum size: {}MB",
            max_size / (1024 * 1024)
        )));
    }

    if upload.data.is_empty() {
        return Err(AppError::Validation("Empty file uploaded".to_string()));
    }

    Ok(format)
}

fn load_and_summarise(format: FileFormat, path: &Path) -> Result<DatasetOverview, AppError> {
    let df = format.load(path)?;
    Ok(DatasetProfiler.overview(&df)?)
}

async fn discard(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!("Failed to remove {}: {}", path.display(), e);
        }
    }
}

/// Writes the upload to disk; a failed write leaves nothing behind.
async fn store_upload(path: &Path, data: &[u8]) -> Result<(), AppError> {
    if let Err(e) = tokio::fs::write(path, data).await {
        discard(path).await;
        return Err(e.into());
    }
    Ok(())
}

async fn upload_dataset(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<UploadData>>, AppError> {
    let start = std::time::Instant::now();
    let upload = read_upload(multipart).await?;
    let format = validate_upload(&upload, state.config.max_upload_size)?;

    let dataset_id = uuid::Uuid::new_v4().to_string();
    let file_path: PathBuf = state
        .config
        .temp_dir
        .join(format!("{}.{}", dataset_id, format.extension()));

    tracing::info!(
        "Storing upload {} ({} bytes) as dataset {}",
        upload.filename,
        upload.data.len(),
        dataset_id
    );
    tokio::fs::create_dir_all(&state.config.temp_dir).await?;
    store_upload(&file_path, &upload.data).await?;

    let task_path = file_path.clone();
    let summary = tokio::task::spawn_blocking(move || load_and_summarise(format, &task_path)).await;

    let overview = match summary {
        Ok(Ok(loaded)) => loaded,
        Ok(Err(err)) => {
            discard(&file_path).await;
            return Err(err.into_parse());
        }
        Err(join_err) => {
            discard(&file_path).await;
            return Err(join_err.into());
        }
    };

    let size_bytes = upload.data.len();
    let metadata = DatasetMetadata {
        dataset_id: dataset_id.clone(),
        filename: upload.filename.clone(),
        file_type: format,
        size_bytes,
        rows: overview.basic_info.rows,
        columns: overview.basic_info.columns,
        column_names: overview.basic_info.column_names.clone(),
        dtypes: overview.basic_info.dtypes.clone(),
        file_path,
    };
    state.registry.insert(metadata);

    tracing::info!(
        "Dataset {} uploaded: {} rows x {} columns in {:?}",
        dataset_id,
        overview.basic_info.rows,
        overview.basic_info.columns,
        start.elapsed()
    );

    Ok(Json(ApiResponse::success(
        "Dataset uploaded successfully",
        UploadData {
            dataset_id,
            filename: upload.filename,
            file_type: format,
            size_bytes,
            size_mb: bytes_to_mb(size_bytes),
            rows: overview.basic_info.rows,
            columns: overview.basic_info.columns,
            column_names: overview.basic_info.column_names,
            dtypes: overview.basic_info.dtypes,
            column_types: overview.column_types,
            missing_values: overview.missing_values,
            total_missing: overview.total_missing,
            duplicate_rows: overview.duplicate_rows,
            memory_usage_mb: overview.basic_info.memory_usage_mb,
            preview: overview.preview,
        },
    )))
}

async fn analyze_dataset(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AnalyzeParams>,
) -> Result<Json<ApiResponse<AnalysisData>>, AppError> {
    let metadata = state
        .registry
        .get(&params.dataset_id)
        .ok_or_else(|| AppError::NotFound("Dataset not found".to_string()))?;

    if !tokio::fs::try_exists(&metadata.file_path).await.unwrap_or(false) {
        return Err(AppError::NotFound("Dataset file not found".to_string()));
    }

    tracing::info!("Analyzing dataset {} ({})", metadata.dataset_id, metadata.filename);
    let format = metadata.file_type;
    let path = metadata.file_path.clone();
    let profile = tokio::task::spawn_blocking(move || {
        let df = format.load(&path)?;
        DatasetProfiler.profile(&df).map_err(AppError::from)
    })
    .await?
    .map_err(AppError::into_processing)?;

    Ok(Json(ApiResponse::success(
        "Dataset analysis completed",
        AnalysisData {
            dataset_id: metadata.dataset_id,
            filename: metadata.filename,
            profile,
        },
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(name: &str, data: &'static [u8]) -> UploadedFile {
        UploadedFile {
            filename: name.to_string(),
            data: Bytes::from_static(data),
        }
    }

    #[test]
    fn rejects_unsupported_extension_regardless_of_content() {
        let err = validate_upload(&upload("notes.txt", b"a,b\n1,2\n"), 1024).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn rejects_empty_file() {
        let err = validate_upload(&upload("data.csv", b""), 1024).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn rejects_oversized_file() {
        let err = validate_upload(&upload("data.csv", b"0123456789"), 4).unwrap_err();
        assert!(matches!(err, AppError::PayloadTooLarge(_)));
    }

    #[tokio::test]
    async fn stored_upload_lands_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ok.csv");
        store_upload(&path, b"a\n1\n").await.unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"a\n1\n");
    }

    #[tokio::test]
    async fn failed_store_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("upload.csv");
        let err = store_upload(&path, b"a\n1\n").await.unwrap_err();
        assert!(matches!(err, AppError::Io(_)));
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn summary_failure_reports_the_cause_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.parquet");
        std::fs::write(&path, b"not parquet").unwrap();

        let err = load_and_summarise(FileFormat::Parquet, &path).unwrap_err().into_parse();
        let detail = err.to_string();
        assert!(detail.starts_with("Error parsing file: "));
        assert_eq!(detail.matches("Error parsing file").count(), 1, "{}", detail);
        assert!(!detail.contains("Error analyzing dataset"), "{}", detail);
    }

    #[test]
    fn accepts_supported_file() {
        let format = validate_upload(&upload("Data.Parquet", b"PAR1"), 1024).unwrap();
        assert_eq!(format, FileFormat::Parquet);
    }
}
