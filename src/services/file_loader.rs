use std::fmt;
use std::fs::File;
use std::path::Path;
use polars::prelude::*;
use serde::Serialize;
use crate::error::AppError;
use crate::services::excel::ExcelProcessor;

const INFER_SCHEMA_ROWS: usize = 10_000;

/// Supported upload formats. Each variant owns exactly one loading strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    Csv,
    Xlsx,
    Xls,
    Json,
    Parquet,
}

impl FileFormat {
    pub const ALL: [FileFormat; 5] = [
        FileFormat::Csv,
        FileFormat::Xlsx,
        FileFormat::Xls,
        FileFormat::Json,
        FileFormat::Parquet,
    ];

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(FileFormat::Csv),
            "xlsx" => Some(FileFormat::Xlsx),
            "xls" => Some(FileFormat::Xls),
            "json" => Some(FileFormat::Json),
            "parquet" => Some(FileFormat::Parquet),
            _ => None,
        }
    }

    pub fn from_filename(filename: &str) -> Option<Self> {
        Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    pub fn extension(&self) -> &'static str {
        match self {
            FileFormat::Csv => "csv",
            FileFormat::Xlsx => "xlsx",
            FileFormat::Xls => "xls",
            FileFormat::Json => "json",
            FileFormat::Parquet => "parquet",
        }
    }

    /// Human readable list used in validation messages.
    pub fn supported_list() -> String {
        Self::ALL
            .iter()
            .map(|f| format!(".{}", f.extension()))
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn load(&self, path: &Path) -> Result<DataFrame, AppError> {
        tracing::debug!("Loading {} file {}", self, path.display());
        match self {
            FileFormat::Csv => load_csv(path),
            FileFormat::Xlsx | FileFormat::Xls => ExcelProcessor.load_first_sheet(path),
            FileFormat::Json => load_json(path),
            FileFormat::Parquet => load_parquet(path),
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

fn parse_error(kind: &str, err: PolarsError) -> AppError {
    AppError::Parse(format!("Failed to read {}: {}", kind, err))
}

fn load_csv(path: &Path) -> Result<DataFrame, AppError> {
    CsvReader::from_path(path)
        .map_err(|e| parse_error("CSV", e))?
        .has_header(true)
        .infer_schema(Some(INFER_SCHEMA_ROWS))
        .with_try_parse_dates(true)
        .finish()
        .map_err(|e| parse_error("CSV", e))
}

fn load_json(path: &Path) -> Result<DataFrame, AppError> {
    let file = File::open(path)?;
    JsonReader::new(file)
        .finish()
        .map_err(|e| parse_error("JSON", e))
}

fn load_parquet(path: &Path) -> Result<DataFrame, AppError> {
    let file = File::open(path)?;
    ParquetReader::new(file)
        .finish()
        .map_err(|e| parse_error("Parquet", e))
}
