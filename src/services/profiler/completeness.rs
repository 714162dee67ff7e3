use indexmap::IndexMap;
use polars::prelude::*;
use serde::Serialize;

use super::round2;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnMissing {
    pub count: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissingValues {
    pub total_missing: usize,
    pub missing_by_column: IndexMap<String, ColumnMissing>,
    pub columns_with_missing: Vec<String>,
}

impl MissingValues {
    /// Plain per-column counts, as reported on upload.
    pub fn counts(&self) -> IndexMap<String, usize> {
        self.missing_by_column
            .iter()
            .map(|(name, missing)| (name.clone(), missing.count))
            .collect()
    }
}

/// Nulls, plus NaN for floating point columns.
pub fn missing_count(series: &Series) -> PolarsResult<usize> {
    let nan_count = match series.dtype() {
        DataType::Float32 | DataType::Float64 => {
            let cast = series.cast(&DataType::Float64)?;
            cast.f64()?
                .into_iter()
                .filter(|v| v.is_some_and(f64::is_nan))
                .count()
        }
        _ => 0,
    };
    Ok(series.null_count() + nan_count)
}

pub fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        round2(part as f64 / total as f64 * 100.0)
    }
}

pub fn analyze(df: &DataFrame) -> PolarsResult<MissingValues> {
    let rows = df.height();
    let mut missing_by_column = IndexMap::with_capacity(df.width());
    let mut columns_with_missing = Vec::new();
    let mut total_missing = 0;

    for series in df.get_columns() {
        let count = missing_count(series)?;
        total_missing += count;
        if count > 0 {
            columns_with_missing.push(series.name().to_string());
        }
        missing_by_column.insert(
            series.name().to_string(),
            ColumnMissing {
                count,
                percentage: percentage(count, rows),
            },
        );
    }

    Ok(MissingValues {
        total_missing,
        missing_by_column,
        columns_with_missing,
    })
}
