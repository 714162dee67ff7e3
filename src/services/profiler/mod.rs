//! Statistical profile of a loaded dataset.
//!
//! Each submodule computes one independent part of the profile from a
//! [`DataFrame`]; [`DatasetProfiler`] runs them in order and assembles the
//! result. Nothing here touches the filesystem or the dataset registry, so
//! profiling the same frame twice yields identical output.

pub mod boolean;
pub mod categorical;
pub mod classifier;
pub mod completeness;
pub mod correlation;
pub mod datetime;
pub mod duplicates;
pub mod numeric;
pub mod preview;
pub mod quality;
pub mod values;

use indexmap::IndexMap;
use polars::prelude::*;
use serde::Serialize;

pub use classifier::{ColumnKind, ColumnTypes};
pub use correlation::CorrelationPair;
pub use quality::{QualityScore, QualityTier};

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

pub fn bytes_to_mb(bytes: usize) -> f64 {
    round2(bytes as f64 / BYTES_PER_MB)
}

/// Declared polars dtype of every column, in column order.
pub fn dtypes(df: &DataFrame) -> IndexMap<String, String> {
    df.get_columns()
        .iter()
        .map(|series| (series.name().to_string(), series.dtype().to_string()))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BasicInfo {
    pub rows: usize,
    pub columns: usize,
    pub column_names: Vec<String>,
    pub dtypes: IndexMap<String, String>,
    pub memory_usage_mb: f64,
}

/// The lighter summary returned right after an upload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetOverview {
    pub basic_info: BasicInfo,
    pub column_types: ColumnTypes,
    pub missing_values: IndexMap<String, usize>,
    pub total_missing: usize,
    pub duplicate_rows: usize,
    pub preview: Vec<preview::Row>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetProfile {
    pub basic_info: BasicInfo,
    pub column_types: ColumnTypes,
    pub missing_values: completeness::MissingValues,
    pub duplicates: duplicates::Duplicates,
    pub numeric_stats: IndexMap<String, numeric::NumericStats>,
    pub categorical_stats: IndexMap<String, categorical::CategoricalStats>,
    pub datetime_stats: IndexMap<String, datetime::DatetimeStats>,
    pub boolean_stats: IndexMap<String, boolean::BooleanStats>,
    pub high_correlations: Vec<CorrelationPair>,
    pub quality_score: QualityScore,
    pub preview: preview::Preview,
}

pub struct DatasetProfiler;

impl DatasetProfiler {
    fn basic_info(&self, df: &DataFrame) -> BasicInfo {
        BasicInfo {
            rows: df.height(),
            columns: df.width(),
            column_names: df.get_column_names().iter().map(|s| s.to_string()).collect(),
            dtypes: dtypes(df),
            memory_usage_mb: bytes_to_mb(df.estimated_size()),
        }
    }

    pub fn overview(&self, df: &DataFrame) -> PolarsResult<DatasetOverview> {
        let missing = completeness::analyze(df)?;
        Ok(DatasetOverview {
            basic_info: self.basic_info(df),
            column_types: classifier::classify(df),
            missing_values: missing.counts(),
            total_missing: missing.total_missing,
            duplicate_rows: duplicates::count_duplicate_rows(df)?,
            preview: preview::head(df, preview::PREVIEW_ROWS)?,
        })
    }

    pub fn profile(&self, df: &DataFrame) -> PolarsResult<DatasetProfile> {
        let start = std::time::Instant::now();
        let column_types = classifier::classify(df);
        tracing::debug!(
            "Column types: {} numeric, {} categorical, {} datetime, {} boolean",
            column_types.numeric.len(),
            column_types.categorical.len(),
            column_types.datetime.len(),
            column_types.boolean.len()
        );

        let missing_values = completeness::analyze(df)?;
        let duplicates = duplicates::analyze(df)?;
        let numeric_stats = numeric::analyze(df, &column_types.numeric)?;
        let categorical_stats = categorical::analyze(df, &column_types.categorical)?;
        let datetime_stats = datetime::analyze(df, &column_types.datetime)?;
        let boolean_stats = boolean::analyze(df, &column_types.boolean)?;
        let high_correlations = correlation::high_correlations(df, &column_types.numeric)?;
        let quality_score = quality::score(
            df.height(),
            df.width(),
            missing_values.total_missing,
            duplicates.duplicate_rows,
        );

        tracing::info!(
            "Profiled {} rows x {} columns in {:?}, quality {} ({:?})",
            df.height(),
            df.width(),
            start.elapsed(),
            quality_score.overall_score,
            quality_score.quality_tier
        );

        Ok(DatasetProfile {
            basic_info: self.basic_info(df),
            column_types,
            missing_values,
            duplicates,
            numeric_stats,
            categorical_stats,
            datetime_stats,
            boolean_stats,
            high_correlations,
            quality_score,
            preview: preview::preview(df)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn age_city() -> DataFrame {
        df!(
            "age" => &[Some(25i64), Some(30), None, Some(25)],
            "city" => &["NY", "LA", "NY", "NY"],
        )
        .unwrap()
    }

    #[test]
    fn rounding_helpers() {
        assert_eq!(round2(81.255_1), 81.26);
        assert_eq!(round3(0.949_6), 0.95);
        assert_eq!(bytes_to_mb(1024 * 1024), 1.0);
    }

    #[test]
    fn profiles_the_age_city_example() {
        let profile = DatasetProfiler.profile(&age_city()).unwrap();

        assert_eq!(profile.basic_info.rows, 4);
        assert_eq!(profile.basic_info.columns, 2);
        assert_eq!(profile.column_types.numeric, vec!["age"]);
        assert_eq!(profile.column_types.categorical, vec!["city"]);
        assert_eq!(profile.missing_values.total_missing, 1);
        assert_eq!(profile.missing_values.missing_by_column["age"].count, 1);
        assert_eq!(profile.missing_values.missing_by_column["city"].count, 0);
        assert_eq!(profile.duplicates.duplicate_rows, 1);

        let city = &profile.categorical_stats["city"];
        assert_eq!(city.unique_values, 2);
        assert_eq!(city.top_values["NY"], 3);
        assert_eq!(city.top_values["LA"], 1);
        assert_eq!(city.cardinality, categorical::Cardinality::Low);

        assert!(profile.high_correlations.is_empty());
        assert_eq!(profile.quality_score.total_cells, 8);
    }

    #[test]
    fn no_numeric_columns_means_empty_numeric_sections() {
        let df = df!("city" => &["NY", "LA"], "flag" => &[true, false]).unwrap();
        let profile = DatasetProfiler.profile(&df).unwrap();
        assert!(profile.numeric_stats.is_empty());
        assert!(profile.high_correlations.is_empty());
        assert_eq!(profile.boolean_stats["flag"].true_count, 1);
    }

    #[test]
    fn profiling_is_idempotent() {
        let df = df!(
            "a" => &[1.0f64, 2.0, 3.0, 4.0, 5.0],
            "b" => &[2.0f64, 4.1, 6.0, 8.2, 9.9],
            "c" => &["x", "y", "x", "z", "x"],
        )
        .unwrap();

        let first = serde_json::to_string(&DatasetProfiler.profile(&df).unwrap()).unwrap();
        let second = serde_json::to_string(&DatasetProfiler.profile(&df).unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn undefined_statistics_serialize_as_null() {
        let df = df!("x" => &[7i64]).unwrap();
        let profile = DatasetProfiler.profile(&df).unwrap();
        let json = serde_json::to_value(&profile).unwrap();
        assert!(json["numeric_stats"]["x"]["std"].is_null());
        assert!(json["numeric_stats"]["x"]["skewness"].is_null());
        assert_eq!(json["numeric_stats"]["x"]["mean"], serde_json::json!(7.0));
        assert_eq!(json["duplicates"]["duplicate_rows"], serde_json::json!(0));
    }

    #[test]
    fn overview_summarises_upload() {
        let overview = DatasetProfiler.overview(&age_city()).unwrap();
        assert_eq!(overview.total_missing, 1);
        assert_eq!(overview.missing_values["age"], 1);
        assert_eq!(overview.duplicate_rows, 1);
        assert_eq!(overview.preview.len(), 4);
        assert_eq!(overview.basic_info.column_names, vec!["age", "city"]);
    }
}
