//! Descriptive statistics for numeric columns.
//!
//! Missing values (nulls and NaN) are dropped before anything is computed.
//! Statistics that are undefined for the remaining values are reported as
//! `None` so a computed zero is never confused with "not computable":
//!
//! - `mean`, `min`, quartiles and `max` need at least one value
//! - `std` needs two values
//! - `skewness` needs three values and a non-constant column
//! - `kurtosis` needs four values and a non-constant column

use indexmap::IndexMap;
use polars::prelude::*;
use rayon::prelude::*;
use serde::Serialize;

use super::values::float_values;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericStats {
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    #[serde(rename = "25%")]
    pub q25: Option<f64>,
    #[serde(rename = "50%")]
    pub median: Option<f64>,
    #[serde(rename = "75%")]
    pub q75: Option<f64>,
    pub max: Option<f64>,
    pub skewness: Option<f64>,
    pub kurtosis: Option<f64>,
    pub zeros: usize,
    pub negatives: usize,
}

fn finite(v: Option<f64>) -> Option<f64> {
    v.filter(|x| x.is_finite())
}

fn quantile(ca: &Float64Chunked, q: f64) -> Option<f64> {
    ca.quantile(q, QuantileInterpolOptions::Linear)
        .ok()
        .flatten()
        .and_then(|v| finite(Some(v)))
}

/// Adjusted Fisher-Pearson skewness and bias-corrected excess kurtosis.
fn shape_moments(values: &[f64], mean: f64) -> (Option<f64>, Option<f64>) {
    let n = values.len() as f64;
    let (s2, s3, s4) = values.iter().fold((0.0, 0.0, 0.0), |(s2, s3, s4), x| {
        let d = x - mean;
        let d2 = d * d;
        (s2 + d2, s3 + d2 * d, s4 + d2 * d2)
    });

    if s2 <= 0.0 {
        return (None, None);
    }

    let skewness = (values.len() >= 3).then(|| {
        let m2 = s2 / n;
        let m3 = s3 / n;
        (n * (n - 1.0)).sqrt() / (n - 2.0) * m3 / m2.powf(1.5)
    });

    let kurtosis = (values.len() >= 4).then(|| {
        let denom = (n - 2.0) * (n - 3.0);
        (n + 1.0) * n * (n - 1.0) * s4 / (denom * s2 * s2) - 3.0 * (n - 1.0).powi(2) / denom
    });

    (finite(skewness), finite(kurtosis))
}

pub fn describe(series: &Series) -> PolarsResult<NumericStats> {
    let values: Vec<f64> = float_values(series)?.into_iter().flatten().collect();
    let zeros = values.iter().filter(|v| **v == 0.0).count();
    let negatives = values.iter().filter(|v| **v < 0.0).count();

    let ca = Float64Chunked::from_vec(series.name(), values.clone());
    let mean = finite(ca.mean());
    let min = ca.min();
    let max = ca.max();
    let std = if values.len() >= 2 { finite(ca.std(1)) } else { None };

    // A constant column has no shape, regardless of float noise in the mean.
    let (skewness, kurtosis) = match (mean, min, max) {
        (Some(mean), Some(min), Some(max)) if min < max => shape_moments(&values, mean),
        _ => (None, None),
    };

    Ok(NumericStats {
        count: values.len(),
        mean,
        std,
        min,
        q25: quantile(&ca, 0.25),
        median: quantile(&ca, 0.5),
        q75: quantile(&ca, 0.75),
        max,
        skewness,
        kurtosis,
        zeros,
        negatives,
    })
}

/// Statistics for each named column, keyed in the order given.
pub fn analyze(df: &DataFrame, columns: &[String]) -> PolarsResult<IndexMap<String, NumericStats>> {
    let stats = columns
        .par_iter()
        .map(|name| {
            let series = df.column(name)?;
            describe(series).map(|stats| (name.clone(), stats))
        })
        .collect::<PolarsResult<Vec<_>>>()?;
    Ok(stats.into_iter().collect())
}
