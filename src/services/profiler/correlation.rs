use polars::prelude::*;
use serde::Serialize;

use super::round3;
use super::values::float_values;

pub const CORRELATION_THRESHOLD: f64 = 0.7;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationPair {
    pub column1: String,
    pub column2: String,
    pub correlation: f64,
}

/// Float view of a numeric column with NaN folded into nulls.
fn float_chunked(series: &Series) -> PolarsResult<Float64Chunked> {
    let mut ca: Float64Chunked = float_values(series)?.into_iter().collect();
    ca.rename(series.name());
    Ok(ca)
}

fn is_constant(ca: &Float64Chunked) -> bool {
    ca.min() == ca.max()
}

/// Pearson coefficient over the rows where both values are present.
/// `None` when fewer than two rows remain or either side is constant.
pub fn pearson(x: &Float64Chunked, y: &Float64Chunked) -> PolarsResult<Option<f64>> {
    let mask = x.is_not_null() & y.is_not_null();
    let x = x.filter(&mask)?;
    let y = y.filter(&mask)?;

    if x.len() < 2 || is_constant(&x) || is_constant(&y) {
        return Ok(None);
    }

    Ok(cov::pearson_corr(&x, &y, 1)
        .filter(|r| r.is_finite())
        .map(|r| r.clamp(-1.0, 1.0)))
}

pub fn is_high(r: f64) -> bool {
    r.abs() > CORRELATION_THRESHOLD
}

/// Every pair of numeric columns, in column order, whose absolute
/// correlation exceeds [`CORRELATION_THRESHOLD`].
pub fn high_correlations(df: &DataFrame, numeric_columns: &[String]) -> PolarsResult<Vec<CorrelationPair>> {
    if numeric_columns.len() < 2 {
        return Ok(Vec::new());
    }

    let columns = numeric_columns
        .iter()
        .map(|name| df.column(name).and_then(float_chunked))
        .collect::<PolarsResult<Vec<_>>>()?;

    let mut pairs = Vec::new();
    for i in 0..columns.len() {
        for j in (i + 1)..columns.len() {
            if let Some(r) = pearson(&columns[i], &columns[j])? {
                if is_high(r) {
                    pairs.push(CorrelationPair {
                        column1: numeric_columns[i].clone(),
                        column2: numeric_columns[j].clone(),
                        correlation: round3(r),
                    });
                }
            }
        }
    }
    Ok(pairs)
}
