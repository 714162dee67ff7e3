use indexmap::IndexMap;
use polars::prelude::*;
use serde::Serialize;

use super::values::{format_temporal, temporal_millis, MILLIS_PER_DAY};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatetimeStats {
    pub min: Option<String>,
    pub max: Option<String>,
    pub range_days: Option<i64>,
}

pub fn describe(series: &Series) -> PolarsResult<DatetimeStats> {
    let millis = temporal_millis(series)?;
    let bounds = millis
        .into_iter()
        .flatten()
        .fold(None, |acc: Option<(i64, i64)>, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        });

    Ok(match bounds {
        Some((lo, hi)) => DatetimeStats {
            min: format_temporal(series.dtype(), lo),
            max: format_temporal(series.dtype(), hi),
            range_days: Some((hi - lo).div_euclid(MILLIS_PER_DAY)),
        },
        None => DatetimeStats {
            min: None,
            max: None,
            range_days: None,
        },
    })
}

pub fn analyze(df: &DataFrame, columns: &[String]) -> PolarsResult<IndexMap<String, DatetimeStats>> {
    columns
        .iter()
        .map(|name| {
            let series = df.column(name)?;
            describe(series).map(|stats| (name.clone(), stats))
        })
        .collect()
}
