use indexmap::IndexMap;
use polars::prelude::*;
use serde::Serialize;
use serde_json::Value;

use super::values::column_to_json;

pub const PREVIEW_ROWS: usize = 5;

pub type Row = IndexMap<String, Value>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Preview {
    pub head: Vec<Row>,
    pub tail: Vec<Row>,
}

/// Rows of a frame as ordered column -> value maps.
pub fn records(df: &DataFrame) -> PolarsResult<Vec<Row>> {
    let columns = df
        .get_columns()
        .iter()
        .map(|series| column_to_json(series).map(|values| (series.name().to_string(), values)))
        .collect::<PolarsResult<Vec<_>>>()?;

    Ok((0..df.height())
        .map(|row| {
            columns
                .iter()
                .map(|(name, values)| (name.clone(), values[row].clone()))
                .collect()
        })
        .collect())
}

pub fn head(df: &DataFrame, n: usize) -> PolarsResult<Vec<Row>> {
    records(&df.head(Some(n)))
}

pub fn preview(df: &DataFrame) -> PolarsResult<Preview> {
    Ok(Preview {
        head: head(df, PREVIEW_ROWS)?,
        tail: records(&df.tail(Some(PREVIEW_ROWS)))?,
    })
}
