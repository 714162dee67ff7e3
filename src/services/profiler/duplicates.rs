use polars::prelude::*;
use serde::Serialize;

use super::completeness::percentage;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Duplicates {
    pub duplicate_rows: usize,
    pub duplicate_percentage: f64,
}

/// Number of rows whose every cell equals the cells of some earlier row.
/// Rows are grouped on all columns at once, so each group beyond its first
/// row contributes one duplicate.
pub fn count_duplicate_rows(df: &DataFrame) -> PolarsResult<usize> {
    if df.height() < 2 || df.width() == 0 {
        return Ok(0);
    }

    let groups = df.group_by(df.get_column_names())?.take_groups();
    Ok(df.height() - groups.len())
}

pub fn analyze(df: &DataFrame) -> PolarsResult<Duplicates> {
    let duplicate_rows = count_duplicate_rows(df)?;
    Ok(Duplicates {
        duplicate_rows,
        duplicate_percentage: percentage(duplicate_rows, df.height()),
    })
}
