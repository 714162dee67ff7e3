use indexmap::IndexMap;
use polars::prelude::*;
use serde::Serialize;

use super::round2;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BooleanStats {
    pub true_count: usize,
    pub false_count: usize,
    /// Share of `true` among non-null values; `None` when the column is all null.
    pub true_percentage: Option<f64>,
}

pub fn describe(series: &Series) -> PolarsResult<BooleanStats> {
    let (true_count, false_count) = series
        .bool()?
        .into_iter()
        .flatten()
        .fold((0, 0), |(t, f), v| if v { (t + 1, f) } else { (t, f + 1) });

    let total = true_count + false_count;
    let true_percentage = (total > 0).then(|| round2(true_count as f64 / total as f64 * 100.0));

    Ok(BooleanStats {
        true_count,
        false_count,
        true_percentage,
    })
}

pub fn analyze(df: &DataFrame, columns: &[String]) -> PolarsResult<IndexMap<String, BooleanStats>> {
    columns
        .iter()
        .map(|name| {
            let series = df.column(name)?;
            describe(series).map(|stats| (name.clone(), stats))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_each_flag() {
        let s = Series::new("active", &[Some(true), Some(false), None, Some(true)]);
        let stats = describe(&s).unwrap();
        assert_eq!(stats.true_count, 2);
        assert_eq!(stats.false_count, 1);
        assert_eq!(stats.true_percentage, Some(66.67));
    }

    #[test]
    fn all_null_has_no_percentage() {
        let s = Series::new("active", &[None::<bool>, None]);
        assert_eq!(describe(&s).unwrap().true_percentage, None);
    }
}
