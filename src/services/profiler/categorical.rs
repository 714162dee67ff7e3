use std::collections::HashMap;

use indexmap::IndexMap;
use polars::prelude::*;
use serde::Serialize;

use super::values::{column_to_json, value_label};

pub const TOP_VALUES_LIMIT: usize = 10;
const LOW_CARDINALITY_MAX: usize = 10;
const HIGH_CARDINALITY_RATIO: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Cardinality {
    Low,
    Medium,
    High,
}

impl Cardinality {
    pub fn classify(unique_values: usize, rows: usize) -> Self {
        if unique_values as f64 > HIGH_CARDINALITY_RATIO * rows as f64 {
            Cardinality::High
        } else if unique_values <= LOW_CARDINALITY_MAX {
            Cardinality::Low
        } else {
            Cardinality::Medium
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoricalStats {
    pub unique_values: usize,
    pub top_values: IndexMap<String, usize>,
    pub cardinality: Cardinality,
}

/// Most frequent labels, count descending, ties in order of first appearance.
pub fn top_values<I>(labels: I, limit: usize) -> (usize, IndexMap<String, usize>)
where
    I: IntoIterator<Item = String>,
{
    // label -> (first position, occurrences)
    let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
    for (position, label) in labels.into_iter().enumerate() {
        counts.entry(label).or_insert((position, 0)).1 += 1;
    }

    let unique = counts.len();
    let mut ranked: Vec<(String, (usize, usize))> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1 .1.cmp(&a.1 .1).then(a.1 .0.cmp(&b.1 .0)));

    let top = ranked
        .into_iter()
        .take(limit)
        .map(|(label, (_, count))| (label, count))
        .collect();
    (unique, top)
}

pub fn describe(series: &Series) -> PolarsResult<CategoricalStats> {
    let labels = column_to_json(series)?
        .iter()
        .filter_map(value_label)
        .collect::<Vec<_>>();
    let (unique_values, top_values) = top_values(labels, TOP_VALUES_LIMIT);

    Ok(CategoricalStats {
        unique_values,
        top_values,
        cardinality: Cardinality::classify(unique_values, series.len()),
    })
}

pub fn analyze(df: &DataFrame, columns: &[String]) -> PolarsResult<IndexMap<String, CategoricalStats>> {
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
    fn city_column_profile() {
        let s = Series::new("city", &["NY", "LA", "NY", "NY"]);
        let stats = describe(&s).unwrap();

        assert_eq!(stats.unique_values, 2);
        assert_eq!(stats.top_values.get("NY"), Some(&3));
        assert_eq!(stats.top_values.get("LA"), Some(&1));
        assert_eq!(stats.top_values.keys().collect::<Vec<_>>(), vec!["NY", "LA"]);
        assert_eq!(stats.cardinality, Cardinality::Low);
    }

    #[test]
    fn ties_keep_first_seen_order() {
        let labels = ["b", "a", "c", "a", "b", "c"].iter().map(|s| s.to_string());
        let (unique, top) = top_values(labels, 10);
        assert_eq!(unique, 3);
        assert_eq!(top.keys().collect::<Vec<_>>(), vec!["b", "a", "c"]);
    }

    #[test]
    fn top_values_are_capped() {
        let labels = (0..25).map(|i| format!("v{}", i));
        let (unique, top) = top_values(labels, TOP_VALUES_LIMIT);
        assert_eq!(unique, 25);
        assert_eq!(top.len(), TOP_VALUES_LIMIT);
        assert_eq!(top.keys().next().map(String::as_str), Some("v0"));
    }

    #[test]
    fn nulls_are_not_values() {
        let s = Series::new("c", &[Some("x"), None, Some("x"), None]);
        let stats = describe(&s).unwrap();
        assert_eq!(stats.unique_values, 1);
        assert_eq!(stats.top_values.get("x"), Some(&2));
    }

    #[test]
    fn cardinality_tiers() {
        assert_eq!(Cardinality::classify(6, 10), Cardinality::High);
        assert_eq!(Cardinality::classify(5, 10), Cardinality::Low);
        assert_eq!(Cardinality::classify(10, 100), Cardinality::Low);
        assert_eq!(Cardinality::classify(11, 100), Cardinality::Medium);
        assert_eq!(Cardinality::classify(51, 100), Cardinality::High);
        assert_eq!(Cardinality::classify(0, 0), Cardinality::Low);
    }
}
