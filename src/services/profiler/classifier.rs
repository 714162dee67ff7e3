use polars::prelude::*;
use serde::Serialize;

use super::values::is_temporal;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Numeric,
    Categorical,
    Datetime,
    Boolean,
}

impl ColumnKind {
    /// Anything that is not a number, a flag or a timestamp is treated as categorical.
    pub fn of(dtype: &DataType) -> Self {
        if dtype == &DataType::Boolean {
            ColumnKind::Boolean
        } else if dtype.is_numeric() {
            ColumnKind::Numeric
        } else if is_temporal(dtype) {
            ColumnKind::Datetime
        } else {
            ColumnKind::Categorical
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ColumnTypes {
    pub numeric: Vec<String>,
    pub categorical: Vec<String>,
    pub datetime: Vec<String>,
    pub boolean: Vec<String>,
}

impl ColumnTypes {
    pub fn len(&self) -> usize {
        self.numeric.len() + self.categorical.len() + self.datetime.len() + self.boolean.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub fn classify(df: &DataFrame) -> ColumnTypes {
    let mut types = ColumnTypes::default();
    for series in df.get_columns() {
        let name = series.name().to_string();
        match ColumnKind::of(series.dtype()) {
            ColumnKind::Numeric => types.numeric.push(name),
            ColumnKind::Categorical => types.categorical.push(name),
            ColumnKind::Datetime => types.datetime.push(name),
            ColumnKind::Boolean => types.boolean.push(name),
        }
    }
    types
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_column_lands_in_exactly_one_bucket() {
        let ts = Series::new("when", &[Some(0i64), Some(1)])
            .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))
            .unwrap();
        let df = DataFrame::new(vec![
            Series::new("age", &[1i64, 2]),
            Series::new("city", &["NY", "LA"]),
            ts,
            Series::new("score", &[1.5f64, 2.5]),
            Series::new("active", &[true, false]),
        ])
        .unwrap();

        let types = classify(&df);
        assert_eq!(types.numeric, vec!["age", "score"]);
        assert_eq!(types.categorical, vec!["city"]);
        assert_eq!(types.datetime, vec!["when"]);
        assert_eq!(types.boolean, vec!["active"]);
        assert_eq!(types.len(), df.width());
    }

    #[test]
    fn dates_and_times_are_datetime() {
        assert_eq!(ColumnKind::of(&DataType::Date), ColumnKind::Datetime);
        assert_eq!(ColumnKind::of(&DataType::Time), ColumnKind::Datetime);
        assert_eq!(
            ColumnKind::of(&DataType::Datetime(TimeUnit::Microseconds, None)),
            ColumnKind::Datetime
        );
    }

    #[test]
    fn all_null_column_defaults_to_categorical() {
        let s = Series::full_null("empty", 3, &DataType::Null);
        assert_eq!(ColumnKind::of(s.dtype()), ColumnKind::Categorical);
    }
}
