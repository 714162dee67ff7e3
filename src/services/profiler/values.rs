//! Conversion of polars columns into plain JSON values and epoch timestamps.
//!
//! Every component that needs to look at individual cells (duplicate keys,
//! categorical frequencies, previews) goes through [`column_to_json`] so the
//! same cell always renders the same way.

use chrono::DateTime;
use polars::prelude::*;
use serde_json::{Number, Value};

pub const MILLIS_PER_DAY: i64 = 86_400_000;
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const TIME_FORMAT: &str = "%H:%M:%S";

fn is_float(dtype: &DataType) -> bool {
    matches!(dtype, DataType::Float32 | DataType::Float64)
}

pub fn is_temporal(dtype: &DataType) -> bool {
    matches!(dtype, DataType::Date | DataType::Datetime(_, _) | DataType::Time)
}

/// NaN is missing; infinities have no JSON number form and render as text.
fn float_to_json(v: Option<f64>) -> Value {
    match v {
        Some(x) if x.is_infinite() => {
            Value::String(if x > 0.0 { "inf" } else { "-inf" }.to_string())
        }
        Some(x) => Number::from_f64(x).map(Value::Number).unwrap_or(Value::Null),
        None => Value::Null,
    }
}

/// Floating point values of a column; nulls and NaN both come back as `None`.
pub fn float_values(series: &Series) -> PolarsResult<Vec<Option<f64>>> {
    let cast = series.cast(&DataType::Float64)?;
    Ok(cast
        .f64()?
        .into_iter()
        .map(|v| v.filter(|x| !x.is_nan()))
        .collect())
}

fn to_millis(value: i64, unit: TimeUnit) -> i64 {
    match unit {
        TimeUnit::Nanoseconds => value.div_euclid(1_000_000),
        TimeUnit::Microseconds => value.div_euclid(1_000),
        TimeUnit::Milliseconds => value,
    }
}

/// Milliseconds since the Unix epoch for `Date` and `Datetime` columns, and
/// since midnight for `Time` columns. Any other dtype yields all `None`.
pub fn temporal_millis(series: &Series) -> PolarsResult<Vec<Option<i64>>> {
    match series.dtype() {
        DataType::Date => {
            let days = series.cast(&DataType::Int32)?;
            Ok(days
                .i32()?
                .into_iter()
                .map(|d| d.map(|d| i64::from(d) * MILLIS_PER_DAY))
                .collect())
        }
        DataType::Datetime(unit, _) => {
            let unit = *unit;
            let raw = series.cast(&DataType::Int64)?;
            Ok(raw
                .i64()?
                .into_iter()
                .map(|v| v.map(|v| to_millis(v, unit)))
                .collect())
        }
        DataType::Time => {
            let nanos = series.cast(&DataType::Int64)?;
            Ok(nanos
                .i64()?
                .into_iter()
                .map(|v| v.map(|v| to_millis(v, TimeUnit::Nanoseconds)))
                .collect())
        }
        _ => Ok(vec![None; series.len()]),
    }
}

pub fn format_millis(millis: i64) -> Option<String> {
    DateTime::from_timestamp_millis(millis)
        .map(|dt| dt.naive_utc().format(TIMESTAMP_FORMAT).to_string())
}

/// Formats a value from [`temporal_millis`]; times of day drop the date part.
pub fn format_temporal(dtype: &DataType, millis: i64) -> Option<String> {
    match dtype {
        DataType::Time => DateTime::from_timestamp_millis(millis)
            .map(|dt| dt.naive_utc().format(TIME_FORMAT).to_string()),
        _ => format_millis(millis),
    }
}

/// Renders each cell of a column as JSON, nulls and NaN as `null`.
pub fn column_to_json(series: &Series) -> PolarsResult<Vec<Value>> {
    let dtype = series.dtype();

    if dtype == &DataType::Boolean {
        return Ok(series
            .bool()?
            .into_iter()
            .map(|v| v.map(Value::Bool).unwrap_or(Value::Null))
            .collect());
    }

    if is_float(dtype) {
        return Ok(float_values(series)?.into_iter().map(float_to_json).collect());
    }

    if dtype.is_unsigned_integer() {
        let ints = series.cast(&DataType::UInt64)?;
        return Ok(ints
            .u64()?
            .into_iter()
            .map(|v| v.map(Value::from).unwrap_or(Value::Null))
            .collect());
    }

    if dtype.is_numeric() {
        let ints = series.cast(&DataType::Int64)?;
        return Ok(ints
            .i64()?
            .into_iter()
            .map(|v| v.map(Value::from).unwrap_or(Value::Null))
            .collect());
    }

    if is_temporal(dtype) {
        return Ok(temporal_millis(series)?
            .into_iter()
            .map(|v| {
                v.and_then(|millis| format_temporal(dtype, millis))
                    .map(Value::String)
                    .unwrap_or(Value::Null)
            })
            .collect());
    }

    match series.cast(&DataType::String) {
        Ok(strings) => Ok(strings
            .str()?
            .into_iter()
            .map(|v| v.map(|s| Value::String(s.to_string())).unwrap_or(Value::Null))
            .collect()),
        Err(_) => (0..series.len())
            .map(|idx| {
                series.get(idx).map(|value| match value {
                    AnyValue::Null => Value::Null,
                    other => Value::String(other.to_string()),
                })
            })
            .collect(),
    }
}

/// Text form of a JSON cell used for frequency counting; `None` for nulls.
pub fn value_label(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floats_render_nan_as_null() {
        let s = Series::new("x", &[Some(1.5), None, Some(f64::NAN)]);
        let values = column_to_json(&s).unwrap();
        assert_eq!(values, vec![Value::from(1.5), Value::Null, Value::Null]);
    }

    #[test]
    fn integers_stay_integers() {
        let s = Series::new("x", &[Some(25i64), None]);
        assert_eq!(column_to_json(&s).unwrap(), vec![Value::from(25), Value::Null]);
    }

    #[test]
    fn datetimes_render_as_timestamps() {
        let s = Series::new("t", &[Some(86_400_000i64), None])
            .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))
            .unwrap();
        let values = column_to_json(&s).unwrap();
        assert_eq!(values[0], Value::String("1970-01-02 00:00:00".to_string()));
        assert_eq!(values[1], Value::Null);
    }

    #[test]
    fn nanosecond_datetimes_convert_to_millis() {
        let s = Series::new("t", &[Some(1_500_000_000i64)])
            .cast(&DataType::Datetime(TimeUnit::Nanoseconds, None))
            .unwrap();
        assert_eq!(temporal_millis(&s).unwrap(), vec![Some(1_500)]);
    }

    #[test]
    fn infinities_render_as_text() {
        let s = Series::new("x", &[Some(f64::INFINITY), Some(f64::NEG_INFINITY), None]);
        let values = column_to_json(&s).unwrap();
        assert_eq!(values, vec![Value::from("inf"), Value::from("-inf"), Value::Null]);
    }

    #[test]
    fn large_unsigned_integers_keep_their_value() {
        let s = Series::new("x", &[u64::MAX, u64::MAX - 1]);
        let values = column_to_json(&s).unwrap();
        assert_eq!(values, vec![Value::from(u64::MAX), Value::from(u64::MAX - 1)]);
    }

    #[test]
    fn times_of_day_are_temporal() {
        assert!(is_temporal(&DataType::Time));

        // 13:30:05 and 00:00:01.5 as nanoseconds since midnight
        let s = Series::new("t", &[Some(48_605_000_000_000i64), Some(1_500_000_000), None])
            .cast(&DataType::Time)
            .unwrap();
        assert_eq!(temporal_millis(&s).unwrap(), vec![Some(48_605_000), Some(1_500), None]);

        let values = column_to_json(&s).unwrap();
        assert_eq!(values[0], Value::String("13:30:05".to_string()));
        assert_eq!(values[1], Value::String("00:00:01".to_string()));
        assert_eq!(values[2], Value::Null);
    }

    #[test]
    fn labels_skip_nulls() {
        assert_eq!(value_label(&Value::Null), None);
        assert_eq!(value_label(&Value::String("NY".into())), Some("NY".to_string()));
        assert_eq!(value_label(&Value::from(3)), Some("3".to_string()));
    }
}
