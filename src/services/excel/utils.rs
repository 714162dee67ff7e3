use std::collections::HashSet;
use calamine::Data;
use chrono::{NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

/// Days between the Excel epoch (1899-12-30) and the Unix epoch.
const EXCEL_UNIX_EPOCH_DAYS: f64 = 25569.0;
const MILLIS_PER_DAY: f64 = 86_400_000.0;
/// Share of non-empty cells that must agree before a column takes a type.
const TYPE_MAJORITY: f64 = 0.8;

static DATE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"^\d{4}-\d{2}-\d{2}$",
        r"^\d{4}-\d{2}-\d{2}[ T]\d{2}:\d{2}(:\d{2})?$",
        r"^\d{2}/\d{2}/\d{4}$",
        r"^\d{4}/\d{2}/\d{2}$",
        r"^\d{2}-\d{2}-\d{4}$",
    ]
    .iter()
    .filter_map(|pattern| Regex::new(pattern).ok())
    .collect()
});

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

const DATE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d/%m/%Y", "%d-%m-%Y"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Numeric,
    Boolean,
    Date,
    Text,
    Empty,
}

/// Header names are kept as written; blanks get a positional name and repeats
/// get a numeric suffix.
pub fn unique_column_name(name: &str, index: usize, existing_names: &mut HashSet<String>) -> String {
    let trimmed = name.trim();
    let base_name = if trimmed.is_empty() {
        format!("column_{}", index)
    } else {
        trimmed.to_string()
    };

    let mut cleaned = base_name.clone();
    let mut counter = 1;
    while !existing_names.insert(cleaned.clone()) {
        cleaned = format!("{}_{}", base_name, counter);
        counter += 1;
    }

    cleaned
}

pub fn is_date_string(s: &str) -> bool {
    let s = s.trim();
    DATE_PATTERNS.iter().any(|re| re.is_match(s))
}

pub fn parse_date_string_millis(s: &str) -> Option<i64> {
    let s = s.trim();
    for format in DATETIME_FORMATS.iter() {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt.and_utc().timestamp_millis());
        }
    }
    for format in DATE_FORMATS.iter() {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return date
                .and_hms_opt(0, 0, 0)
                .map(|dt| dt.and_utc().timestamp_millis());
        }
    }
    None
}

pub fn excel_serial_to_millis(serial: f64) -> i64 {
    ((serial - EXCEL_UNIX_EPOCH_DAYS) * MILLIS_PER_DAY).round() as i64
}

pub fn cell_to_millis(value: &Data) -> Option<i64> {
    match value {
        Data::DateTime(d) => Some(excel_serial_to_millis(d.as_f64())),
        Data::DateTimeIso(s) | Data::String(s) => parse_date_string_millis(s),
        _ => None,
    }
}

pub fn cell_kind(value: &Data) -> CellKind {
    match value {
        Data::Empty => CellKind::Empty,
        Data::String(s) if s.trim().is_empty() => CellKind::Empty,
        Data::Float(_) | Data::Int(_) => CellKind::Numeric,
        Data::Bool(_) => CellKind::Boolean,
        Data::DateTime(_) | Data::DateTimeIso(_) => CellKind::Date,
        Data::String(s) if is_date_string(s) => CellKind::Date,
        _ => CellKind::Text,
    }
}

pub fn detect_column_type(values: &[Data]) -> CellKind {
    let (numeric_count, date_count, bool_count, total) = values
        .iter()
        .map(cell_kind)
        .filter(|kind| *kind != CellKind::Empty)
        .fold((0usize, 0usize, 0usize, 0usize), |(num, date, bool, total), kind| match kind {
            CellKind::Numeric => (num + 1, date, bool, total + 1),
            CellKind::Date => (num, date + 1, bool, total + 1),
            CellKind::Boolean => (num, date, bool + 1, total + 1),
            _ => (num, date, bool, total + 1),
        });

    if total == 0 {
        return CellKind::Empty;
    }

    let threshold = total as f64 * TYPE_MAJORITY;
    match () {
        _ if numeric_count as f64 >= threshold => CellKind::Numeric,
        _ if date_count as f64 >= threshold => CellKind::Date,
        _ if bool_count as f64 >= threshold => CellKind::Boolean,
        _ => CellKind::Text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_and_blank_headers_are_made_unique() {
        let mut seen = HashSet::new();
        assert_eq!(unique_column_name("price", 0, &mut seen), "price");
        assert_eq!(unique_column_name("price", 1, &mut seen), "price_1");
        assert_eq!(unique_column_name("  ", 2, &mut seen), "column_2");
    }

    #[test]
    fn recognises_common_date_layouts() {
        assert!(is_date_string("2024-03-01"));
        assert!(is_date_string("01/03/2024"));
        assert!(is_date_string("2024-03-01 10:30:00"));
        assert!(!is_date_string("March"));
        assert!(!is_date_string("12345"));
    }

    #[test]
    fn excel_serial_converts_to_unix_millis() {
        // 1970-01-01 is serial 25569, 2000-01-01 is serial 36526
        assert_eq!(excel_serial_to_millis(25569.0), 0);
        assert_eq!(excel_serial_to_millis(36526.0), 946_684_800_000);
    }

    #[test]
    fn majority_decides_column_type() {
        let values = vec![
            Data::Int(1),
            Data::Float(2.5),
            Data::Empty,
            Data::Int(3),
            Data::Int(4),
            Data::String("n/a".to_string()),
        ];
        assert_eq!(detect_column_type(&values), CellKind::Numeric);

        let mixed = vec![Data::Int(1), Data::String("a".to_string())];
        assert_eq!(detect_column_type(&mixed), CellKind::Text);

        assert_eq!(detect_column_type(&[Data::Empty]), CellKind::Empty);
    }

    #[test]
    fn date_strings_parse_to_millis() {
        assert_eq!(parse_date_string_millis("1970-01-02"), Some(86_400_000));
        assert_eq!(parse_date_string_millis("not a date"), None);
    }
}
