use super::utils::*;
use std::collections::HashSet;
use std::path::Path;
use calamine::{open_workbook_auto, Data, Reader};
use crate::error::AppError;
use polars::prelude::*;

pub struct ExcelProcessor;

impl ExcelProcessor {
    /// Reads the first worksheet into a frame, treating the first row as the header.
    pub fn load_first_sheet(&self, path: &Path) -> Result<DataFrame, AppError> {
        tracing::info!("Opening workbook {}", path.display());
        let mut workbook = open_workbook_auto(path)
            .map_err(|e| AppError::Parse(format!("Failed to open Excel file: {}", e)))?;

        let sheet_names = workbook.sheet_names().to_vec();
        tracing::debug!("Found {} sheets: {:?}", sheet_names.len(), sheet_names);

        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| AppError::Parse("No sheets found in workbook".to_string()))?
            .map_err(|e| AppError::Parse(format!("Failed to read worksheet: {}", e)))?;

        let rows: Vec<Vec<Data>> = range.rows().map(|row| row.to_vec()).collect();
        if rows.is_empty() {
            return Err(AppError::Parse("Worksheet is empty".to_string()));
        }

        let mut existing_names = HashSet::new();
        let headers = rows
            .first()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .map(|(idx, cell)| unique_column_name(&cell.to_string(), idx, &mut existing_names))
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();

        tracing::info!(
            "Creating dataframe for sheet {} with {} data rows",
            sheet_names.first().map(String::as_str).unwrap_or("?"),
            rows.len() - 1
        );
        self.create_dataframe(&rows, &headers)
    }

    pub fn create_dataframe(&self, rows: &[Vec<Data>], headers: &[String]) -> Result<DataFrame, AppError> {
        if headers.is_empty() {
            return Err(AppError::Parse("Worksheet has no header row".to_string()));
        }

        let mut columns = Vec::with_capacity(headers.len());

        for (col_idx, header) in headers.iter().enumerate() {
            let values: Vec<Data> = rows.iter()
                .skip(1) // Skip header row
                .map(|row| row.get(col_idx).cloned().unwrap_or(Data::Empty))
                .collect();

            let series = match detect_column_type(&values) {
                CellKind::Numeric => {
                    let nums: Vec<Option<f64>> = values.iter().map(|v| match v {
                        Data::Float(f) => Some(*f),
                        Data::Int(i) => Some(*i as f64),
                        _ => None,
                    }).collect();
                    Series::new(header, nums)
                },
                CellKind::Boolean => {
                    let flags: Vec<Option<bool>> = values.iter().map(|v| match v {
                        Data::Bool(b) => Some(*b),
                        _ => None,
                    }).collect();
                    Series::new(header, flags)
                },
                CellKind::Date => {
                    let millis: Vec<Option<i64>> = values.iter().map(cell_to_millis).collect();
                    Series::new(header, millis)
                        .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))
                        .map_err(|e| AppError::Parse(format!("Failed to convert dates in '{}': {}", header, e)))?
                },
                CellKind::Text | CellKind::Empty => {
                    let strings: Vec<Option<String>> = values.iter().map(|v| match v {
                        Data::Empty => None,
                        Data::String(s) if s.trim().is_empty() => None,
                        _ => Some(v.to_string()),
                    }).collect();
                    Series::new(header, strings)
                }
            };

            columns.push(series);
        }

        DataFrame::new(columns)
            .map_err(|e| AppError::Parse(format!("Failed to create DataFrame: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(names: &[&str]) -> Vec<Data> {
        names.iter().map(|n| Data::String(n.to_string())).collect()
    }

    #[test]
    fn builds_typed_columns_from_cells() {
        let rows = vec![
            header(&["amount", "active", "joined", "name"]),
            vec![
                Data::Float(10.5),
                Data::Bool(true),
                Data::String("2024-01-01".to_string()),
                Data::String("ann".to_string()),
            ],
            vec![
                Data::Int(3),
                Data::Bool(false),
                Data::String("2024-01-05".to_string()),
                Data::Empty,
            ],
        ];
        let headers: Vec<String> = ["amount", "active", "joined", "name"].iter().map(|s| s.to_string()).collect();

        let df = ExcelProcessor.create_dataframe(&rows, &headers).unwrap();

        assert_eq!(df.height(), 2);
        assert_eq!(df.column("amount").unwrap().dtype(), &DataType::Float64);
        assert_eq!(df.column("active").unwrap().dtype(), &DataType::Boolean);
        assert!(matches!(df.column("joined").unwrap().dtype(), DataType::Datetime(_, _)));
        assert_eq!(df.column("name").unwrap().dtype(), &DataType::String);
        assert_eq!(df.column("name").unwrap().null_count(), 1);
    }

    #[test]
    fn short_rows_are_padded_with_nulls() {
        let rows = vec![
            header(&["a", "b"]),
            vec![Data::Int(1)],
            vec![Data::Int(2), Data::Int(5)],
        ];
        let headers = vec!["a".to_string(), "b".to_string()];
        let df = ExcelProcessor.create_dataframe(&rows, &headers).unwrap();
        assert_eq!(df.column("b").unwrap().null_count(), 1);
    }
}
