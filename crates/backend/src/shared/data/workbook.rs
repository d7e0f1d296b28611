use calamine::{open_workbook_auto, Data, Reader};
use contracts::shared::{CellValue, Table};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// One sheet per analysis view, `c1`..`c14`.
pub const SHEET_NAMES: [&str; 14] = [
    "c1", "c2", "c3", "c4", "c5", "c6", "c7", "c8", "c9", "c10", "c11", "c12", "c13", "c14",
];

#[derive(Debug, Error)]
pub enum DataError {
    /// Input workbook or one of its required sheets is missing/unreadable.
    /// The load is all-or-nothing: this aborts the whole startup.
    #[error("data unavailable: {0}")]
    DataUnavailable(String),
}

/// Read every required sheet into an immutable table map.
/// Any missing sheet fails the whole load.
pub fn load_workbook(path: &Path) -> Result<HashMap<String, Table>, DataError> {
    let mut workbook = open_workbook_auto(path).map_err(|e| {
        DataError::DataUnavailable(format!("cannot open workbook {}: {e}", path.display()))
    })?;

    let mut sheets = HashMap::new();
    for name in SHEET_NAMES {
        let range = workbook.worksheet_range(name).map_err(|e| {
            DataError::DataUnavailable(format!("sheet '{name}' missing or unreadable: {e}"))
        })?;
        sheets.insert(name.to_string(), sheet_to_table(name, &range)?);
    }
    Ok(sheets)
}

/// First row is the header; the rest are data rows padded to header width.
fn sheet_to_table(name: &str, range: &calamine::Range<Data>) -> Result<Table, DataError> {
    let mut rows_iter = range.rows();
    let header = rows_iter
        .next()
        .ok_or_else(|| DataError::DataUnavailable(format!("sheet '{name}' is empty")))?;

    let columns: Vec<String> = header
        .iter()
        .enumerate()
        .map(|(i, cell)| {
            let text = cell_to_value(cell).key();
            if text.is_empty() {
                format!("column_{}", i + 1)
            } else {
                text
            }
        })
        .collect();

    let width = columns.len();
    let rows = rows_iter
        .map(|row| {
            (0..width)
                .map(|i| row.get(i).map(cell_to_value).unwrap_or(CellValue::Null))
                .collect()
        })
        .collect();

    Ok(Table::new(columns, rows))
}

fn cell_to_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Null,
        Data::Int(v) => CellValue::Int(*v),
        Data::Float(v) => CellValue::Float(*v),
        Data::Bool(v) => CellValue::Int(*v as i64),
        Data::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                CellValue::Null
            } else {
                CellValue::Text(s.to_string())
            }
        }
        Data::DateTime(dt) => CellValue::Float(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Text(format!("{e:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_workbook_is_data_unavailable() {
        let err = load_workbook(Path::new("target/does-not-exist.xlsx")).unwrap_err();
        assert!(matches!(err, DataError::DataUnavailable(_)));
        assert!(err.to_string().contains("data unavailable"));
    }

    #[test]
    fn test_cell_conversion() {
        assert_eq!(cell_to_value(&Data::Empty), CellValue::Null);
        assert_eq!(cell_to_value(&Data::Int(7)), CellValue::Int(7));
        assert_eq!(cell_to_value(&Data::Float(2020.0)), CellValue::Float(2020.0));
        assert_eq!(
            cell_to_value(&Data::String("  Candy ".into())),
            CellValue::Text("Candy".into())
        );
        assert_eq!(cell_to_value(&Data::String("   ".into())), CellValue::Null);
        assert_eq!(cell_to_value(&Data::Bool(true)), CellValue::Int(1));
    }
}
