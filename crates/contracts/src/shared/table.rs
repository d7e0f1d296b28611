use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A single cell of a loaded sheet.
///
/// Untagged so tables serialize as plain JSON values; deserialization
/// tries `Null` → `Int` → `Float` → `Text` in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Int(i64),
    Float(f64),
    Text(String),
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Numeric view of the cell, `None` for text and null cells.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Int(v) => Some(*v as f64),
            CellValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Canonical string key used for filter selections and joins.
    ///
    /// Integral floats collapse to their integer form so that a year read
    /// from the workbook as `2020.0` and the query value `"2020"` agree.
    pub fn key(&self) -> String {
        match self {
            CellValue::Null => String::new(),
            CellValue::Int(v) => v.to_string(),
            CellValue::Float(v) if v.fract() == 0.0 && v.abs() < 1e15 => {
                format!("{}", *v as i64)
            }
            CellValue::Float(v) => v.to_string(),
            CellValue::Text(s) => s.clone(),
        }
    }

    /// Ordering used when sorting aggregate output by group key:
    /// numbers first (numeric order), then text, nulls last.
    pub fn cmp_order(&self, other: &CellValue) -> Ordering {
        match (self.as_f64(), other.as_f64()) {
            (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => match (self, other) {
                (CellValue::Text(a), CellValue::Text(b)) => a.cmp(b),
                (CellValue::Null, CellValue::Null) => Ordering::Equal,
                (CellValue::Null, _) => Ordering::Greater,
                (_, CellValue::Null) => Ordering::Less,
                // Int/Float cells always have an `as_f64` value, so they are
                // handled by the outer match; these arms are unreachable.
                _ => Ordering::Equal,
            },
        }
    }
}

/// An immutable, ordered table: column names plus rows of cells.
///
/// All derived computations (filters, aggregates) return new tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl Table {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self { columns, rows }
    }

    /// Empty table with the same schema.
    pub fn empty_like(&self) -> Table {
        Table {
            columns: self.columns.clone(),
            rows: Vec::new(),
        }
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Distinct non-null values of a column as canonical keys, in order of
    /// first appearance.
    pub fn distinct_keys(&self, column: &str) -> Vec<String> {
        let Some(idx) = self.column_index(column) else {
            return Vec::new();
        };
        let mut seen = Vec::new();
        for row in &self.rows {
            let cell = &row[idx];
            if cell.is_null() {
                continue;
            }
            let key = cell.key();
            if !seen.contains(&key) {
                seen.push(key);
            }
        }
        seen
    }

    /// Projection onto a subset of columns, in the given order.
    /// Unknown columns are skipped.
    pub fn select(&self, columns: &[&str]) -> Table {
        let indices: Vec<usize> = columns
            .iter()
            .filter_map(|name| self.column_index(name))
            .collect();
        Table {
            columns: indices.iter().map(|&i| self.columns[i].clone()).collect(),
            rows: self
                .rows
                .iter()
                .map(|row| indices.iter().map(|&i| row[i].clone()).collect())
                .collect(),
        }
    }

    /// New table with an extra column appended. `values` must have one
    /// entry per row; extra entries are ignored, missing ones become null.
    pub fn with_column(&self, name: &str, values: Vec<CellValue>) -> Table {
        let mut columns = self.columns.clone();
        columns.push(name.to_string());
        let mut values = values.into_iter();
        let rows = self
            .rows
            .iter()
            .map(|row| {
                let mut row = row.clone();
                row.push(values.next().unwrap_or(CellValue::Null));
                row
            })
            .collect();
        Table { columns, rows }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::new(
            vec!["YEAR".into(), "SALESAMOUNT".into()],
            vec![
                vec![CellValue::Float(2018.0), CellValue::Float(100.0)],
                vec![CellValue::Float(2019.0), CellValue::Float(150.0)],
                vec![CellValue::Float(2018.0), CellValue::Null],
            ],
        )
    }

    #[test]
    fn test_key_collapses_integral_floats() {
        assert_eq!(CellValue::Float(2020.0).key(), "2020");
        assert_eq!(CellValue::Int(7).key(), "7");
        assert_eq!(CellValue::Float(3.25).key(), "3.25");
        assert_eq!(CellValue::Text("Candy Co".into()).key(), "Candy Co");
    }

    #[test]
    fn test_distinct_keys_preserves_first_appearance() {
        let t = sample();
        assert_eq!(t.distinct_keys("YEAR"), vec!["2018", "2019"]);
        // Null cells never become options
        assert_eq!(t.distinct_keys("SALESAMOUNT"), vec!["100", "150"]);
    }

    #[test]
    fn test_select_and_with_column() {
        let t = sample();
        let only_year = t.select(&["YEAR"]);
        assert_eq!(only_year.columns, vec!["YEAR"]);
        assert_eq!(only_year.rows.len(), 3);

        let labeled = t.with_column(
            "LABEL",
            vec![
                CellValue::Text("a".into()),
                CellValue::Text("b".into()),
                CellValue::Text("c".into()),
            ],
        );
        assert_eq!(labeled.columns.last().map(String::as_str), Some("LABEL"));
        assert_eq!(labeled.rows[1][2], CellValue::Text("b".into()));
    }

    #[test]
    fn test_cmp_order_numbers_before_text() {
        use std::cmp::Ordering;
        assert_eq!(
            CellValue::Float(2.0).cmp_order(&CellValue::Int(3)),
            Ordering::Less
        );
        assert_eq!(
            CellValue::Int(3).cmp_order(&CellValue::Text("a".into())),
            Ordering::Less
        );
        assert_eq!(
            CellValue::Text("a".into()).cmp_order(&CellValue::Text("b".into())),
            Ordering::Less
        );
    }

    #[test]
    fn test_untagged_serde_round_trip() {
        let t = sample();
        let json = serde_json::to_string(&t).unwrap();
        assert!(json.contains("2018.0") || json.contains("2018"));
        let back: Table = serde_json::from_str(&json).unwrap();
        assert_eq!(back.columns, t.columns);
        assert_eq!(back.rows.len(), t.rows.len());
        assert!(back.rows[2][1].is_null());
    }
}
