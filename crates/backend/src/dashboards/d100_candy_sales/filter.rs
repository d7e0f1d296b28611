//! Selection parsing and row filtering for the dashboard views.

use super::aggregate::AggregateError;
use contracts::shared::Table;

/// Split the raw `selected` query parameter into canonical keys.
///
/// `None` means the parameter was absent and every value is selected.
/// An empty string is a deliberate empty selection and yields an empty
/// list rather than `None`.
pub fn parse_selection(raw: Option<&str>) -> Option<Vec<String>> {
    raw.map(|s| {
        if s.is_empty() {
            Vec::new()
        } else {
            s.split(',').map(|part| part.trim().to_string()).collect()
        }
    })
}

/// Keep the rows whose `column` cell matches one of `keys`, preserving
/// the original row order. Matching is on the canonical key form, so
/// a workbook year stored as `2020.0` matches the selection `"2020"`.
pub fn filter_in(table: &Table, column: &str, keys: &[String]) -> Result<Table, AggregateError> {
    let idx = table
        .column_index(column)
        .ok_or_else(|| AggregateError::UnknownColumn(column.to_string()))?;
    let rows = table
        .rows
        .iter()
        .filter(|row| keys.iter().any(|k| *k == row[idx].key()))
        .cloned()
        .collect();
    Ok(Table::new(table.columns.clone(), rows))
}
