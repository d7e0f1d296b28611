//! Group reductions over loaded tables.
//!
//! All reductions return new tables; inputs are never mutated. Numeric
//! work is `f64` over non-null cells only, matching the source data's
//! pre-aggregated semantics.

use contracts::shared::{CellValue, Table};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AggregateError {
    #[error("unknown column '{0}'")]
    UnknownColumn(String),
    /// A group ended up with no usable rows for the requested reduction.
    /// Unreachable for groups derived from the table's own partition
    /// unless every rank cell in the group is null.
    #[error("empty group '{0}'")]
    EmptyGroup(String),
    /// A group key present on one side of a join is absent from the other.
    #[error("join key mismatch: {0}")]
    JoinKeyMismatch(String),
}

fn column_indices(table: &Table, columns: &[&str]) -> Result<Vec<usize>, AggregateError> {
    columns
        .iter()
        .map(|name| {
            table
                .column_index(name)
                .ok_or_else(|| AggregateError::UnknownColumn(name.to_string()))
        })
        .collect()
}

fn group_key(row: &[CellValue], indices: &[usize]) -> Vec<String> {
    indices.iter().map(|&i| row[i].key()).collect()
}

fn cmp_group_cells(a: &[CellValue], b: &[CellValue]) -> std::cmp::Ordering {
    for (x, y) in a.iter().zip(b.iter()) {
        let ord = x.cmp_order(y);
        if ord != std::cmp::Ordering::Equal {
            return ord;
        }
    }
    std::cmp::Ordering::Equal
}

/// One row per distinct group with the summed `value_col`.
/// Null value cells are excluded from the sum; output rows are ordered
/// by ascending group key.
pub fn sum_by_group(
    table: &Table,
    group_cols: &[&str],
    value_col: &str,
) -> Result<Table, AggregateError> {
    let key_idx = column_indices(table, group_cols)?;
    let value_idx = column_indices(table, &[value_col])?[0];

    struct Acc {
        cells: Vec<CellValue>,
        sum: f64,
    }

    let mut groups: HashMap<Vec<String>, Acc> = HashMap::new();
    for row in &table.rows {
        let key = group_key(row, &key_idx);
        let entry = groups.entry(key).or_insert_with(|| Acc {
            cells: key_idx.iter().map(|&i| row[i].clone()).collect(),
            sum: 0.0,
        });
        if let Some(v) = row[value_idx].as_f64() {
            entry.sum += v;
        }
    }

    let mut accs: Vec<Acc> = groups.into_values().collect();
    accs.sort_by(|a, b| cmp_group_cells(&a.cells, &b.cells));

    let mut columns: Vec<String> = group_cols.iter().map(|c| c.to_string()).collect();
    columns.push(value_col.to_string());
    let rows = accs
        .into_iter()
        .map(|acc| {
            let mut row = acc.cells;
            row.push(CellValue::Float(acc.sum));
            row
        })
        .collect();
    Ok(Table::new(columns, rows))
}

/// Per group, the first-occurring row attaining the maximum of `rank_col`
/// (stable sort + drop-duplicates semantics). Rows with a null rank are
/// ignored; a group consisting only of null ranks is dropped. The whole
/// original row survives; output is ordered by ascending group key.
pub fn top1_by_group(
    table: &Table,
    group_cols: &[&str],
    rank_col: &str,
) -> Result<Table, AggregateError> {
    let key_idx = column_indices(table, group_cols)?;
    let rank_idx = column_indices(table, &[rank_col])?[0];

    let mut best: HashMap<Vec<String>, (f64, &Vec<CellValue>)> = HashMap::new();
    for row in &table.rows {
        let Some(rank) = row[rank_idx].as_f64() else {
            continue;
        };
        let key = group_key(row, &key_idx);
        match best.get(&key) {
            // strict: ties keep the earlier row
            Some((current, _)) if rank <= *current => {}
            _ => {
                best.insert(key, (rank, row));
            }
        }
    }

    let mut winners: Vec<&Vec<CellValue>> = best.into_values().map(|(_, row)| row).collect();
    winners.sort_by(|a, b| {
        let cells_a: Vec<CellValue> = key_idx.iter().map(|&i| a[i].clone()).collect();
        let cells_b: Vec<CellValue> = key_idx.iter().map(|&i| b[i].clone()).collect();
        cmp_group_cells(&cells_a, &cells_b)
    });

    Ok(Table::new(
        table.columns.clone(),
        winners.into_iter().cloned().collect(),
    ))
}

/// Per group, the full original row at the maximum of `rank_col`.
/// Unlike [`top1_by_group`], a group that offers no usable rank value is
/// an error rather than silently dropped.
pub fn argmax_rows(
    table: &Table,
    group_cols: &[&str],
    rank_col: &str,
) -> Result<Table, AggregateError> {
    let key_idx = column_indices(table, group_cols)?;
    let rank_idx = column_indices(table, &[rank_col])?[0];

    // Track every group of the partition, even rank-less ones, so the
    // EmptyGroup guard can fire.
    let mut order: Vec<Vec<String>> = Vec::new();
    let mut best: HashMap<Vec<String>, Option<(f64, &Vec<CellValue>)>> = HashMap::new();
    for row in &table.rows {
        let key = group_key(row, &key_idx);
        if !best.contains_key(&key) {
            order.push(key.clone());
        }
        let slot = best.entry(key).or_insert(None);
        let Some(rank) = row[rank_idx].as_f64() else {
            continue;
        };
        match slot {
            Some((current, _)) if rank <= *current => {}
            _ => *slot = Some((rank, row)),
        }
    }

    let mut rows: Vec<(Vec<CellValue>, Vec<CellValue>)> = Vec::new();
    for key in order {
        let winner = best
            .get(&key)
            .and_then(|slot| slot.as_ref())
            .ok_or_else(|| AggregateError::EmptyGroup(key.join("/")))?;
        let cells: Vec<CellValue> = key_idx.iter().map(|&i| winner.1[i].clone()).collect();
        rows.push((cells, winner.1.clone()));
    }
    rows.sort_by(|a, b| cmp_group_cells(&a.0, &b.0));

    Ok(Table::new(
        table.columns.clone(),
        rows.into_iter().map(|(_, row)| row).collect(),
    ))
}

/// Attach the descriptive attribute of each group's argmax row to the
/// group's sum row: a single-key equi-join on `group_cols`. Both sides
/// must cover exactly the same groups.
pub fn join_sum_with_argmax(
    sum: &Table,
    argmax: &Table,
    group_cols: &[&str],
    attr_col: &str,
) -> Result<Table, AggregateError> {
    let sum_key_idx = column_indices(sum, group_cols)?;
    let arg_key_idx = column_indices(argmax, group_cols)?;
    let attr_idx = column_indices(argmax, &[attr_col])?[0];

    let mut attrs: HashMap<Vec<String>, &CellValue> = HashMap::new();
    for row in &argmax.rows {
        attrs.insert(group_key(row, &arg_key_idx), &row[attr_idx]);
    }

    let mut columns = sum.columns.clone();
    columns.push(attr_col.to_string());
    let mut rows = Vec::with_capacity(sum.rows.len());
    for row in &sum.rows {
        let key = group_key(row, &sum_key_idx);
        let attr = attrs.remove(&key).ok_or_else(|| {
            AggregateError::JoinKeyMismatch(format!("group '{}' has no argmax row", key.join("/")))
        })?;
        let mut joined = row.clone();
        joined.push(attr.clone());
        rows.push(joined);
    }
    if let Some(key) = attrs.keys().next() {
        return Err(AggregateError::JoinKeyMismatch(format!(
            "argmax group '{}' has no aggregate row",
            key.join("/")
        )));
    }

    Ok(Table::new(columns, rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    fn sales() -> Table {
        Table::new(
            vec!["YEAR".into(), "MANUFACTURER".into(), "SALESAMOUNT".into()],
            vec![
                vec![CellValue::Int(2020), text("A"), CellValue::Float(50.0)],
                vec![CellValue::Int(2020), text("B"), CellValue::Float(70.0)],
                vec![CellValue::Int(2021), text("A"), CellValue::Float(60.0)],
                vec![CellValue::Int(2021), text("B"), CellValue::Null],
            ],
        )
    }

    #[test]
    fn test_sum_by_group_counts_and_total() {
        let t = sales();
        let agg = sum_by_group(&t, &["YEAR"], "SALESAMOUNT").unwrap();
        // one row per distinct group value
        assert_eq!(agg.rows.len(), 2);
        // group sums add up to the non-null column total
        let total: f64 = agg.rows.iter().filter_map(|r| r[1].as_f64()).sum();
        assert!((total - 180.0).abs() < 1e-9);
        // ordered by ascending key
        assert_eq!(agg.rows[0][0].key(), "2020");
        assert!((agg.rows[0][1].as_f64().unwrap() - 120.0).abs() < 1e-9);
    }

    #[test]
    fn test_sum_by_group_two_keys() {
        let t = sales();
        let agg = sum_by_group(&t, &["YEAR", "MANUFACTURER"], "SALESAMOUNT").unwrap();
        assert_eq!(agg.rows.len(), 4);
        assert_eq!(agg.columns, vec!["YEAR", "MANUFACTURER", "SALESAMOUNT"]);
        // the null row contributes zero, not NaN
        assert!((agg.rows[3][2].as_f64().unwrap() - 0.0).abs() < 1e-9);
    }

    #[test]
    fn test_top1_picks_group_maximum() {
        let t = sales();
        let top = top1_by_group(&t, &["YEAR"], "SALESAMOUNT").unwrap();
        assert_eq!(top.rows.len(), 2);
        assert_eq!(top.rows[0][1], text("B"));
        assert!((top.rows[0][2].as_f64().unwrap() - 70.0).abs() < 1e-9);
        assert_eq!(top.rows[1][1], text("A"));
    }

    #[test]
    fn test_top1_tie_keeps_first_occurrence() {
        let t = Table::new(
            vec!["G".into(), "NAME".into(), "V".into()],
            vec![
                vec![CellValue::Int(1), text("first"), CellValue::Float(5.0)],
                vec![CellValue::Int(1), text("second"), CellValue::Float(5.0)],
                vec![CellValue::Int(1), text("third"), CellValue::Float(4.0)],
            ],
        );
        let top = top1_by_group(&t, &["G"], "V").unwrap();
        assert_eq!(top.rows.len(), 1);
        assert_eq!(top.rows[0][1], text("first"));
    }

    #[test]
    fn test_argmax_keeps_whole_row() {
        let t = sales();
        let arg = argmax_rows(&t, &["YEAR", "MANUFACTURER"], "SALESAMOUNT");
        // the (2021, B) group has only a null rank -> guarded error
        assert!(matches!(arg, Err(AggregateError::EmptyGroup(_))));

        let arg = argmax_rows(&t, &["YEAR"], "SALESAMOUNT").unwrap();
        assert_eq!(arg.columns, t.columns);
        assert_eq!(arg.rows[0][1], text("B"));
        assert_eq!(arg.rows[1][1], text("A"));
    }

    #[test]
    fn test_join_attaches_attribute() {
        let products = Table::new(
            vec![
                "YEAR".into(),
                "MANUFACTURER".into(),
                "PRODUCTNAME".into(),
                "SALESAMOUNT".into(),
            ],
            vec![
                vec![
                    CellValue::Int(2020),
                    text("A"),
                    text("Choco Bomb"),
                    CellValue::Float(30.0),
                ],
                vec![
                    CellValue::Int(2020),
                    text("A"),
                    text("Mint Twist"),
                    CellValue::Float(20.0),
                ],
            ],
        );
        let sums = sum_by_group(&products, &["YEAR", "MANUFACTURER"], "SALESAMOUNT").unwrap();
        let winners = argmax_rows(&products, &["YEAR", "MANUFACTURER"], "SALESAMOUNT").unwrap();
        let joined = join_sum_with_argmax(&sums, &winners, &["YEAR", "MANUFACTURER"], "PRODUCTNAME")
            .unwrap();

        assert_eq!(joined.rows.len(), 1);
        assert!((joined.rows[0][2].as_f64().unwrap() - 50.0).abs() < 1e-9);
        assert_eq!(joined.rows[0][3], text("Choco Bomb"));
    }

    #[test]
    fn test_join_key_mismatch_both_directions() {
        let sums = Table::new(
            vec!["YEAR".into(), "SALESAMOUNT".into()],
            vec![vec![CellValue::Int(2020), CellValue::Float(1.0)]],
        );
        let empty_winners = Table::new(
            vec!["YEAR".into(), "PRODUCTNAME".into()],
            vec![],
        );
        assert!(matches!(
            join_sum_with_argmax(&sums, &empty_winners, &["YEAR"], "PRODUCTNAME"),
            Err(AggregateError::JoinKeyMismatch(_))
        ));

        let extra_winners = Table::new(
            vec!["YEAR".into(), "PRODUCTNAME".into()],
            vec![
                vec![CellValue::Int(2020), text("X")],
                vec![CellValue::Int(2021), text("Y")],
            ],
        );
        assert!(matches!(
            join_sum_with_argmax(&sums, &extra_winners, &["YEAR"], "PRODUCTNAME"),
            Err(AggregateError::JoinKeyMismatch(_))
        ));
    }

    #[test]
    fn test_unknown_column() {
        let t = sales();
        assert!(matches!(
            sum_by_group(&t, &["NOPE"], "SALESAMOUNT"),
            Err(AggregateError::UnknownColumn(_))
        ));
    }
}
