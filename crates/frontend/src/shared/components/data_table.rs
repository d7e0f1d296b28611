use super::number_format::format_cell_number;
use contracts::shared::{CellValue, Table};
use leptos::prelude::*;

/// Display form of one cell: numbers thousands-separated, nulls blank.
pub fn cell_text(cell: &CellValue) -> String {
    match cell {
        CellValue::Null => String::new(),
        CellValue::Int(v) => format_cell_number(*v as f64),
        CellValue::Float(v) => format_cell_number(*v),
        CellValue::Text(s) => s.clone(),
    }
}

/// Plain data table for the disclosure below each chart.
#[component]
pub fn DataTable(table: Table) -> impl IntoView {
    view! {
        <div class="data-table-wrapper">
            <table class="data-table">
                <thead>
                    <tr>
                        {table
                            .columns
                            .iter()
                            .map(|c| view! { <th>{c.clone()}</th> })
                            .collect_view()}
                    </tr>
                </thead>
                <tbody>
                    {table
                        .rows
                        .iter()
                        .map(|row| {
                            view! {
                                <tr>
                                    {row
                                        .iter()
                                        .map(|cell| {
                                            let numeric = cell.as_f64().is_some();
                                            view! {
                                                <td class=if numeric {
                                                    "data-table__cell--number"
                                                } else {
                                                    "data-table__cell"
                                                }>{cell_text(cell)}</td>
                                            }
                                        })
                                        .collect_view()}
                                </tr>
                            }
                        })
                        .collect_view()}
                </tbody>
            </table>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_text(&CellValue::Null), "");
        assert_eq!(cell_text(&CellValue::Int(1234)), "1 234");
        assert_eq!(cell_text(&CellValue::Float(12.345)), "12.35");
        assert_eq!(cell_text(&CellValue::Text("Grocery".into())), "Grocery");
    }
}
