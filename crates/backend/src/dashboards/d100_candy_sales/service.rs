//! Builds the view catalog and the per-view render payloads from the
//! loaded sheets. Each request gets fresh tables; nothing is cached
//! between calls.

use super::aggregate::{argmax_rows, join_sum_with_argmax, sum_by_group, top1_by_group, AggregateError};
use super::filter::{filter_in, parse_selection};
use crate::shared::data::store::SheetStore;
use crate::shared::data::workbook::DataError;
use contracts::dashboards::d100_candy_sales::{
    AnalysisView, FilterDescriptor, ViewDataResponse, ViewDescriptor,
};
use contracts::shared::{
    CellValue, ChartKind, ChartSpec, Measure, Table, BRAND_LABEL_MAX, PRODUCT_LABEL_MAX,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ViewError {
    #[error(transparent)]
    Data(#[from] DataError),
    #[error(transparent)]
    Aggregate(#[from] AggregateError),
}

/// Catalog of the fourteen analyses with their filter options, in the
/// fixed menu order.
pub fn catalog(store: &SheetStore) -> Result<Vec<ViewDescriptor>, ViewError> {
    AnalysisView::ALL
        .iter()
        .map(|view| {
            Ok(ViewDescriptor {
                id: view.id().to_string(),
                title: view.title().to_string(),
                filter: filter_descriptor(store, *view)?,
            })
        })
        .collect()
}

fn filter_descriptor(
    store: &SheetStore,
    view: AnalysisView,
) -> Result<Option<FilterDescriptor>, ViewError> {
    let Some(field) = view.filter_field() else {
        return Ok(None);
    };
    let sheet = store.sheet(view.sheet())?;
    let mut options = sheet.distinct_keys(field.column());
    if field.sorted_options() {
        options.sort_by(|a, b| match (a.parse::<f64>(), b.parse::<f64>()) {
            (Ok(x), Ok(y)) => x.partial_cmp(&y).unwrap_or(std::cmp::Ordering::Equal),
            _ => a.cmp(b),
        });
    }
    Ok(Some(FilterDescriptor {
        field,
        label: field.label().to_string(),
        column: field.column().to_string(),
        options,
    }))
}

/// Full render payload for one view: the chart description plus the
/// table(s) shown in the disclosure below it.
///
/// `selected` is the raw comma-separated query value: `None` keeps all
/// rows, an empty string is a deliberate empty selection.
pub fn view_data(
    store: &SheetStore,
    view: AnalysisView,
    selected: Option<&str>,
) -> Result<ViewDataResponse, ViewError> {
    let sheet = store.sheet(view.sheet())?;
    let filter = filter_descriptor(store, view)?;

    let working = match (&filter, parse_selection(selected)) {
        (Some(desc), Some(keys)) => filter_in(sheet, &desc.column, &keys)?,
        _ => sheet.clone(),
    };

    let (chart, table, extra_table) = match view {
        AnalysisView::YearlySales => {
            let chart = ChartSpec::new(
                ChartKind::Line,
                view.title(),
                "YEAR",
                Measure::new("SALESAMOUNT", "Sales amount"),
            )
            .with_labels("Year", "Sales amount");
            (chart, working, None)
        }
        AnalysisView::MonthlyVolume => {
            let chart = ChartSpec::new(
                ChartKind::Line,
                view.title(),
                "MONTH",
                Measure::new("TOTALSALES", "Sales volume"),
            )
            .with_labels("Month", "Sales volume")
            .with_series("YEAR");
            (chart, working, None)
        }
        AnalysisView::QuarterlySales => {
            let chart = ChartSpec::new(
                ChartKind::Line,
                view.title(),
                "QUARTER",
                Measure::new("SALESAMOUNT", "Sales amount"),
            )
            .with_labels("Quarter", "Sales amount")
            .with_series("YEAR");
            (chart, working, None)
        }
        AnalysisView::YearlyGrowth => {
            let labeled = with_year_label(&working, "YEAR1", "YEAR2", "-")?;
            let chart = ChartSpec::new(
                ChartKind::Bar,
                view.title(),
                "YEAR_LABEL",
                Measure::new("GROWTHPERCENT", "Growth (%)"),
            )
            .with_labels("Period", "Growth (%)")
            .signed()
            .with_value_labels(Some("%"));
            (chart, labeled, None)
        }
        AnalysisView::MinMaxSales => {
            let chart = ChartSpec::new(
                ChartKind::PairedBar,
                view.title(),
                "YEAR",
                Measure::new("MAXSALESAMOUNT", "Max monthly sales")
                    .with_color("orange")
                    .with_annotation("MAXMONTH", None),
            )
            .with_labels("Year", "Sales amount")
            .with_second_measure(
                Measure::new("MINSALESAMOUNT", "Min monthly sales")
                    .with_color("yellow")
                    .with_annotation("MINMONTH", None),
            );
            (chart, working, None)
        }
        AnalysisView::TopGrowthProducts => {
            let labeled = with_year_label(&working, "YEAR1", "YEAR2", "-")?;
            let chart = ChartSpec::new(
                ChartKind::Bar,
                view.title(),
                "YEAR_LABEL",
                Measure::new("GROWTHSALES", "Sales growth (%)")
                    .with_color("mediumseagreen")
                    .with_annotation("PRODUCTNAME", Some(PRODUCT_LABEL_MAX)),
            )
            .with_labels("Period", "Sales growth (%)");
            (chart, labeled, None)
        }
        AnalysisView::ChannelSales => {
            let chart = ChartSpec::new(
                ChartKind::PairedBar,
                view.title(),
                "DISTRIBUTION_CHANNEL",
                Measure::new("TOTALSALES", "Total products").with_color("royalblue"),
            )
            .with_labels("Distribution channel", "Value")
            .with_second_measure(
                Measure::new("SALESAMOUNT", "Sales amount").with_color("darkorange"),
            );
            (chart, working, None)
        }
        AnalysisView::ChannelGrowth => {
            // en dash, as in the source sheet's period labels
            let labeled = with_year_label(&working, "YEAR_1", "YEAR_2", "\u{2013}")?;
            let mut chart = ChartSpec::new(
                ChartKind::Line,
                view.title(),
                "YEAR_LABEL",
                Measure::new("GROWTHPERCENT", "Growth (%)"),
            )
            .with_labels("Period", "Growth (%)")
            .with_series("DISTRIBUTION_CHANNEL");
            chart.zero_line = true;
            (chart, labeled, None)
        }
        AnalysisView::TopManufacturers => {
            let sums = sum_by_group(&working, &["YEAR", "MANUFACTURER"], "SALESAMOUNT")?;
            let top = top1_by_group(&sums, &["YEAR"], "SALESAMOUNT")?;
            let chart = ChartSpec::new(
                ChartKind::Bar,
                view.title(),
                "YEAR",
                Measure::new("SALESAMOUNT", "Sales amount"),
            )
            .with_labels("Year", "Sales amount")
            .with_series("MANUFACTURER");
            (chart, top, None)
        }
        AnalysisView::ManufacturerSales => {
            let chart = ChartSpec::new(
                ChartKind::Line,
                view.title(),
                "YEAR",
                Measure::new("SALESAMOUNT", "Sales amount"),
            )
            .with_labels("Year", "Sales amount")
            .with_series("MANUFACTURER");
            (chart, working, None)
        }
        AnalysisView::BrandChannelPerformance => {
            let chart = ChartSpec::new(
                ChartKind::Bar,
                view.title(),
                "DISTRIBUTION_CHANNEL",
                Measure::new("AVG_SALES_PER_PRODUCT", "Average sales per product")
                    .with_annotation("BRAND", Some(BRAND_LABEL_MAX)),
            )
            .with_labels("Distribution channel", "Average sales per product");
            (chart, working, None)
        }
        AnalysisView::CategorySales => {
            let chart = ChartSpec::new(
                ChartKind::Line,
                view.title(),
                "YEAR",
                Measure::new("SALESAMOUNT", "Sales amount"),
            )
            .with_labels("Year", "Sales amount")
            .with_series("CATEGORY");
            (chart, working, None)
        }
        AnalysisView::TopBrandsPerCategory => {
            let chart = ChartSpec::new(
                ChartKind::Bar,
                view.title(),
                "YEAR",
                Measure::new("TOTALSALES", "Total sales")
                    .with_annotation("BRAND", Some(BRAND_LABEL_MAX)),
            )
            .with_labels("Year", "Total sales")
            .with_series("CATEGORY");
            (chart, working, None)
        }
        AnalysisView::TopProductsPerManufacturer => {
            let sums = sum_by_group(&working, &["YEAR", "MANUFACTURER"], "SALESAMOUNT")?;
            let winners = argmax_rows(&working, &["YEAR", "MANUFACTURER"], "SALESAMOUNT")?;
            let joined =
                join_sum_with_argmax(&sums, &winners, &["YEAR", "MANUFACTURER"], "PRODUCTNAME")?;
            let chart = ChartSpec::new(
                ChartKind::Bar,
                view.title(),
                "YEAR",
                Measure::new("SALESAMOUNT", "Total sales")
                    .with_annotation("PRODUCTNAME", Some(PRODUCT_LABEL_MAX)),
            )
            .with_labels("Year", "Total sales")
            .with_series("MANUFACTURER");
            let summary =
                joined.select(&["YEAR", "MANUFACTURER", "PRODUCTNAME", "SALESAMOUNT"]);
            (chart, summary, Some(working))
        }
    };

    Ok(ViewDataResponse {
        chart,
        table,
        extra_table,
        filter,
    })
}

/// `YEAR_LABEL` column joining two year columns with a separator,
/// e.g. `2018-2019`.
fn with_year_label(
    table: &Table,
    first: &str,
    second: &str,
    sep: &str,
) -> Result<Table, AggregateError> {
    let a = table
        .column_index(first)
        .ok_or_else(|| AggregateError::UnknownColumn(first.to_string()))?;
    let b = table
        .column_index(second)
        .ok_or_else(|| AggregateError::UnknownColumn(second.to_string()))?;
    let labels = table
        .rows
        .iter()
        .map(|row| CellValue::Text(format!("{}{}{}", row[a].key(), sep, row[b].key())))
        .collect();
    Ok(table.with_column("YEAR_LABEL", labels))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    fn store_with(sheets: Vec<(&str, Table)>) -> SheetStore {
        let map: HashMap<String, Table> = sheets
            .into_iter()
            .map(|(name, table)| (name.to_string(), table))
            .collect();
        SheetStore::new(map)
    }

    fn yearly_sales_sheet() -> Table {
        Table::new(
            vec!["YEAR".into(), "SALESAMOUNT".into()],
            vec![
                vec![CellValue::Float(2018.0), CellValue::Float(100.0)],
                vec![CellValue::Float(2019.0), CellValue::Float(150.0)],
                vec![CellValue::Float(2020.0), CellValue::Float(90.0)],
            ],
        )
    }

    #[test]
    fn test_yearly_sales_end_to_end() {
        let store = store_with(vec![("c1", yearly_sales_sheet())]);
        let data = view_data(&store, AnalysisView::YearlySales, None).unwrap();

        assert_eq!(data.chart.kind, ChartKind::Line);
        assert_eq!(data.chart.x_field, "YEAR");
        assert_eq!(data.table.rows.len(), 3);
        let ys: Vec<f64> = data
            .table
            .rows
            .iter()
            .filter_map(|r| r[1].as_f64())
            .collect();
        assert_eq!(ys, vec![100.0, 150.0, 90.0]);
        assert!(data.filter.is_none());
        assert!(data.extra_table.is_none());
    }

    #[test]
    fn test_top_manufacturers_end_to_end() {
        let sheet = Table::new(
            vec!["YEAR".into(), "MANUFACTURER".into(), "SALESAMOUNT".into()],
            vec![
                vec![CellValue::Int(2020), text("A"), CellValue::Float(50.0)],
                vec![CellValue::Int(2020), text("B"), CellValue::Float(70.0)],
                vec![CellValue::Int(2021), text("A"), CellValue::Float(60.0)],
            ],
        );
        let store = store_with(vec![("c9", sheet)]);
        let data = view_data(&store, AnalysisView::TopManufacturers, None).unwrap();

        assert_eq!(data.table.rows.len(), 2);
        assert_eq!(data.table.rows[0][1], text("B"));
        assert!((data.table.rows[0][2].as_f64().unwrap() - 70.0).abs() < 1e-9);
        assert_eq!(data.table.rows[1][1], text("A"));
        assert_eq!(data.chart.series_field.as_deref(), Some("MANUFACTURER"));
    }

    #[test]
    fn test_top_products_per_manufacturer_joins_and_keeps_raw() {
        let sheet = Table::new(
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
        let store = store_with(vec![("c14", sheet.clone())]);
        let data = view_data(&store, AnalysisView::TopProductsPerManufacturer, None).unwrap();

        assert_eq!(
            data.table.columns,
            vec!["YEAR", "MANUFACTURER", "PRODUCTNAME", "SALESAMOUNT"]
        );
        assert_eq!(data.table.rows.len(), 1);
        assert_eq!(data.table.rows[0][2], text("Choco Bomb"));
        assert!((data.table.rows[0][3].as_f64().unwrap() - 50.0).abs() < 1e-9);
        assert_eq!(data.extra_table, Some(sheet));
    }

    #[test]
    fn test_year_filter_absent_vs_empty() {
        let sheet = Table::new(
            vec!["MONTH".into(), "TOTALSALES".into(), "YEAR".into()],
            vec![
                vec![CellValue::Int(1), CellValue::Float(10.0), CellValue::Float(2019.0)],
                vec![CellValue::Int(1), CellValue::Float(12.0), CellValue::Float(2020.0)],
            ],
        );
        let store = store_with(vec![("c2", sheet)]);

        let all = view_data(&store, AnalysisView::MonthlyVolume, None).unwrap();
        assert_eq!(all.table.rows.len(), 2);

        let none = view_data(&store, AnalysisView::MonthlyVolume, Some("")).unwrap();
        assert!(none.table.rows.is_empty());
        assert_eq!(none.table.columns, all.table.columns);

        let one = view_data(&store, AnalysisView::MonthlyVolume, Some("2020")).unwrap();
        assert_eq!(one.table.rows.len(), 1);

        // filter options come back sorted ascending
        let filter = all.filter.unwrap();
        assert_eq!(filter.options, vec!["2019", "2020"]);
    }

    #[test]
    fn test_year_label_separators() {
        let growth = Table::new(
            vec!["YEAR1".into(), "YEAR2".into(), "GROWTHPERCENT".into()],
            vec![vec![
                CellValue::Float(2018.0),
                CellValue::Float(2019.0),
                CellValue::Float(12.5),
            ]],
        );
        let store = store_with(vec![("c4", growth)]);
        let data = view_data(&store, AnalysisView::YearlyGrowth, None).unwrap();
        let label_idx = data.table.column_index("YEAR_LABEL").unwrap();
        assert_eq!(data.table.rows[0][label_idx], text("2018-2019"));
        assert!(data.chart.signed_colors);
        assert!(data.chart.zero_line);

        let channel = Table::new(
            vec![
                "YEAR_1".into(),
                "YEAR_2".into(),
                "GROWTHPERCENT".into(),
                "DISTRIBUTION_CHANNEL".into(),
            ],
            vec![vec![
                CellValue::Float(2018.0),
                CellValue::Float(2019.0),
                CellValue::Float(-3.0),
                text("Grocery"),
            ]],
        );
        let store = store_with(vec![("c8", channel)]);
        let data = view_data(&store, AnalysisView::ChannelGrowth, None).unwrap();
        let label_idx = data.table.column_index("YEAR_LABEL").unwrap();
        assert_eq!(data.table.rows[0][label_idx], text("2018\u{2013}2019"));
        assert!(data.chart.zero_line);
        assert!(!data.chart.signed_colors);
    }

    #[test]
    fn test_catalog_covers_all_views() {
        let mut sheets = Vec::new();
        let filler = Table::new(vec!["YEAR".into()], vec![vec![CellValue::Int(2020)]]);
        for view in AnalysisView::ALL {
            let table = match view.filter_field() {
                Some(field) => Table::new(
                    vec![field.column().to_string()],
                    vec![vec![text("option")]],
                ),
                None => filler.clone(),
            };
            sheets.push((view.sheet(), table));
        }
        let store = store_with(sheets);
        let views = catalog(&store).unwrap();
        assert_eq!(views.len(), 14);
        let filtered: Vec<&ViewDescriptor> =
            views.iter().filter(|v| v.filter.is_some()).collect();
        assert_eq!(filtered.len(), 4);
        assert_eq!(
            filtered[0].filter.as_ref().unwrap().options,
            vec!["option"]
        );
    }
}
