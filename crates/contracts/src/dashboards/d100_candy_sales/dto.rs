use crate::shared::{ChartSpec, Table};
use serde::{Deserialize, Serialize};

/// The fourteen analyses of the candy sales dashboard, one per workbook
/// sheet (`c1`..`c14`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisView {
    YearlySales,
    MonthlyVolume,
    QuarterlySales,
    YearlyGrowth,
    MinMaxSales,
    TopGrowthProducts,
    ChannelSales,
    ChannelGrowth,
    TopManufacturers,
    ManufacturerSales,
    BrandChannelPerformance,
    CategorySales,
    TopBrandsPerCategory,
    TopProductsPerManufacturer,
}

impl AnalysisView {
    pub const ALL: [AnalysisView; 14] = [
        AnalysisView::YearlySales,
        AnalysisView::MonthlyVolume,
        AnalysisView::QuarterlySales,
        AnalysisView::YearlyGrowth,
        AnalysisView::MinMaxSales,
        AnalysisView::TopGrowthProducts,
        AnalysisView::ChannelSales,
        AnalysisView::ChannelGrowth,
        AnalysisView::TopManufacturers,
        AnalysisView::ManufacturerSales,
        AnalysisView::BrandChannelPerformance,
        AnalysisView::CategorySales,
        AnalysisView::TopBrandsPerCategory,
        AnalysisView::TopProductsPerManufacturer,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            AnalysisView::YearlySales => "yearly_sales",
            AnalysisView::MonthlyVolume => "monthly_volume",
            AnalysisView::QuarterlySales => "quarterly_sales",
            AnalysisView::YearlyGrowth => "yearly_growth",
            AnalysisView::MinMaxSales => "min_max_sales",
            AnalysisView::TopGrowthProducts => "top_growth_products",
            AnalysisView::ChannelSales => "channel_sales",
            AnalysisView::ChannelGrowth => "channel_growth",
            AnalysisView::TopManufacturers => "top_manufacturers",
            AnalysisView::ManufacturerSales => "manufacturer_sales",
            AnalysisView::BrandChannelPerformance => "brand_channel_performance",
            AnalysisView::CategorySales => "category_sales",
            AnalysisView::TopBrandsPerCategory => "top_brands_per_category",
            AnalysisView::TopProductsPerManufacturer => "top_products_per_manufacturer",
        }
    }

    pub fn from_id(id: &str) -> Option<AnalysisView> {
        AnalysisView::ALL.into_iter().find(|v| v.id() == id)
    }

    pub fn title(&self) -> &'static str {
        match self {
            AnalysisView::YearlySales => "Yearly sales",
            AnalysisView::MonthlyVolume => "Monthly sales volume",
            AnalysisView::QuarterlySales => "Quarterly sales",
            AnalysisView::YearlyGrowth => "Yearly sales growth",
            AnalysisView::MinMaxSales => "Min/max monthly sales",
            AnalysisView::TopGrowthProducts => "Top growth products",
            AnalysisView::ChannelSales => "Sales by distribution channel",
            AnalysisView::ChannelGrowth => "Growth by channel",
            AnalysisView::TopManufacturers => "Top manufacturers",
            AnalysisView::ManufacturerSales => "Sales by manufacturer",
            AnalysisView::BrandChannelPerformance => "Brand performance by channel",
            AnalysisView::CategorySales => "Sales by product category",
            AnalysisView::TopBrandsPerCategory => "Top brands per category",
            AnalysisView::TopProductsPerManufacturer => "Top products per manufacturer",
        }
    }

    /// The workbook sheet feeding this analysis.
    pub fn sheet(&self) -> &'static str {
        match self {
            AnalysisView::YearlySales => "c1",
            AnalysisView::MonthlyVolume => "c2",
            AnalysisView::QuarterlySales => "c3",
            AnalysisView::YearlyGrowth => "c4",
            AnalysisView::MinMaxSales => "c5",
            AnalysisView::TopGrowthProducts => "c6",
            AnalysisView::ChannelSales => "c7",
            AnalysisView::ChannelGrowth => "c8",
            AnalysisView::TopManufacturers => "c9",
            AnalysisView::ManufacturerSales => "c10",
            AnalysisView::BrandChannelPerformance => "c11",
            AnalysisView::CategorySales => "c12",
            AnalysisView::TopBrandsPerCategory => "c13",
            AnalysisView::TopProductsPerManufacturer => "c14",
        }
    }

    /// The discriminant column this view lets the user filter on.
    pub fn filter_field(&self) -> Option<FilterField> {
        match self {
            AnalysisView::MonthlyVolume | AnalysisView::QuarterlySales => Some(FilterField::Year),
            AnalysisView::ChannelGrowth => Some(FilterField::Channel),
            AnalysisView::ManufacturerSales => Some(FilterField::Manufacturer),
            _ => None,
        }
    }
}

/// A user-facing multi-select filter over one discriminant column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterField {
    Year,
    Channel,
    Manufacturer,
}

impl FilterField {
    pub fn column(&self) -> &'static str {
        match self {
            FilterField::Year => "YEAR",
            FilterField::Channel => "DISTRIBUTION_CHANNEL",
            FilterField::Manufacturer => "MANUFACTURER",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FilterField::Year => "Years",
            FilterField::Channel => "Distribution channels",
            FilterField::Manufacturer => "Manufacturers",
        }
    }

    /// Years are offered in ascending order; the other discriminants keep
    /// their order of first appearance in the sheet.
    pub fn sorted_options(&self) -> bool {
        matches!(self, FilterField::Year)
    }
}

/// Filter metadata for one view: which column, and the observed options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterDescriptor {
    pub field: FilterField,
    pub label: String,
    pub column: String,
    pub options: Vec<String>,
}

/// Catalog entry returned by `GET /api/d100/views`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewDescriptor {
    pub id: String,
    pub title: String,
    pub filter: Option<FilterDescriptor>,
}

/// Full render payload for one analysis:
/// the chart description plus the underlying table(s).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewDataResponse {
    pub chart: ChartSpec,
    /// The filtered/aggregated table behind the chart.
    pub table: Table,
    /// Second disclosure table where the original showed one
    /// (raw sheet next to the joined summary).
    pub extra_table: Option<Table>,
    pub filter: Option<FilterDescriptor>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_round_trip() {
        for view in AnalysisView::ALL {
            assert_eq!(AnalysisView::from_id(view.id()), Some(view));
        }
        assert_eq!(AnalysisView::from_id("nope"), None);
    }

    #[test]
    fn test_sheets_are_c1_to_c14() {
        let sheets: Vec<&str> = AnalysisView::ALL.iter().map(|v| v.sheet()).collect();
        assert_eq!(sheets.first(), Some(&"c1"));
        assert_eq!(sheets.last(), Some(&"c14"));
        assert_eq!(sheets.len(), 14);
    }

    #[test]
    fn test_filtered_views() {
        assert_eq!(
            AnalysisView::MonthlyVolume.filter_field(),
            Some(FilterField::Year)
        );
        assert_eq!(
            AnalysisView::ChannelGrowth.filter_field().map(|f| f.column()),
            Some("DISTRIBUTION_CHANNEL")
        );
        assert_eq!(AnalysisView::YearlySales.filter_field(), None);
    }
}
