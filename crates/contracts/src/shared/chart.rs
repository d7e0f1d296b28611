use serde::{Deserialize, Serialize};

/// Maximum label length for product names rendered on top of bars.
pub const PRODUCT_LABEL_MAX: usize = 15;
/// Maximum label length for brand names rendered on top of bars.
pub const BRAND_LABEL_MAX: usize = 12;

/// Bar color for non-negative values when signed coloring is on.
pub const POSITIVE_COLOR: &str = "green";
/// Bar color for negative values when signed coloring is on.
pub const NEGATIVE_COLOR: &str = "red";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    /// Line with markers, one polyline per series value.
    Line,
    /// Vertical bars, optionally grouped by a series field.
    Bar,
    /// Two measures drawn side by side per category.
    PairedBar,
}

/// A per-bar text label taken from another column of the same row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub field: String,
    /// Labels longer than this are cut to `max_chars - 3` plus `...`.
    /// `None` means no truncation (short labels such as month numbers).
    pub max_chars: Option<usize>,
}

/// One plotted measure (a y column).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measure {
    pub field: String,
    pub label: String,
    /// Fixed color; `None` lets the renderer pick from its palette.
    pub color: Option<String>,
    pub annotation: Option<Annotation>,
}

impl Measure {
    pub fn new(field: &str, label: &str) -> Self {
        Self {
            field: field.to_string(),
            label: label.to_string(),
            color: None,
            annotation: None,
        }
    }

    pub fn with_color(mut self, color: &str) -> Self {
        self.color = Some(color.to_string());
        self
    }

    pub fn with_annotation(mut self, field: &str, max_chars: Option<usize>) -> Self {
        self.annotation = Some(Annotation {
            field: field.to_string(),
            max_chars,
        });
        self
    }
}

/// Declarative chart description, built fresh per render request and
/// consumed by the frontend SVG renderer. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub x_field: String,
    pub x_label: String,
    pub y_label: String,
    /// Grouping/hue field: one line or bar color per distinct value.
    pub series_field: Option<String>,
    pub measures: Vec<Measure>,
    /// Two-color policy: green for `>= 0`, red for `< 0`.
    pub signed_colors: bool,
    /// Draw a horizontal line at y = 0.
    pub zero_line: bool,
    /// Annotate each bar with its own value, formatted to two decimals.
    pub value_labels: bool,
    /// Display unit appended to value labels (e.g. `%`).
    pub y_unit: Option<String>,
}

impl ChartSpec {
    pub fn new(kind: ChartKind, title: &str, x_field: &str, measure: Measure) -> Self {
        Self {
            kind,
            title: title.to_string(),
            x_field: x_field.to_string(),
            x_label: x_field.to_string(),
            y_label: measure.label.clone(),
            series_field: None,
            measures: vec![measure],
            signed_colors: false,
            zero_line: false,
            value_labels: false,
            y_unit: None,
        }
    }

    pub fn with_labels(mut self, x_label: &str, y_label: &str) -> Self {
        self.x_label = x_label.to_string();
        self.y_label = y_label.to_string();
        self
    }

    pub fn with_series(mut self, field: &str) -> Self {
        self.series_field = Some(field.to_string());
        self
    }

    pub fn with_second_measure(mut self, measure: Measure) -> Self {
        self.measures.push(measure);
        self
    }

    pub fn signed(mut self) -> Self {
        self.signed_colors = true;
        self.zero_line = true;
        self
    }

    pub fn with_value_labels(mut self, unit: Option<&str>) -> Self {
        self.value_labels = true;
        self.y_unit = unit.map(str::to_string);
        self
    }
}

/// Shorten a label to `max` characters, replacing the tail with `...`.
/// Labels at or under the limit are returned unchanged.
pub fn truncate_label(label: &str, max: usize) -> String {
    if label.chars().count() <= max {
        return label.to_string();
    }
    let cut: String = label.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", cut)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_over_limit() {
        // 15-char product policy: keep 12, append the marker
        assert_eq!(
            truncate_label("Extraordinary Candy Bar", PRODUCT_LABEL_MAX),
            "Extraordinar..."
        );
        assert_eq!(
            truncate_label("Wonderful Brand X", BRAND_LABEL_MAX),
            "Wonderful..."
        );
    }

    #[test]
    fn test_truncate_at_or_under_limit() {
        assert_eq!(truncate_label("Choco", PRODUCT_LABEL_MAX), "Choco");
        // exactly at the limit stays untouched
        assert_eq!(
            truncate_label("123456789012345", PRODUCT_LABEL_MAX),
            "123456789012345"
        );
        assert_eq!(truncate_label("", BRAND_LABEL_MAX), "");
    }

    #[test]
    fn test_spec_builder() {
        let spec = ChartSpec::new(
            ChartKind::Bar,
            "Yearly sales growth",
            "YEAR_LABEL",
            Measure::new("GROWTHPERCENT", "Growth (%)"),
        )
        .signed()
        .with_value_labels(Some("%"));

        assert!(spec.signed_colors);
        assert!(spec.zero_line);
        assert!(spec.value_labels);
        assert_eq!(spec.y_unit.as_deref(), Some("%"));
        assert_eq!(spec.measures.len(), 1);
    }
}
