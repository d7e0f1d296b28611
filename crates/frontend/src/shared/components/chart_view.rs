//! SVG chart renderer for the declarative chart descriptions coming
//! from the backend. All geometry lives in pure helpers; the component
//! itself only assembles elements.

use super::number_format::format_cell_number;
use contracts::shared::{
    truncate_label, CellValue, ChartKind, ChartSpec, Table, NEGATIVE_COLOR, POSITIVE_COLOR,
};
use leptos::prelude::*;

const WIDTH: f64 = 880.0;
const HEIGHT: f64 = 440.0;
const MARGIN_LEFT: f64 = 72.0;
const MARGIN_RIGHT: f64 = 170.0;
const MARGIN_TOP: f64 = 42.0;
const MARGIN_BOTTOM: f64 = 64.0;

/// Default series colors, cycled when a chart has more series than
/// entries here.
pub(crate) const PALETTE: [&str; 8] = [
    "#4c72b0", "#dd8452", "#55a868", "#c44e52", "#8172b3", "#937860", "#da8bc3", "#8c8c8c",
];

pub(crate) fn palette_color(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

/// Fill color of one bar: the signed rule wins over everything, then a
/// fixed measure color, then the palette slot.
pub(crate) fn bar_fill(
    signed: bool,
    value: f64,
    fixed: Option<&str>,
    palette_index: usize,
) -> String {
    if signed {
        if value >= 0.0 {
            POSITIVE_COLOR.to_string()
        } else {
            NEGATIVE_COLOR.to_string()
        }
    } else if let Some(color) = fixed {
        color.to_string()
    } else {
        palette_color(palette_index).to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub(crate) fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub(crate) fn map(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if (d1 - d0).abs() < f64::EPSILON {
            return r0;
        }
        r0 + (value - d0) / (d1 - d0) * (r1 - r0)
    }
}

/// Evenly spaced ticks with a 1/2/5 step, covering `[min, max]`.
pub(crate) fn nice_ticks(min: f64, max: f64, target: usize) -> Vec<f64> {
    if !(max > min) {
        return vec![min, min + 1.0];
    }
    let raw_step = (max - min) / target.max(1) as f64;
    let magnitude = 10f64.powf(raw_step.log10().floor());
    let residual = raw_step / magnitude;
    let step = if residual <= 1.0 {
        magnitude
    } else if residual <= 2.0 {
        2.0 * magnitude
    } else if residual <= 5.0 {
        5.0 * magnitude
    } else {
        10.0 * magnitude
    };

    let start = (min / step).floor() as i64;
    let end = (max / step).ceil() as i64;
    (start..=end).map(|k| k as f64 * step).collect()
}

struct BarMark {
    value: f64,
    color: String,
    annotation: Option<String>,
}

#[component]
pub fn ChartView(spec: ChartSpec, table: Table) -> impl IntoView {
    let Some(x_idx) = table.column_index(&spec.x_field) else {
        return empty_state("Chart column missing");
    };
    if table.rows.is_empty() {
        return empty_state("No data for the current selection");
    }

    let categories = table.distinct_keys(&spec.x_field);
    if categories.is_empty() {
        return empty_state("No data for the current selection");
    }

    let series_keys: Option<Vec<String>> = spec
        .series_field
        .as_ref()
        .map(|field| table.distinct_keys(field));
    let series_idx = spec
        .series_field
        .as_ref()
        .and_then(|field| table.column_index(field));

    let measure_idx: Vec<Option<usize>> = spec
        .measures
        .iter()
        .map(|m| table.column_index(&m.field))
        .collect();

    // y domain over every plotted value; bars always include zero
    let mut data_min = f64::INFINITY;
    let mut data_max = f64::NEG_INFINITY;
    for row in &table.rows {
        for idx in measure_idx.iter().flatten() {
            if let Some(v) = row[*idx].as_f64() {
                data_min = data_min.min(v);
                data_max = data_max.max(v);
            }
        }
    }
    if !data_min.is_finite() {
        return empty_state("No data for the current selection");
    }
    let mut y_min = data_min.min(0.0);
    let mut y_max = data_max.max(0.0);
    let has_annotations = spec.measures.iter().any(|m| m.annotation.is_some());
    if has_annotations || spec.value_labels {
        // headroom for the rotated labels above the bars
        y_max += (y_max - y_min) * 0.3;
    }
    if y_max <= y_min {
        y_max = y_min + 1.0;
    }

    let ticks = nice_ticks(y_min, y_max, 6);
    let domain = (ticks[0], *ticks.last().unwrap_or(&y_max));
    let y_scale = LinearScale::new(domain, (HEIGHT - MARGIN_BOTTOM, MARGIN_TOP));

    let plot_left = MARGIN_LEFT;
    let plot_right = WIDTH - MARGIN_RIGHT;
    let plot_bottom = HEIGHT - MARGIN_BOTTOM;
    let slot_w = (plot_right - plot_left) / categories.len() as f64;
    let category_center =
        |i: usize| plot_left + slot_w * i as f64 + slot_w / 2.0;
    let category_of = |key: &str| categories.iter().position(|c| c == key);

    let mut elems: Vec<AnyView> = Vec::new();

    // gridlines + y tick labels
    for tick in &ticks {
        let py = y_scale.map(*tick);
        elems.push(
            view! {
                <line
                    x1=format!("{:.1}", plot_left)
                    y1=format!("{:.1}", py)
                    x2=format!("{:.1}", plot_right)
                    y2=format!("{:.1}", py)
                    stroke="#e3e3e3"
                    stroke-width="1"
                ></line>
                <text
                    x=format!("{:.1}", plot_left - 8.0)
                    y=format!("{:.1}", py + 4.0)
                    text-anchor="end"
                    font-size="11"
                    fill="#444"
                >
                    {format_cell_number(*tick)}
                </text>
            }
            .into_any(),
        );
    }

    // x category labels
    for (i, category) in categories.iter().enumerate() {
        elems.push(
            view! {
                <text
                    x=format!("{:.1}", category_center(i))
                    y=format!("{:.1}", plot_bottom + 20.0)
                    text-anchor="middle"
                    font-size="11"
                    fill="#444"
                >
                    {category.clone()}
                </text>
            }
            .into_any(),
        );
    }

    if spec.zero_line && domain.0 < 0.0 {
        let py = y_scale.map(0.0);
        elems.push(
            view! {
                <line
                    x1=format!("{:.1}", plot_left)
                    y1=format!("{:.1}", py)
                    x2=format!("{:.1}", plot_right)
                    y2=format!("{:.1}", py)
                    stroke="#555"
                    stroke-width="1"
                    stroke-dasharray="4 3"
                ></line>
            }
            .into_any(),
        );
    }

    match spec.kind {
        ChartKind::Line => {
            // one polyline per series value, or a single line
            let groups: Vec<(String, String)> = match &series_keys {
                Some(keys) => keys
                    .iter()
                    .enumerate()
                    .map(|(i, key)| (key.clone(), palette_color(i).to_string()))
                    .collect(),
                None => {
                    let color = spec.measures[0]
                        .color
                        .clone()
                        .unwrap_or_else(|| palette_color(0).to_string());
                    vec![(String::new(), color)]
                }
            };
            let Some(y_idx) = measure_idx[0] else {
                return empty_state("Chart column missing");
            };

            for (key, color) in groups {
                let mut points: Vec<(f64, f64)> = Vec::new();
                for row in &table.rows {
                    if let (Some(s_idx), false) = (series_idx, key.is_empty()) {
                        if row[s_idx].key() != key {
                            continue;
                        }
                    }
                    let (Some(ci), Some(v)) =
                        (category_of(&row[x_idx].key()), row[y_idx].as_f64())
                    else {
                        continue;
                    };
                    points.push((category_center(ci), y_scale.map(v)));
                }
                if points.is_empty() {
                    continue;
                }
                let path = points
                    .iter()
                    .map(|(x, y)| format!("{:.1},{:.1}", x, y))
                    .collect::<Vec<_>>()
                    .join(" ");
                let marker_color = color.clone();
                elems.push(
                    view! {
                        <polyline
                            points=path
                            fill="none"
                            stroke=color
                            stroke-width="2"
                        ></polyline>
                        {points
                            .into_iter()
                            .map(|(x, y)| {
                                let fill = marker_color.clone();
                                view! {
                                    <circle
                                        cx=format!("{:.1}", x)
                                        cy=format!("{:.1}", y)
                                        r="3.5"
                                        fill=fill
                                    ></circle>
                                }
                            })
                            .collect_view()}
                    }
                    .into_any(),
                );
            }
        }
        ChartKind::Bar | ChartKind::PairedBar => {
            let baseline = y_scale.map(0.0);
            for (i, category) in categories.iter().enumerate() {
                let marks = bar_marks(
                    &spec,
                    &table,
                    &measure_idx,
                    series_idx,
                    series_keys.as_deref(),
                    x_idx,
                    category,
                );
                if marks.is_empty() {
                    continue;
                }
                let band = slot_w * 0.8;
                let bar_w = band / marks.len() as f64;
                let x0 = plot_left + slot_w * i as f64 + slot_w * 0.1;

                for (j, mark) in marks.iter().enumerate() {
                    let x = x0 + bar_w * j as f64;
                    let py = y_scale.map(mark.value);
                    let top = py.min(baseline);
                    let height = (py - baseline).abs();
                    let cx = x + bar_w / 2.0;
                    elems.push(
                        view! {
                            <rect
                                x=format!("{:.1}", x + 1.0)
                                y=format!("{:.1}", top)
                                width=format!("{:.1}", (bar_w - 2.0).max(1.0))
                                height=format!("{:.1}", height.max(0.5))
                                fill=mark.color.clone()
                            ></rect>
                        }
                        .into_any(),
                    );
                    if let Some(label) = &mark.annotation {
                        let ty = top - 6.0;
                        elems.push(
                            view! {
                                <text
                                    x=format!("{:.1}", cx)
                                    y=format!("{:.1}", ty)
                                    transform=format!("rotate(-90 {:.1} {:.1})", cx, ty)
                                    text-anchor="start"
                                    font-size="10"
                                    font-weight="bold"
                                    fill="#222"
                                >
                                    {label.clone()}
                                </text>
                            }
                            .into_any(),
                        );
                    }
                    if spec.value_labels {
                        let unit = spec.y_unit.clone().unwrap_or_default();
                        let ty = if mark.value >= 0.0 {
                            top - 6.0
                        } else {
                            baseline + height + 14.0
                        };
                        elems.push(
                            view! {
                                <text
                                    x=format!("{:.1}", cx)
                                    y=format!("{:.1}", ty)
                                    text-anchor="middle"
                                    font-size="10"
                                    fill="#222"
                                >
                                    {format!("{:.2}{}", mark.value, unit)}
                                </text>
                            }
                            .into_any(),
                        );
                    }
                }
            }
        }
    }

    // legend for series or paired measures
    let legend: Vec<(String, String)> = match &series_keys {
        Some(keys) => keys
            .iter()
            .enumerate()
            .map(|(i, key)| (key.clone(), palette_color(i).to_string()))
            .collect(),
        None if spec.measures.len() > 1 => spec
            .measures
            .iter()
            .enumerate()
            .map(|(i, m)| {
                (
                    m.label.clone(),
                    m.color.clone().unwrap_or_else(|| palette_color(i).to_string()),
                )
            })
            .collect(),
        None => Vec::new(),
    };
    for (i, (label, color)) in legend.into_iter().enumerate() {
        let ly = MARGIN_TOP + 8.0 + i as f64 * 18.0;
        elems.push(
            view! {
                <rect
                    x=format!("{:.1}", plot_right + 14.0)
                    y=format!("{:.1}", ly - 9.0)
                    width="12"
                    height="12"
                    fill=color
                ></rect>
                <text
                    x=format!("{:.1}", plot_right + 30.0)
                    y=format!("{:.1}", ly + 1.0)
                    font-size="11"
                    fill="#333"
                >
                    {label}
                </text>
            }
            .into_any(),
        );
    }

    let title = spec.title.clone();
    let x_label = spec.x_label.clone();
    let y_label = spec.y_label.clone();
    view! {
        <svg
            class="chart"
            viewBox=format!("0 0 {} {}", WIDTH, HEIGHT)
            preserveAspectRatio="xMidYMid meet"
        >
            <text
                x=format!("{:.1}", (plot_left + plot_right) / 2.0)
                y="20"
                text-anchor="middle"
                font-size="15"
                font-weight="bold"
                fill="#222"
            >
                {title}
            </text>
            <text
                x=format!("{:.1}", (plot_left + plot_right) / 2.0)
                y=format!("{:.1}", HEIGHT - 16.0)
                text-anchor="middle"
                font-size="12"
                fill="#444"
            >
                {x_label}
            </text>
            <text
                x="18"
                y=format!("{:.1}", HEIGHT / 2.0)
                transform=format!("rotate(-90 18 {:.1})", HEIGHT / 2.0)
                text-anchor="middle"
                font-size="12"
                fill="#444"
            >
                {y_label}
            </text>
            <line
                x1=format!("{:.1}", plot_left)
                y1=format!("{:.1}", MARGIN_TOP)
                x2=format!("{:.1}", plot_left)
                y2=format!("{:.1}", plot_bottom)
                stroke="#888"
                stroke-width="1"
            ></line>
            <line
                x1=format!("{:.1}", plot_left)
                y1=format!("{:.1}", plot_bottom)
                x2=format!("{:.1}", plot_right)
                y2=format!("{:.1}", plot_bottom)
                stroke="#888"
                stroke-width="1"
            ></line>
            {elems}
        </svg>
    }
    .into_any()
}

fn empty_state(message: &str) -> AnyView {
    let message = message.to_string();
    view! { <div class="chart-empty">{message}</div> }.into_any()
}

/// The bars drawn in one category slot, left to right.
fn bar_marks(
    spec: &ChartSpec,
    table: &Table,
    measure_idx: &[Option<usize>],
    series_idx: Option<usize>,
    series_keys: Option<&[String]>,
    x_idx: usize,
    category: &str,
) -> Vec<BarMark> {
    let rows: Vec<&Vec<CellValue>> = table
        .rows
        .iter()
        .filter(|row| row[x_idx].key() == category)
        .collect();

    match spec.kind {
        ChartKind::PairedBar => {
            // one row per category, one bar per measure
            let Some(row) = rows.first() else {
                return Vec::new();
            };
            spec.measures
                .iter()
                .zip(measure_idx.iter())
                .enumerate()
                .filter_map(|(mi, (measure, idx))| {
                    let value = row[(*idx)?].as_f64()?;
                    Some(BarMark {
                        value,
                        color: bar_fill(false, value, measure.color.as_deref(), mi),
                        annotation: annotation_text(measure, row, table),
                    })
                })
                .collect()
        }
        _ => {
            // one bar per row of the category, colored by series
            let measure = &spec.measures[0];
            let Some(y_idx) = measure_idx[0] else {
                return Vec::new();
            };
            rows.iter()
                .filter_map(|row| {
                    let value = row[y_idx].as_f64()?;
                    let palette_index = match (series_idx, series_keys) {
                        (Some(s_idx), Some(keys)) => keys
                            .iter()
                            .position(|k| *k == row[s_idx].key())
                            .unwrap_or(0),
                        _ => 0,
                    };
                    Some(BarMark {
                        value,
                        color: bar_fill(
                            spec.signed_colors,
                            value,
                            measure.color.as_deref(),
                            palette_index,
                        ),
                        annotation: annotation_text(measure, row, table),
                    })
                })
                .collect()
        }
    }
}

fn annotation_text(
    measure: &contracts::shared::Measure,
    row: &[CellValue],
    table: &Table,
) -> Option<String> {
    let annotation = measure.annotation.as_ref()?;
    let idx = table.column_index(&annotation.field)?;
    let raw = row[idx].key();
    if raw.is_empty() {
        return None;
    }
    Some(match annotation.max_chars {
        Some(max) => truncate_label(&raw, max),
        None => raw,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nice_ticks_cover_domain() {
        let ticks = nice_ticks(0.0, 97.0, 6);
        assert!(*ticks.first().unwrap() <= 0.0);
        assert!(*ticks.last().unwrap() >= 97.0);
        // 1/2/5 step
        let step = ticks[1] - ticks[0];
        assert!((step - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_nice_ticks_negative_domain() {
        let ticks = nice_ticks(-12.5, 8.0, 5);
        assert!(*ticks.first().unwrap() <= -12.5);
        assert!(*ticks.last().unwrap() >= 8.0);
        assert!(ticks.iter().any(|t| t.abs() < 1e-9));
    }

    #[test]
    fn test_linear_scale_maps_endpoints() {
        let scale = LinearScale::new((0.0, 100.0), (400.0, 40.0));
        assert!((scale.map(0.0) - 400.0).abs() < 1e-9);
        assert!((scale.map(100.0) - 40.0).abs() < 1e-9);
        assert!((scale.map(50.0) - 220.0).abs() < 1e-9);
    }

    #[test]
    fn test_palette_cycles() {
        assert_eq!(palette_color(0), palette_color(PALETTE.len()));
        assert_ne!(palette_color(0), palette_color(1));
    }

    #[test]
    fn test_bar_fill_signed_rule_wins() {
        assert_eq!(bar_fill(true, 5.0, Some("orange"), 2), POSITIVE_COLOR);
        assert_eq!(bar_fill(true, -0.1, None, 0), NEGATIVE_COLOR);
        assert_eq!(bar_fill(false, 1.0, Some("orange"), 0), "orange");
        assert_eq!(bar_fill(false, 1.0, None, 1), palette_color(1));
    }
}
