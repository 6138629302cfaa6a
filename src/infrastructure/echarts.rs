// Mapping from domain chart specs to ECharts options
use crate::domain::chart::{ChartSpec, SeriesSpec};
use crate::domain::panel::{AxisSide, ChartKind};
use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{
        AxisLabel, AxisType, ItemStyle, JsFunction, Label, LabelPosition, LineStyle, Tooltip,
        Trigger,
    },
    series::{Bar, Line},
};

/// Value labels drawn above marks: percentages with one decimal for rate
/// series, thousands-grouped integers for counts.
fn value_label(is_rate: bool) -> Label {
    let formatter = if is_rate {
        JsFunction::new_with_args("params", "return (params.value * 100).toFixed(1) + '%';")
    } else {
        JsFunction::new_with_args("params", "return Math.round(params.value).toLocaleString();")
    };
    Label::new()
        .show(true)
        .position(LabelPosition::Top)
        .formatter(formatter)
}

fn axis_index(series: &SeriesSpec) -> f64 {
    match series.axis {
        AxisSide::Primary => 0.0,
        AxisSide::Secondary => 1.0,
    }
}

/// Builds the ECharts chart for one panel spec.
pub fn build_chart(spec: &ChartSpec) -> Chart {
    let mut chart = Chart::new()
        .title(Title::new().text(spec.title.clone()))
        .tooltip(Tooltip::new().trigger(Trigger::Axis))
        .legend(Legend::new())
        .grid(Grid::new().contain_label(true).bottom("15%"))
        .x_axis(
            Axis::new()
                .type_(AxisType::Category)
                .data(spec.categories.clone())
                // Tilted so long content titles do not overlap.
                .axis_label(AxisLabel::new().rotate(-45.0)),
        );

    let mut primary = Axis::new().type_(AxisType::Value);
    if let Some(max) = spec.primary_max {
        primary = primary.max(max);
    }
    chart = chart.y_axis(primary);

    if spec.has_secondary_axis() {
        let mut secondary = Axis::new().type_(AxisType::Value);
        if let Some(max) = spec.secondary_max {
            secondary = secondary.max(max);
        }
        chart = chart.y_axis(secondary);
    }

    for series in &spec.series {
        chart = match series.kind {
            ChartKind::Bar => chart.series(
                Bar::new()
                    .name(series.name.clone())
                    .data(series.values.clone())
                    .y_axis_index(axis_index(series))
                    .item_style(ItemStyle::new().color(series.color.clone()))
                    .label(value_label(series.is_rate)),
            ),
            ChartKind::Line => chart.series(
                Line::new()
                    .name(series.name.clone())
                    .data(series.values.clone())
                    .y_axis_index(axis_index(series))
                    .line_style(LineStyle::new().color(series.color.clone()).width(3.0))
                    .item_style(ItemStyle::new().color(series.color.clone()))
                    .label(value_label(series.is_rate)),
            ),
        };
    }

    chart
}

/// ECharts option payload as a JavaScript object literal. The label
/// formatters are real functions, so this is not JSON; it must be evaluated
/// in script context before `echarts.setOption`.
pub fn chart_options(spec: &ChartSpec) -> String {
    build_chart(spec).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn combo_spec() -> ChartSpec {
        ChartSpec {
            id: "panel-4".to_string(),
            title: "Chart 4: Multi-Metric Combo".to_string(),
            caption: None,
            categories: vec!["A".to_string(), "B".to_string()],
            series: vec![
                SeriesSpec {
                    name: "Card Exposure (UV)".to_string(),
                    kind: ChartKind::Bar,
                    axis: AxisSide::Primary,
                    color: "#4facfe".to_string(),
                    is_rate: false,
                    values: vec![1200.0, 300.0],
                },
                SeriesSpec {
                    name: "Feature Conversion Rate".to_string(),
                    kind: ChartKind::Line,
                    axis: AxisSide::Secondary,
                    color: "#fbc2eb".to_string(),
                    is_rate: true,
                    values: vec![0.05, 0.01],
                },
            ],
            primary_max: Some(1500.0),
            secondary_max: Some(0.0625),
        }
    }

    // The rendered option carries bare JS functions, so assertions work on
    // the text with whitespace removed rather than a parsed JSON tree.
    fn squash(options: &str) -> String {
        options.split_whitespace().collect()
    }

    #[test]
    fn test_combo_options_have_two_value_axes_and_typed_series() {
        let squashed = squash(&chart_options(&combo_spec()));

        assert_eq!(squashed.matches(r#""type":"value""#).count(), 2);
        assert!(squashed.contains(r#""type":"bar""#));
        assert!(squashed.contains(r#""type":"line""#));
        assert!(squashed.contains(r#""A""#));
        assert!(squashed.contains("1500"));
    }

    #[test]
    fn test_single_series_renders_one_value_axis() {
        let mut spec = combo_spec();
        spec.series.truncate(1);
        spec.secondary_max = None;

        let squashed = squash(&chart_options(&spec));
        assert_eq!(squashed.matches(r#""type":"value""#).count(), 1);
    }

    #[test]
    fn test_label_formatters_render_as_bare_functions() {
        let options = chart_options(&combo_spec());

        assert!(options.contains("function(params)"));
        assert!(options.contains("toFixed(1)"));
        assert!(options.contains("toLocaleString"));
        // Marker-wrapped quoted strings would reach ECharts as template text.
        assert!(!options.contains("#*#*#*#"));
        assert!(!options.contains(r#""function"#));
    }
}
