// Per-request dashboard configuration - immutable value objects built once
// from user input and passed by value into the pipeline
use crate::domain::record::Metric;
use serde::Deserialize;

pub const TOP_N_MIN: usize = 3;
pub const TOP_N_MAX: usize = 50;
const DEFAULT_TOP_N: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    #[default]
    Bar,
    Line,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisSide {
    #[default]
    Primary,
    Secondary,
}

/// One metric within a panel: what to plot, how, and on which axis.
#[derive(Debug, Clone, Deserialize)]
pub struct SeriesConfig {
    pub metric: Metric,
    #[serde(default)]
    pub kind: ChartKind,
    #[serde(default)]
    pub axis: AxisSide,
    #[serde(default)]
    pub color: Option<String>,
}

/// A `column > threshold` predicate; panel predicates are AND-combined.
#[derive(Debug, Clone, Deserialize)]
pub struct FilterPredicate {
    pub column: String,
    pub threshold: f64,
}

/// One chart panel. A single series entry renders the single-metric family;
/// several entries render the multi-metric combo family.
#[derive(Debug, Clone, Deserialize)]
pub struct PanelConfig {
    pub id: u32,
    #[serde(default = "enabled_default")]
    pub enabled: bool,
    #[serde(default = "top_n_default")]
    pub top_n: usize,
    #[serde(default)]
    pub series: Vec<SeriesConfig>,
    #[serde(default)]
    pub filters: Vec<FilterPredicate>,
}

impl PanelConfig {
    pub fn bounded_top_n(&self) -> usize {
        self.top_n.clamp(TOP_N_MIN, TOP_N_MAX)
    }

    /// The metric rows are ranked by: the first bar-typed series if the combo
    /// has one, else the first selected series.
    pub fn sort_metric(&self) -> Option<Metric> {
        self.series
            .iter()
            .find(|s| s.kind == ChartKind::Bar)
            .or_else(|| self.series.first())
            .map(|s| s.metric)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OverviewConfig {
    #[serde(default = "enabled_default")]
    pub enabled: bool,
    #[serde(default)]
    pub color: Option<String>,
}

impl Default for OverviewConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            color: None,
        }
    }
}

/// The full request-scoped configuration. Constructed fresh on every render
/// pass; nothing in the pipeline reads ambient state.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DashboardRequest {
    /// Sheet-share link, used when no workbook is uploaded.
    #[serde(default)]
    pub sheet_url: Option<String>,
    /// Global `card_exposure > threshold` filter; falls back to the configured
    /// default and is clamped to the configured bounds.
    #[serde(default)]
    pub min_exposure: Option<f64>,
    #[serde(default)]
    pub overview: OverviewConfig,
    #[serde(default)]
    pub panels: Vec<PanelConfig>,
    /// Free-text commentary for the export paths.
    #[serde(default)]
    pub commentary: Option<String>,
}

fn enabled_default() -> bool {
    true
}

fn top_n_default() -> usize {
    DEFAULT_TOP_N
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults_from_minimal_json() {
        let req: DashboardRequest = serde_json::from_str("{}").unwrap();
        assert!(req.overview.enabled);
        assert!(req.panels.is_empty());
        assert!(req.min_exposure.is_none());
    }

    #[test]
    fn test_panel_deserializes_with_defaults() {
        let panel: PanelConfig = serde_json::from_str(
            r#"{"id": 1, "series": [{"metric": "feature_conversion_rate"}]}"#,
        )
        .unwrap();

        assert!(panel.enabled);
        assert_eq!(panel.top_n, 6);
        assert_eq!(panel.series[0].kind, ChartKind::Bar);
        assert_eq!(panel.series[0].axis, AxisSide::Primary);
        assert!(panel.filters.is_empty());
    }

    #[test]
    fn test_top_n_clamped_to_bounds() {
        let mut panel: PanelConfig =
            serde_json::from_str(r#"{"id": 1, "top_n": 500, "series": []}"#).unwrap();
        assert_eq!(panel.bounded_top_n(), TOP_N_MAX);
        panel.top_n = 1;
        assert_eq!(panel.bounded_top_n(), TOP_N_MIN);
    }

    #[test]
    fn test_sort_metric_prefers_first_bar() {
        let panel: PanelConfig = serde_json::from_str(
            r#"{
                "id": 4,
                "series": [
                    {"metric": "feature_conversion_rate", "kind": "line", "axis": "secondary"},
                    {"metric": "card_exposure", "kind": "bar"}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(panel.sort_metric(), Some(crate::domain::record::Metric::CardExposure));
    }
}
