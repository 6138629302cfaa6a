// Chart specifications - renderer-agnostic description of one panel
use crate::domain::panel::{AxisSide, ChartKind};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct SeriesSpec {
    pub name: String,
    pub kind: ChartKind,
    pub axis: AxisSide,
    pub color: String,
    /// Rate series carry fractions and are labeled as percentages.
    pub is_rate: bool,
    pub values: Vec<f64>,
}

/// Everything a renderer needs to draw one panel. Assembled by the dashboard
/// service; mapped to ECharts options in the infrastructure layer.
#[derive(Debug, Clone, Serialize)]
pub struct ChartSpec {
    pub id: String,
    pub title: String,
    /// Human-readable description of the active panel filters, if any.
    pub caption: Option<String>,
    /// Category axis labels (content titles), already ordered.
    pub categories: Vec<String>,
    pub series: Vec<SeriesSpec>,
    /// Upper bounds padded to 1.25x the axis maximum so outside value labels
    /// have room; only set for the combo family.
    pub primary_max: Option<f64>,
    pub secondary_max: Option<f64>,
}

impl ChartSpec {
    pub fn has_secondary_axis(&self) -> bool {
        self.series.iter().any(|s| s.axis == AxisSide::Secondary)
    }
}
