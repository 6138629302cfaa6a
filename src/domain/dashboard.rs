// Dashboard domain model
use crate::domain::chart::ChartSpec;
use serde::Serialize;

/// One summary statistic card computed over the global filtered view.
#[derive(Debug, Clone, Serialize)]
pub struct MetricTile {
    pub id: String,
    pub label: String,
    pub value: f64,
    /// Pre-formatted per the metric's display rule (count vs. percentage).
    pub display: String,
}

/// A panel slot in render order: either a chart or the "no data" notice that
/// replaces it when its filtered view is empty.
#[derive(Debug, Clone)]
pub enum PanelOutput {
    Chart(ChartSpec),
    NoData { id: String, title: String, message: String },
}

#[derive(Debug, Clone)]
pub struct Dashboard {
    pub title: String,
    /// Rows passing the global exposure filter.
    pub sample_size: usize,
    pub tiles: Vec<MetricTile>,
    pub panels: Vec<PanelOutput>,
    /// Generated insight scaffold the user can edit before exporting.
    pub default_commentary: String,
}
