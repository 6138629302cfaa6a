// Dashboard service - Use case for building dashboards from the dataset
use crate::domain::chart::{ChartSpec, SeriesSpec};
use crate::domain::dashboard::{Dashboard, MetricTile, PanelOutput};
use crate::domain::errors::DashboardError;
use crate::domain::panel::{AxisSide, ChartKind, DashboardRequest, OverviewConfig, PanelConfig};
use crate::domain::record::{Dataset, Metric, format_metric};
use crate::infrastructure::config::DashboardConfig;

#[derive(Clone)]
pub struct DashboardService {
    config: DashboardConfig,
}

impl DashboardService {
    pub fn new(config: DashboardConfig) -> Self {
        Self { config }
    }

    /// Runs one full render pass: global filter, summary tiles, overview, and
    /// every enabled panel. An empty global view halts the whole dashboard.
    pub fn build_dashboard(
        &self,
        dataset: &Dataset,
        request: &DashboardRequest,
    ) -> Result<Dashboard, DashboardError> {
        let threshold = request
            .min_exposure
            .unwrap_or(self.config.filter.default_min_exposure)
            .clamp(
                self.config.filter.min_exposure_floor,
                self.config.filter.min_exposure_ceiling,
            );

        let global_view = self.global_view(dataset, threshold);
        tracing::debug!(threshold, sample_size = global_view.len(), "global filter applied");
        if global_view.is_empty() {
            return Err(DashboardError::NoData);
        }

        let tiles = self.summary_tiles(dataset, &global_view);
        let default_commentary = self.default_commentary(dataset, &global_view);

        let mut panels = Vec::new();
        if request.overview.enabled {
            panels.push(self.overview_panel(dataset, &global_view, &request.overview));
        }
        for (idx, panel) in request.panels.iter().filter(|p| p.enabled).enumerate() {
            panels.push(self.custom_panel(dataset, &global_view, panel, idx));
        }

        Ok(Dashboard {
            title: "Content Performance Analysis".to_string(),
            sample_size: global_view.len(),
            tiles,
            panels,
            default_commentary,
        })
    }

    /// Row indices passing `card_exposure > threshold`.
    fn global_view(&self, dataset: &Dataset, threshold: f64) -> Vec<usize> {
        (0..dataset.len())
            .filter(|&i| dataset.records[i].card_exposure > threshold)
            .collect()
    }

    fn mean(dataset: &Dataset, view: &[usize], metric: Metric) -> f64 {
        // Callers guarantee a non-empty view; the NaN path is unreachable.
        let sum: f64 = view.iter().map(|&i| dataset.records[i].metric(metric)).sum();
        sum / view.len() as f64
    }

    fn summary_tiles(&self, dataset: &Dataset, view: &[usize]) -> Vec<MetricTile> {
        [
            ("avg_exposure", "Avg Card Exposure", Metric::CardExposure),
            ("avg_visits", "Avg Page Visits", Metric::PageVisits),
            ("avg_article_rate", "Avg Article Click Rate (CTR)", Metric::ArticleClickRate),
            ("avg_conversion_rate", "Avg Feature Conversion (CVR)", Metric::FeatureConversionRate),
        ]
        .into_iter()
        .map(|(id, label, metric)| {
            let value = Self::mean(dataset, view, metric);
            MetricTile {
                id: id.to_string(),
                label: label.to_string(),
                value,
                display: format_metric(metric, value),
            }
        })
        .collect()
    }

    /// Stable descending sort by the given metric; ties keep row order.
    fn ranked(dataset: &Dataset, view: &[usize], metric: Metric, limit: usize) -> Vec<usize> {
        let mut rows = view.to_vec();
        rows.sort_by(|&a, &b| {
            dataset.records[b]
                .metric(metric)
                .total_cmp(&dataset.records[a].metric(metric))
        });
        rows.truncate(limit.min(rows.len()));
        rows
    }

    /// The fixed dual-axis overview: exposure bars left, visits and clicks as
    /// lines on the right, sorted descending by exposure.
    fn overview_panel(
        &self,
        dataset: &Dataset,
        global_view: &[usize],
        overview: &OverviewConfig,
    ) -> PanelOutput {
        let rows = Self::ranked(dataset, global_view, Metric::CardExposure, global_view.len());
        let categories = rows
            .iter()
            .map(|&i| dataset.records[i].title.clone())
            .collect();

        let bar_color = overview
            .color
            .clone()
            .unwrap_or_else(|| self.config.overview.exposure_color.clone());

        let series = vec![
            Self::series_of(
                "Exposure (L)",
                dataset,
                &rows,
                Metric::CardExposure,
                ChartKind::Bar,
                AxisSide::Primary,
                bar_color,
            ),
            Self::series_of(
                "Visits (R)",
                dataset,
                &rows,
                Metric::PageVisits,
                ChartKind::Line,
                AxisSide::Secondary,
                self.config.overview.visits_color.clone(),
            ),
            Self::series_of(
                "Clicks (R)",
                dataset,
                &rows,
                Metric::ActionClicks,
                ChartKind::Line,
                AxisSide::Secondary,
                self.config.overview.clicks_color.clone(),
            ),
        ];

        PanelOutput::Chart(ChartSpec {
            id: "overview".to_string(),
            title: "Performance Overview (Dual Axis)".to_string(),
            caption: None,
            categories,
            series,
            primary_max: None,
            secondary_max: None,
        })
    }

    fn custom_panel(
        &self,
        dataset: &Dataset,
        global_view: &[usize],
        panel: &PanelConfig,
        position: usize,
    ) -> PanelOutput {
        let id = format!("panel-{}", panel.id);

        let Some(sort_metric) = panel.sort_metric() else {
            return PanelOutput::NoData {
                id,
                title: format!("Chart {}", panel.id),
                message: "select at least one metric".to_string(),
            };
        };

        let is_combo = panel.series.len() > 1;
        let title = if is_combo {
            format!("Chart {}: Multi-Metric Combo", panel.id)
        } else {
            format!("Chart {}: {}", panel.id, sort_metric.label())
        };

        let (view, caption) = self.panel_view(dataset, global_view, panel);
        if view.is_empty() {
            return PanelOutput::NoData {
                id,
                title,
                message: "no rows match the panel filters".to_string(),
            };
        }

        let rows = Self::ranked(dataset, &view, sort_metric, panel.bounded_top_n());
        let categories = rows
            .iter()
            .map(|&i| dataset.records[i].title.clone())
            .collect();

        let series: Vec<SeriesSpec> = panel
            .series
            .iter()
            .enumerate()
            .map(|(i, s)| {
                let color = s.color.clone().unwrap_or_else(|| {
                    if is_combo {
                        self.config.palette.series[i % self.config.palette.series.len()].clone()
                    } else {
                        self.config.palette.single[position % self.config.palette.single.len()]
                            .clone()
                    }
                });
                // The single-metric family always plots on the primary axis.
                let axis = if is_combo { s.axis } else { AxisSide::Primary };
                Self::series_of(s.metric.label(), dataset, &rows, s.metric, s.kind, axis, color)
            })
            .collect();

        let (primary_max, secondary_max) = if is_combo {
            (
                Self::axis_max(&series, AxisSide::Primary),
                Self::axis_max(&series, AxisSide::Secondary),
            )
        } else {
            (None, None)
        };

        PanelOutput::Chart(ChartSpec {
            id,
            title,
            caption,
            categories,
            series,
            primary_max,
            secondary_max,
        })
    }

    /// Resolves a panel's filtered view. Panels without predicates fall back
    /// to the global view; with predicates they filter the full dataset,
    /// AND-combining every predicate over a known numeric column.
    fn panel_view(
        &self,
        dataset: &Dataset,
        global_view: &[usize],
        panel: &PanelConfig,
    ) -> (Vec<usize>, Option<String>) {
        let candidates = dataset.filter_candidates();
        let applicable: Vec<_> = panel
            .filters
            .iter()
            .filter(|f| {
                let known = candidates.contains(&f.column);
                if !known {
                    tracing::warn!(column = %f.column, "ignoring filter on unknown or non-numeric column");
                }
                known
            })
            .collect();

        if applicable.is_empty() {
            return (global_view.to_vec(), None);
        }

        let view = (0..dataset.len())
            .filter(|&row| {
                applicable.iter().all(|f| {
                    dataset
                        .numeric_value(row, &f.column)
                        .map(|v| v > f.threshold)
                        .unwrap_or(false)
                })
            })
            .collect();

        let caption = applicable
            .iter()
            .map(|f| format!("{}>{}", f.column, f.threshold))
            .collect::<Vec<_>>()
            .join(", ");
        (view, Some(caption))
    }

    fn series_of(
        name: &str,
        dataset: &Dataset,
        rows: &[usize],
        metric: Metric,
        kind: ChartKind,
        axis: AxisSide,
        color: String,
    ) -> SeriesSpec {
        SeriesSpec {
            name: name.to_string(),
            kind,
            axis,
            color,
            is_rate: metric.is_rate(),
            values: rows.iter().map(|&i| dataset.records[i].metric(metric)).collect(),
        }
    }

    /// Padded upper bound for one value axis of a combo chart.
    fn axis_max(series: &[SeriesSpec], axis: AxisSide) -> Option<f64> {
        series
            .iter()
            .filter(|s| s.axis == axis)
            .flat_map(|s| s.values.iter().copied())
            .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |m| m.max(v))))
            .map(|m| m * 1.25)
    }

    fn default_commentary(&self, dataset: &Dataset, view: &[usize]) -> String {
        let top = Self::ranked(dataset, view, Metric::FeatureConversionRate, 3);
        let best = top
            .first()
            .map(|&i| dataset.records[i].title.as_str())
            .unwrap_or("N/A");
        format!(
            "Insights for this period:\n\n\
             1. Highest conversion: \"{best}\" performed best.\n   \
             Suggestion: review its call-to-action and layout.\n\n\
             2. Strategy: (add your observations here...)\n"
        )
    }
}
