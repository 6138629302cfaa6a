// Canonical content performance records and metric definitions
use serde::{Deserialize, Serialize};

/// The five numeric metrics tracked per content item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    CardExposure,
    PageVisits,
    ArticleClickRate,
    ActionClicks,
    FeatureConversionRate,
}

impl Metric {
    pub const ALL: [Metric; 5] = [
        Metric::CardExposure,
        Metric::PageVisits,
        Metric::ArticleClickRate,
        Metric::ActionClicks,
        Metric::FeatureConversionRate,
    ];

    pub fn canonical_name(&self) -> &'static str {
        match self {
            Metric::CardExposure => "card_exposure",
            Metric::PageVisits => "page_visits",
            Metric::ArticleClickRate => "article_click_rate",
            Metric::ActionClicks => "action_clicks",
            Metric::FeatureConversionRate => "feature_conversion_rate",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Metric::CardExposure => "Card Exposure (UV)",
            Metric::PageVisits => "Page Visits (UV)",
            Metric::ArticleClickRate => "Article Click Rate",
            Metric::ActionClicks => "Action Clicks (UV)",
            Metric::FeatureConversionRate => "Feature Conversion Rate",
        }
    }

    /// Display rule: anything whose canonical name carries "rate" is a fraction
    /// shown as a percentage; everything else is a count.
    pub fn is_rate(&self) -> bool {
        self.canonical_name().contains("rate")
    }

    pub fn from_canonical_name(name: &str) -> Option<Metric> {
        Metric::ALL.iter().copied().find(|m| m.canonical_name() == name)
    }
}

/// One row of the normalized dataset. `date` and `title` are kept as-is;
/// rates are always stored as fractions in [0, 1].
#[derive(Debug, Clone, PartialEq)]
pub struct ContentRecord {
    pub date: String,
    pub title: String,
    pub card_exposure: f64,
    pub page_visits: f64,
    pub article_click_rate: f64,
    pub action_clicks: f64,
    pub feature_conversion_rate: f64,
}

impl ContentRecord {
    pub fn metric(&self, metric: Metric) -> f64 {
        match metric {
            Metric::CardExposure => self.card_exposure,
            Metric::PageVisits => self.page_visits,
            Metric::ArticleClickRate => self.article_click_rate,
            Metric::ActionClicks => self.action_clicks,
            Metric::FeatureConversionRate => self.feature_conversion_rate,
        }
    }
}

/// A pass-through input column where every non-empty cell parsed as a number.
/// Usable as an extra filter candidate, never as a chart metric.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtraColumn {
    pub name: String,
    pub values: Vec<f64>,
}

/// The session working set after normalization and coercion.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub records: Vec<ContentRecord>,
    pub extras: Vec<ExtraColumn>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Resolves a filter column by name: one of the canonical metrics, or a
    /// numeric pass-through column. Unknown names yield `None` for every row.
    pub fn numeric_value(&self, row: usize, column: &str) -> Option<f64> {
        if let Some(metric) = Metric::from_canonical_name(column) {
            return self.records.get(row).map(|r| r.metric(metric));
        }
        self.extras
            .iter()
            .find(|c| c.name == column)
            .and_then(|c| c.values.get(row).copied())
    }

    /// Columns a panel filter may reference.
    pub fn filter_candidates(&self) -> Vec<String> {
        let mut candidates: Vec<String> = Metric::ALL
            .iter()
            .map(|m| m.canonical_name().to_string())
            .collect();
        candidates.extend(self.extras.iter().map(|c| c.name.clone()));
        candidates
    }
}

/// Integer with thousands separators, e.g. 1234567 -> "1,234,567".
pub fn format_count(value: f64) -> String {
    let rounded = value.round() as i64;
    let digits = rounded.abs().to_string();
    let mut grouped = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Fraction shown as a percentage with one decimal, e.g. 0.123 -> "12.3%".
pub fn format_rate(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}

pub fn format_metric(metric: Metric, value: f64) -> String {
    if metric.is_rate() {
        format_rate(value)
    } else {
        format_count(value)
    }
}
