// Self-contained HTML report rendering and download responses
use crate::domain::dashboard::{Dashboard, PanelOutput};
use crate::infrastructure::echarts;
use axum::{
    body::Body,
    http::{HeaderValue, Response, StatusCode, header},
};
use chrono::NaiveDate;

/// Escapes user-controlled text for embedding in HTML. Mandatory for the
/// commentary block and anything derived from sheet contents.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// The chart option literal is embedded inside a `<script>` block and must
/// not be able to close it early, even via text smuggled into a content
/// title. `</` only occurs inside string literals there, where `<\/` is an
/// equivalent escape.
fn escape_script_text(script: &str) -> String {
    script.replace("</", "<\\/")
}

pub fn report_filename(date: NaiveDate) -> String {
    format!("content_analysis_report_{}.html", date.format("%Y%m%d"))
}

pub fn note_filename(date: NaiveDate) -> String {
    format!("analysis_note_{}.md", date.format("%Y%m%d"))
}

/// Commentary-only Markdown note.
pub fn render_note(commentary: &str) -> String {
    format!("# Content Data Report\n\n{commentary}\n")
}

/// Renders the standalone report: summary tiles, the escaped commentary, and
/// every chart in panel order with a placeholder for empty panels. Charts are
/// interactive via the ECharts CDN bundle, so the file can be shared as-is.
pub fn render_report(dashboard: &Dashboard, commentary: &str) -> String {
    let tiles: String = dashboard
        .tiles
        .iter()
        .map(|tile| {
            format!(
                r#"      <div class="metric-card">
        <div class="metric-label">{}</div>
        <div class="metric-value">{}</div>
      </div>
"#,
                escape_html(&tile.label),
                escape_html(&tile.display)
            )
        })
        .collect();

    let mut containers = String::new();
    let mut scripts = String::new();
    for panel in &dashboard.panels {
        match panel {
            PanelOutput::Chart(spec) => {
                let caption = spec
                    .caption
                    .as_deref()
                    .map(|c| format!(r#"<div class="caption">Filter: {}</div>"#, escape_html(c)))
                    .unwrap_or_default();
                containers.push_str(&format!(
                    r#"    <div class="chart-container">{caption}<div id="{id}" class="chart"></div></div>
"#,
                    id = escape_html(&spec.id)
                ));
                let options = escape_script_text(&echarts::chart_options(spec));
                scripts.push_str(&format!(
                    "    echarts.init(document.getElementById('{id}')).setOption({options});\n",
                    id = escape_html(&spec.id)
                ));
            }
            PanelOutput::NoData { title, message, .. } => {
                containers.push_str(&format!(
                    r#"    <div class="chart-container empty"><h3>{}</h3><p>{}</p></div>
"#,
                    escape_html(title),
                    escape_html(message)
                ));
            }
        }
    }

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <title>{title}</title>
  <meta charset="utf-8">
  <script src="https://cdn.jsdelivr.net/npm/echarts@5/dist/echarts.min.js"></script>
  <style>
    body {{ background-color: #050505; color: #e2e8f0; font-family: sans-serif; padding: 40px; max-width: 1200px; margin: 0 auto; }}
    h1 {{ color: #4facfe; margin-bottom: 40px; }}
    h2 {{ border-bottom: 1px solid #333; padding-bottom: 10px; margin-top: 40px; color: #fff; }}
    .metrics-grid {{ display: grid; grid-template-columns: repeat(4, 1fr); gap: 20px; margin-bottom: 40px; }}
    .metric-card {{ background: rgba(255, 255, 255, 0.05); padding: 20px; border-radius: 12px; text-align: center; }}
    .metric-value {{ font-size: 2rem; font-weight: bold; color: #4facfe; }}
    .metric-label {{ color: #94a3b8; font-size: 0.9rem; text-transform: uppercase; }}
    .summary-box {{ background: #0f1115; padding: 25px; border-radius: 12px; border-left: 4px solid #4facfe; margin-bottom: 40px; white-space: pre-wrap; line-height: 1.6; }}
    .chart-container {{ margin-bottom: 50px; background: #0f1115; padding: 20px; border-radius: 12px; }}
    .chart {{ min-height: 420px; }}
    .caption {{ color: #94a3b8; font-size: 0.85rem; margin-bottom: 8px; }}
    .empty p {{ color: #94a3b8; }}
    .footer {{ text-align: center; margin-top: 50px; color: #666; font-size: 0.8rem; }}
  </style>
</head>
<body>
  <h1>{title}</h1>

  <div class="metrics-grid">
{tiles}  </div>

  <h2>Theme Analysis</h2>
  <div class="summary-box">{commentary}</div>

  <h2>Visualizations</h2>
{containers}
  <div class="footer">Generated by Content Analytics</div>
  <script>
{scripts}  </script>
</body>
</html>
"#,
        title = escape_html(&dashboard.title),
        commentary = escape_html(commentary),
    )
}

/// One-shot download response; nothing is persisted server-side.
pub fn attachment_response(
    body: String,
    content_type: &str,
    filename: &str,
) -> Result<Response<Body>, StatusCode> {
    let disposition = format!("attachment; filename=\"{filename}\"");
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(
            header::CONTENT_DISPOSITION,
            HeaderValue::from_str(&disposition).map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?,
        )
        .body(Body::from(body))
        .map_err(|e| {
            tracing::error!("response build error: {e}");
            StatusCode::INTERNAL_SERVER_ERROR
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chart::{ChartSpec, SeriesSpec};
    use crate::domain::dashboard::MetricTile;
    use crate::domain::panel::{AxisSide, ChartKind};

    #[test]
    fn test_escape_html_covers_markup_specials() {
        assert_eq!(
            escape_html(r#"<b>&"it's"</b>"#),
            "&lt;b&gt;&amp;&quot;it&#39;s&quot;&lt;/b&gt;"
        );
    }

    fn dashboard() -> Dashboard {
        Dashboard {
            title: "Content Performance Analysis".to_string(),
            sample_size: 1,
            tiles: vec![MetricTile {
                id: "avg_exposure".to_string(),
                label: "Avg Card Exposure".to_string(),
                value: 1200.0,
                display: "1,200".to_string(),
            }],
            panels: vec![PanelOutput::NoData {
                id: "panel-1".to_string(),
                title: "Chart 1".to_string(),
                message: "no rows match the panel filters".to_string(),
            }],
            default_commentary: String::new(),
        }
    }

    #[test]
    fn test_commentary_markup_rendered_as_text() {
        let html = render_report(&dashboard(), "<script>alert('x')</script> & more");

        assert!(html.contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt; &amp; more"));
        assert!(!html.contains("<script>alert"));
    }

    #[test]
    fn test_empty_panel_renders_placeholder() {
        let html = render_report(&dashboard(), "notes");
        assert!(html.contains("no rows match the panel filters"));
    }

    #[test]
    fn test_chart_panel_embeds_options_with_live_formatters() {
        let mut report_input = dashboard();
        report_input.panels = vec![PanelOutput::Chart(ChartSpec {
            id: "panel-1".to_string(),
            title: "Chart 1".to_string(),
            caption: None,
            categories: vec!["A".to_string()],
            series: vec![SeriesSpec {
                name: "Card Exposure (UV)".to_string(),
                kind: ChartKind::Bar,
                axis: AxisSide::Primary,
                color: "#4facfe".to_string(),
                is_rate: false,
                values: vec![1200.0],
            }],
            primary_max: None,
            secondary_max: None,
        })];

        let html = render_report(&report_input, "notes");

        assert!(html.contains("setOption("));
        // The formatter must reach the page as a function, not as a quoted
        // string ECharts would treat as template text.
        assert!(html.contains("function(params)"));
        assert!(!html.contains("#*#*#*#"));
        assert!(!html.contains(r#""function"#));
    }

    #[test]
    fn test_filenames_carry_generation_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(report_filename(date), "content_analysis_report_20240309.html");
        assert_eq!(note_filename(date), "analysis_note_20240309.md");
    }

    #[test]
    fn test_embedded_options_cannot_close_the_script_block() {
        assert_eq!(
            escape_script_text(r#"{"t": "</script><script>"}"#),
            r#"{"t": "<\/script><script>"}"#
        );
    }

    #[test]
    fn test_note_wraps_commentary() {
        let note = render_note("observations");
        assert!(note.starts_with("# Content Data Report"));
        assert!(note.contains("observations"));
    }
}
