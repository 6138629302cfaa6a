// HTTP request handlers
use crate::domain::dashboard::{Dashboard, MetricTile, PanelOutput};
use crate::domain::errors::{DashboardError, IngestError};
use crate::domain::panel::DashboardRequest;
use crate::domain::record::Dataset;
use crate::infrastructure::echarts;
use crate::infrastructure::html_report::{
    attachment_response, note_filename, render_note, render_report, report_filename,
};
use crate::presentation::app_state::AppState;
use axum::{
    Json,
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::sync::Arc;

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum PanelView {
    Chart {
        id: String,
        title: String,
        caption: Option<String>,
        /// ECharts option as a JavaScript object literal. Label formatters
        /// are functions, so the client evaluates this in script context
        /// before `setOption`; it is not `JSON.parse` material.
        options: String,
    },
    NoData {
        id: String,
        title: String,
        message: String,
    },
}

#[derive(Serialize)]
struct DashboardView {
    title: String,
    sample_size: usize,
    tiles: Vec<MetricTile>,
    panels: Vec<PanelView>,
    default_commentary: String,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Builds and returns the dashboard for an uploaded workbook or a sheet link.
pub async fn render_dashboard(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Response {
    let (dataset, request) = match resolve_dataset(&state, multipart).await {
        Ok(resolved) => resolved,
        Err(response) => return response,
    };

    match state.dashboard_service.build_dashboard(&dataset, &request) {
        Ok(dashboard) => Json(dashboard_view(&dashboard)).into_response(),
        Err(err) => dashboard_error_response(err),
    }
}

/// Renders the full HTML report as a one-shot download.
pub async fn export_report(State(state): State<Arc<AppState>>, multipart: Multipart) -> Response {
    let (dataset, request) = match resolve_dataset(&state, multipart).await {
        Ok(resolved) => resolved,
        Err(response) => return response,
    };

    let dashboard = match state.dashboard_service.build_dashboard(&dataset, &request) {
        Ok(dashboard) => dashboard,
        Err(err) => return dashboard_error_response(err),
    };

    let commentary = request
        .commentary
        .clone()
        .unwrap_or_else(|| dashboard.default_commentary.clone());

    let html = render_report(&dashboard, &commentary);
    let filename = report_filename(chrono::Local::now().date_naive());
    attachment_response(html, "text/html; charset=utf-8", &filename)
        .unwrap_or_else(|status| status.into_response())
}

/// Commentary-only Markdown export; no data source required.
pub async fn export_note(mut multipart: Multipart) -> Response {
    let mut request = DashboardRequest::default();
    loop {
        match multipart.next_field().await {
            Ok(Some(field)) => {
                if field.name() == Some("config") {
                    match read_config(field).await {
                        Ok(parsed) => request = parsed,
                        Err(response) => return response,
                    }
                }
            }
            Ok(None) => break,
            Err(err) => return bad_multipart(err),
        }
    }

    let note = render_note(request.commentary.as_deref().unwrap_or_default());
    let filename = note_filename(chrono::Local::now().date_naive());
    attachment_response(note, "text/markdown; charset=utf-8", &filename)
        .unwrap_or_else(|status| status.into_response())
}

/// Reads the multipart request: a `config` JSON part plus either a `file`
/// workbook part or a sheet link inside the config.
async fn resolve_dataset(
    state: &Arc<AppState>,
    mut multipart: Multipart,
) -> Result<(Dataset, DashboardRequest), Response> {
    let mut request = DashboardRequest::default();
    let mut upload: Option<bytes::Bytes> = None;

    loop {
        match multipart.next_field().await {
            Ok(Some(field)) => match field.name() {
                Some("config") => request = read_config(field).await?,
                Some("file") => match field.bytes().await {
                    Ok(bytes) => upload = Some(bytes),
                    Err(err) => return Err(bad_multipart(err)),
                },
                _ => {}
            },
            Ok(None) => break,
            Err(err) => return Err(bad_multipart(err)),
        }
    }

    let dataset = if let Some(bytes) = upload {
        state.ingest_service.dataset_from_upload(&bytes)
    } else if let Some(url) = request.sheet_url.as_deref() {
        state.ingest_service.dataset_from_url(url).await
    } else {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorBody {
                error: "provide an uploaded workbook or a sheet link".to_string(),
            }),
        )
            .into_response());
    };

    dataset
        .map(|dataset| (dataset, request))
        .map_err(ingest_error_response)
}

async fn read_config(field: axum::extract::multipart::Field<'_>) -> Result<DashboardRequest, Response> {
    let text = field.text().await.map_err(bad_multipart)?;
    serde_json::from_str(&text).map_err(|err| {
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorBody {
                error: format!("invalid dashboard configuration: {err}"),
            }),
        )
            .into_response()
    })
}

fn bad_multipart(err: axum::extract::multipart::MultipartError) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorBody {
            error: format!("invalid multipart request: {err}"),
        }),
    )
        .into_response()
}

fn ingest_error_response(err: IngestError) -> Response {
    // Fetch failures keep their transport detail in the logs only.
    if let IngestError::FetchFailed(source) = &err {
        tracing::error!("sheet fetch failed: {source:#}");
    }
    let status = match &err {
        IngestError::FetchFailed(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::UNPROCESSABLE_ENTITY,
    };
    (status, Json(ErrorBody { error: err.to_string() })).into_response()
}

fn dashboard_error_response(err: DashboardError) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ErrorBody { error: err.to_string() }),
    )
        .into_response()
}

fn dashboard_view(dashboard: &Dashboard) -> DashboardView {
    let panels = dashboard
        .panels
        .iter()
        .map(|panel| match panel {
            PanelOutput::Chart(spec) => PanelView::Chart {
                id: spec.id.clone(),
                title: spec.title.clone(),
                caption: spec.caption.clone(),
                options: echarts::chart_options(spec),
            },
            PanelOutput::NoData { id, title, message } => PanelView::NoData {
                id: id.clone(),
                title: title.clone(),
                message: message.clone(),
            },
        })
        .collect();

    DashboardView {
        title: dashboard.title.clone(),
        sample_size: dashboard.sample_size,
        tiles: dashboard.tiles.clone(),
        panels,
        default_commentary: dashboard.default_commentary.clone(),
    }
}
