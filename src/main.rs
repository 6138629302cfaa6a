// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::{Router, routing::get, routing::post};
use tower_http::trace::TraceLayer;

use crate::application::dashboard_service::DashboardService;
use crate::application::ingest_service::IngestService;
use crate::infrastructure::config::{load_dashboard_config, load_server_config};
use crate::infrastructure::sheets_fetcher::HttpSheetSource;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{export_note, export_report, health_check, render_dashboard};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration
    let server_config = load_server_config()?;
    let dashboard_config = load_dashboard_config()?;

    // Create the sheet fetcher (infrastructure layer)
    let fetcher = Arc::new(HttpSheetSource::new(Duration::from_secs(
        server_config.server.fetch_timeout_secs,
    ))?);

    // Create services (application layer)
    let ingest_service = IngestService::new(fetcher, server_config.server.sheets_host.clone());
    let dashboard_service = DashboardService::new(dashboard_config);

    // Create application state
    let state = Arc::new(AppState {
        ingest_service,
        dashboard_service,
    });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/dashboard", post(render_dashboard))
        .route("/report", post(export_report))
        .route("/note", post(export_note))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr =
        format!("{}:{}", server_config.server.host, server_config.server.port).parse()?;
    println!("Starting content-analytics service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
