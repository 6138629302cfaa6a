// Application state for HTTP handlers
use crate::application::dashboard_service::DashboardService;
use crate::application::ingest_service::IngestService;

#[derive(Clone)]
pub struct AppState {
    pub ingest_service: IngestService,
    pub dashboard_service: DashboardService,
}
