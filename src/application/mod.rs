// Application layer - Use case services
pub mod dashboard_service;
pub mod ingest_service;
pub mod sheet_source;
