// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod echarts;
pub mod html_report;
pub mod sheet_link;
pub mod sheets_fetcher;
pub mod tabular;
