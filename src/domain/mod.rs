// Domain layer - Core data model and pure pipeline logic
pub mod chart;
pub mod coerce;
pub mod dashboard;
pub mod errors;
pub mod panel;
pub mod record;
pub mod schema;
pub mod table;
