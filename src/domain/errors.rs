// Error taxonomy for the ingestion and dashboard pipeline
use thiserror::Error;

/// Failures while resolving a source and building the dataset.
/// Each variant carries the user-facing message; internal detail stays in logs.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("cannot parse the sheet link; expected a '/d/<id>' segment")]
    MalformedLink,

    #[error("could not fetch the sheet; check that link sharing is set to 'anyone with the link can view'")]
    FetchFailed(anyhow::Error),

    #[error("unable to read the spreadsheet: {0}")]
    Unreadable(String),

    #[error("the spreadsheet has no data rows")]
    EmptyTable,

    #[error("missing required columns: {}; detected columns: {}", missing.join(", "), detected.join(", "))]
    SchemaIncomplete {
        missing: Vec<String>,
        detected: Vec<String>,
    },
}

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("no rows pass the current exposure threshold; lower it to see data")]
    NoData,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_incomplete_message_lists_both_sides() {
        let err = IngestError::SchemaIncomplete {
            missing: vec!["title (keyword: title)".to_string()],
            detected: vec!["dt".to_string(), "views".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("title (keyword: title)"));
        assert!(msg.contains("dt, views"));
    }
}
