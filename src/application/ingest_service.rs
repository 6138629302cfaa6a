// Ingest service - Use case for resolving a source into the typed dataset
use crate::application::sheet_source::SheetSource;
use crate::domain::coerce::build_dataset;
use crate::domain::errors::IngestError;
use crate::domain::record::Dataset;
use crate::domain::schema::normalize_columns;
use crate::domain::table::RawTable;
use crate::infrastructure::sheet_link::SheetLink;
use crate::infrastructure::tabular::{read_csv, read_workbook};
use std::sync::Arc;

#[derive(Clone)]
pub struct IngestService {
    source: Arc<dyn SheetSource>,
    sheets_host: String,
}

impl IngestService {
    pub fn new(source: Arc<dyn SheetSource>, sheets_host: String) -> Self {
        Self {
            source,
            sheets_host,
        }
    }

    /// Upload path: first worksheet of an xlsx/xls workbook.
    pub fn dataset_from_upload(&self, bytes: &[u8]) -> Result<Dataset, IngestError> {
        let table = read_workbook(bytes)?;
        self.finish(table)
    }

    /// URL path: parse the share link, build the CSV export URL, fetch it.
    pub async fn dataset_from_url(&self, url: &str) -> Result<Dataset, IngestError> {
        let link = SheetLink::parse(url)?;
        let export_url = link.export_url(&self.sheets_host);
        tracing::debug!(document_id = %link.document_id, "fetching sheet export");

        let bytes = self
            .source
            .fetch_csv(&export_url)
            .await
            .map_err(IngestError::FetchFailed)?;
        let table = read_csv(&bytes)?;
        self.finish(table)
    }

    fn finish(&self, mut table: RawTable) -> Result<Dataset, IngestError> {
        if table.is_empty() {
            return Err(IngestError::EmptyTable);
        }
        normalize_columns(&mut table)?;
        let dataset = build_dataset(&table)?;
        tracing::debug!(
            rows = dataset.len(),
            extra_columns = dataset.extras.len(),
            "dataset ready"
        );
        Ok(dataset)
    }
}
