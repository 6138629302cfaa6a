// Source trait for fetching shared-sheet CSV exports
use async_trait::async_trait;
use bytes::Bytes;

/// Fetches the CSV export of a link-shared spreadsheet. The reqwest-backed
/// implementation lives in the infrastructure layer; tests swap in an
/// in-memory fake.
#[async_trait]
pub trait SheetSource: Send + Sync {
    async fn fetch_csv(&self, url: &str) -> anyhow::Result<Bytes>;
}
