// Shared-sheet link parsing and CSV export URL construction
use crate::domain::errors::IngestError;
use regex::Regex;
use std::sync::LazyLock;

// Document ids are long alphanumeric tokens; the length floor keeps short
// `/d/` path segments from other URLs from matching.
static DOC_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/d/([A-Za-z0-9_-]{10,})").expect("valid regex"));
static GID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[#?&]gid=(\d+)").expect("valid regex"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetLink {
    pub document_id: String,
    /// Worksheet id; `None` lets the host default to the first sheet.
    pub gid: Option<String>,
}

impl SheetLink {
    pub fn parse(url: &str) -> Result<Self, IngestError> {
        let document_id = DOC_ID
            .captures(url)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
            .ok_or(IngestError::MalformedLink)?;
        let gid = GID
            .captures(url)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string());
        Ok(Self { document_id, gid })
    }

    pub fn export_url(&self, host: &str) -> String {
        let base = format!(
            "{}/spreadsheets/d/{}/export?format=csv",
            host.trim_end_matches('/'),
            self.document_id
        );
        match &self.gid {
            Some(gid) => format!("{base}&gid={gid}"),
            None => base,
        }
    }
}
