// Reqwest-backed sheet source
use crate::application::sheet_source::SheetSource;
use anyhow::Context;
use async_trait::async_trait;
use bytes::Bytes;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpSheetSource {
    client: reqwest::Client,
}

impl HttpSheetSource {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build the HTTP client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl SheetSource for HttpSheetSource {
    async fn fetch_csv(&self, url: &str) -> anyhow::Result<Bytes> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("request to the sheet export endpoint failed")?;

        if !response.status().is_success() {
            anyhow::bail!("sheet export returned status {}", response.status());
        }

        response
            .bytes()
            .await
            .context("failed to read the sheet export body")
    }
}
