//! Price list fetched from a Google Sheets CSV export.
//!
//! The first row is the header; each following row becomes one
//! [`PriceRecord`] keyed by header name, in column order.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;

use crate::common::DatasetFetcher;
use crate::domains::sales::models::PriceRecord;

/// Fetches the price sheet over HTTP. Implements [`DatasetFetcher`] so it can
/// sit behind a `TimedFallbackCache`.
#[derive(Clone)]
pub struct GoogleSheetPriceSource {
    http_client: reqwest::Client,
    export_url: String,
}

impl GoogleSheetPriceSource {
    /// Source for a sheet id and optional tab id (`gid`).
    pub fn new(sheet_id: &str, gid: Option<&str>, timeout: Duration) -> Result<Self> {
        Self::with_export_url(Self::export_url(sheet_id, gid), timeout)
    }

    /// Source for an explicit CSV URL.
    pub fn with_export_url(export_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client for price sheet")?;
        Ok(Self {
            http_client,
            export_url: export_url.into(),
        })
    }

    pub fn export_url(sheet_id: &str, gid: Option<&str>) -> String {
        let mut url = format!(
            "https://docs.google.com/spreadsheets/d/{}/export?format=csv",
            sheet_id
        );
        if let Some(gid) = gid {
            url.push_str("&gid=");
            url.push_str(gid);
        }
        url
    }
}

#[async_trait]
impl DatasetFetcher<PriceRecord> for GoogleSheetPriceSource {
    async fn fetch(&self) -> Result<Vec<PriceRecord>> {
        let body = self
            .http_client
            .get(&self.export_url)
            .send()
            .await
            .context("Price sheet request failed")?
            .error_for_status()
            .context("Price sheet returned an error status")?
            .text()
            .await
            .context("Failed to read price sheet body")?;

        let records = parse_price_csv(&body)?;
        tracing::info!(records = records.len(), "Price sheet fetched");
        Ok(records)
    }
}

/// Parse CSV text with a header row into records.
///
/// Blank rows are skipped, cells are trimmed, columns with an empty header
/// are dropped, and short rows simply lack the trailing columns.
pub fn parse_price_csv(text: &str) -> Result<Vec<PriceRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .context("Price sheet has no header row")?
        .clone();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.context("Malformed row in price sheet")?;
        if row.iter().all(str::is_empty) {
            continue;
        }
        let record: PriceRecord = headers
            .iter()
            .zip(row.iter())
            .filter(|(column, _)| !column.is_empty())
            .map(|(column, value)| (column.to_string(), value.to_string()))
            .collect();
        records.push(record);
    }
    Ok(records)
}
