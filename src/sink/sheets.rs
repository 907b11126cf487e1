//! Google Sheets sink
//!
//! Writes the report through the Sheets `values` API in two calls: clear
//! the configured range, then write the grid from its top-left cell.

use super::types::TableSink;
use crate::auth::{ServiceAccountKey, SPREADSHEETS_SCOPE};
use crate::decode::read_json;
use crate::error::{Error, Result};
use crate::http::{HttpClient, HttpClientConfig, RequestConfig, DEFAULT_TIMEOUT};
use crate::table::Table;
use async_trait::async_trait;
use reqwest::Method;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Public Sheets API endpoint
pub const SHEETS_API_URL: &str = "https://sheets.googleapis.com";

/// Cell values are parsed as if typed into the sheet UI
pub const VALUE_INPUT_OPTION: &str = "USER_ENTERED";

/// Destination of the report inside a spreadsheet
#[derive(Debug, Clone)]
pub struct SheetsSinkConfig {
    /// Spreadsheet identifier from its URL
    pub spreadsheet_id: String,
    /// A1 range cleared before each write, e.g. `full_data!A1:Z`
    pub range: String,
    /// Sheets API base URL
    pub api_url: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl SheetsSinkConfig {
    /// Target `range` of `spreadsheet_id` on the public API
    pub fn new(spreadsheet_id: impl Into<String>, range: impl Into<String>) -> Self {
        Self {
            spreadsheet_id: spreadsheet_id.into(),
            range: range.into(),
            api_url: SHEETS_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Override the API base URL
    #[must_use]
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Set the per-request timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateValuesResponse {
    #[serde(default)]
    updated_range: Option<String>,
    #[serde(default)]
    updated_cells: Option<u64>,
}

/// Sheets sink authenticated with a service account
pub struct SheetsSink {
    client: HttpClient,
    config: SheetsSinkConfig,
}

impl SheetsSink {
    /// Create a sink that signs in as the given service account
    pub fn new(config: SheetsSinkConfig, key: &ServiceAccountKey) -> Result<Self> {
        let http_config = HttpClientConfig::builder().timeout(config.timeout).build();
        let client = HttpClient::with_auth(http_config, key.auth_config(&[SPREADSHEETS_SCOPE]))?;
        Ok(Self { client, config })
    }

    /// Sink configuration
    pub fn config(&self) -> &SheetsSinkConfig {
        &self.config
    }

    /// `.../values/{range}:clear`
    pub fn clear_url(&self) -> Result<Url> {
        self.values_url(&format!("{}:clear", self.config.range))
    }

    /// `.../values/{start}` where `start` is the range's top-left cell
    pub fn update_url(&self) -> Result<Url> {
        self.values_url(&range_start(&self.config.range))
    }

    fn values_url(&self, target: &str) -> Result<Url> {
        let mut url = Url::parse(&self.config.api_url)?;
        url.path_segments_mut()
            .map_err(|()| {
                Error::invalid_value(
                    "sheets_api_url",
                    format!("{} cannot be used as a base URL", self.config.api_url),
                )
            })?
            .pop_if_empty()
            .extend([
                "v4",
                "spreadsheets",
                self.config.spreadsheet_id.as_str(),
                "values",
                target,
            ]);
        Ok(url)
    }

    /// Clear every value in the configured range
    pub async fn clear(&self) -> Result<()> {
        let url = self.clear_url()?;
        debug!(range = %self.config.range, "Clearing sheet range");

        self.client
            .request(Method::POST, url.as_str(), RequestConfig::new().json(json!({})))
            .await
            .map_err(|e| sink_error(&format!("failed to clear {}", self.config.range), e))?;
        Ok(())
    }

    /// Write the table grid starting at the range's top-left cell
    pub async fn write(&self, table: &Table) -> Result<()> {
        let url = self.update_url()?;
        let start = range_start(&self.config.range);
        let body = json!({
            "range": start,
            "majorDimension": "ROWS",
            "values": table.to_grid(),
        });

        let config = RequestConfig::new()
            .query("valueInputOption", VALUE_INPUT_OPTION)
            .json(body);
        let response = self
            .client
            .request(Method::PUT, url.as_str(), config)
            .await
            .map_err(|e| sink_error(&format!("failed to write {start}"), e))?;

        let update: UpdateValuesResponse = read_json(response, "sheets update response")
            .await
            .map_err(|e| sink_error(&format!("failed to write {start}"), e))?;
        debug!(
            updated_range = update.updated_range.as_deref().unwrap_or(""),
            updated_cells = update.updated_cells.unwrap_or(0),
            "Sheet updated"
        );
        Ok(())
    }
}

#[async_trait]
impl TableSink for SheetsSink {
    async fn replace(&self, table: &Table) -> Result<()> {
        self.clear().await?;
        self.write(table).await?;
        info!(
            spreadsheet = %self.config.spreadsheet_id,
            rows = table.len(),
            columns = table.width(),
            "Wrote report to sheet"
        );
        Ok(())
    }

    fn describe(&self) -> String {
        format!(
            "spreadsheet {} range {}",
            self.config.spreadsheet_id, self.config.range
        )
    }
}

impl std::fmt::Debug for SheetsSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SheetsSink")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Top-left cell of an A1 range
///
/// `full_data!A1:Z` -> `full_data!A1`, `B2:D9` -> `B2`. Ranges without a
/// `:` are returned unchanged.
pub fn range_start(range: &str) -> String {
    match range.rsplit_once('!') {
        Some((sheet, cells)) => {
            let first = cells.split(':').next().unwrap_or(cells);
            format!("{sheet}!{first}")
        }
        None => range.split(':').next().unwrap_or(range).to_string(),
    }
}

// Credential failures keep their own kind; everything else is a sink failure.
fn sink_error(action: &str, err: Error) -> Error {
    match err {
        Error::Auth { .. } | Error::Jwt { .. } => err,
        other => Error::sink(format!("{action}: {other}")),
    }
}
