//! Google Sheets title lookup.

use async_trait::async_trait;
use reqwest::{Client, Url};
use ritra_core::SheetsConfig;
use ritra_error::{RitraResult, ServiceError, ServiceErrorKind};
use ritra_interface::TitleResolver;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument, warn};

#[derive(Debug, Default, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

/// Reads column A of one row through the Sheets v4 values API.
///
/// The seed reference is a 1-based row number; without one the configured
/// default row is read. An empty row or blank cell is "not found".
#[derive(Debug, Clone)]
pub struct SheetsTitleResolver {
    client: Client,
    base_url: String,
    spreadsheet_id: String,
    sheet: String,
    default_row: u32,
    api_key: Option<String>,
    timeout: Duration,
}

impl SheetsTitleResolver {
    /// Create a resolver for one spreadsheet tab.
    pub fn new(
        base_url: impl Into<String>,
        spreadsheet_id: impl Into<String>,
        sheet: impl Into<String>,
        default_row: u32,
        api_key: Option<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            spreadsheet_id: spreadsheet_id.into(),
            sheet: sheet.into(),
            default_row,
            api_key,
            timeout: Duration::from_secs(15),
        }
    }

    /// Bound each lookup request by `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build from configuration, reading the API key from `api_key_env` if set.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if no spreadsheet id is configured.
    pub fn from_config(config: &SheetsConfig) -> RitraResult<Self> {
        let spreadsheet_id = config.spreadsheet_id.clone().ok_or_else(|| {
            ServiceError::new(ServiceErrorKind::Configuration(
                "sheets.spreadsheet_id is not set".to_string(),
            ))
        })?;
        let api_key = std::env::var(&config.api_key_env).ok();
        if api_key.is_none() {
            warn!(env = %config.api_key_env, "No Sheets API key set");
        }
        Ok(Self::new(
            &config.base_url,
            spreadsheet_id,
            &config.sheet,
            config.default_row,
            api_key,
        )
        .with_timeout(Duration::from_millis(config.timeout_ms)))
    }

    fn row(&self, reference: Option<&str>) -> RitraResult<u32> {
        let Some(reference) = reference.map(str::trim).filter(|r| !r.is_empty()) else {
            return Ok(self.default_row);
        };
        reference
            .parse::<u32>()
            .ok()
            .filter(|row| *row >= 1)
            .ok_or_else(|| {
                ServiceError::new(ServiceErrorKind::InvalidReference(format!(
                    "expected a row number, got '{}'",
                    reference
                )))
                .into()
            })
    }

    fn values_url(&self, row: u32) -> RitraResult<Url> {
        let invalid = |detail: String| {
            ServiceError::new(ServiceErrorKind::Configuration(format!(
                "invalid sheets base url '{}': {}",
                self.base_url, detail
            )))
        };
        let mut url = Url::parse(&self.base_url).map_err(|e| invalid(e.to_string()))?;
        let range = format!("{}!A{}:A{}", self.sheet, row, row);
        url.path_segments_mut()
            .map_err(|_| invalid("cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(["spreadsheets", self.spreadsheet_id.as_str(), "values", range.as_str()]);
        if let Some(key) = &self.api_key {
            url.query_pairs_mut().append_pair("key", key);
        }
        Ok(url)
    }
}

#[async_trait]
impl TitleResolver for SheetsTitleResolver {
    #[instrument(skip(self), fields(sheet = %self.sheet))]
    async fn lookup(&self, reference: Option<&str>) -> RitraResult<Option<String>> {
        let row = self.row(reference)?;
        let url = self.values_url(row)?;
        debug!(row, "Reading title cell");

        let response = self.client.get(url).timeout(self.timeout).send().await.map_err(|e| {
            ServiceError::new(ServiceErrorKind::Http(format!("Sheets request failed: {}", e)))
        })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ServiceError::new(ServiceErrorKind::Status {
                status_code: status.as_u16(),
                message,
            })
            .into());
        }

        let range: ValueRange = response.json().await.map_err(|e| {
            ServiceError::new(ServiceErrorKind::Deserialization(e.to_string()))
        })?;

        Ok(range
            .values
            .into_iter()
            .next()
            .and_then(|row| row.into_iter().next())
            .map(|cell| cell.trim().to_string())
            .filter(|cell| !cell.is_empty()))
    }

    fn name(&self) -> &str {
        "sheets"
    }
}
