//! Sheets values API client.

use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, instrument};
use url::Url;

use sheetcol_core::Credential;

use crate::error::SheetsError;

// ============================================================================
// Constants
// ============================================================================

/// Base URL for the Google Sheets API.
const API_BASE_URL: &str = "https://sheets.googleapis.com";

/// Timeout for values requests.
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

// ============================================================================
// API Response Structures
// ============================================================================

/// Response from the values endpoint.
///
/// `values` is absent entirely when the requested range is empty.
#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

// ============================================================================
// Sheets Client
// ============================================================================

/// Client bound to one spreadsheet and one resolved credential.
pub struct SheetsClient {
    http: reqwest::Client,
    base_url: Url,
    spreadsheet: String,
    credential: Credential,
}

impl SheetsClient {
    /// Creates a client for the given spreadsheet, authenticating with the
    /// resolved credential.
    pub fn new(credential: Credential, spreadsheet: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http,
            base_url: Url::parse(API_BASE_URL).expect("API base URL is valid"),
            spreadsheet: spreadsheet.into(),
            credential,
        }
    }

    /// Creates a client against a custom API base URL.
    ///
    /// # Errors
    ///
    /// [`SheetsError::InvalidUrl`] when `base_url` does not parse.
    pub fn with_base_url(
        credential: Credential,
        spreadsheet: impl Into<String>,
        base_url: &str,
    ) -> Result<Self, SheetsError> {
        let mut client = Self::new(credential, spreadsheet);
        client.base_url = Url::parse(base_url)?;
        Ok(client)
    }

    /// Retrieves one column of one sheet, rendered to strings.
    ///
    /// The column must be specified as a single letter; it is uppercased
    /// into an `{sheet}!{C}:{C}` range. Empty trailing cells are omitted by
    /// the API, and rows with an empty leading cell are skipped.
    ///
    /// # Errors
    ///
    /// [`SheetsError::InvalidColumn`] for a malformed column reference,
    /// [`SheetsError::Api`] when the API rejects the request (a 401 means
    /// the credential went stale), [`SheetsError::Http`] /
    /// [`SheetsError::InvalidResponse`] for transport and decode failures.
    #[instrument(skip(self))]
    pub async fn get_column(
        &self,
        sheet: &str,
        column: &str,
    ) -> Result<Vec<String>, SheetsError> {
        let column = validate_column(column)?;
        let range = format!("{sheet}!{column}:{column}");

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .expect("API base URL is a valid base")
            .extend(["v4", "spreadsheets", &self.spreadsheet, "values", &range]);

        debug!(%url, "Fetching column values");

        let response = self
            .http
            .get(url)
            .bearer_auth(&self.credential.access_token)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(SheetsError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let value_range: ValueRange = serde_json::from_str(&body)?;
        let values = column_values(value_range);

        debug!(count = values.len(), "Column fetched");
        Ok(values)
    }
}

/// Checks that a column reference is exactly one ASCII letter and
/// uppercases it.
fn validate_column(column: &str) -> Result<char, SheetsError> {
    let mut chars = column.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphabetic() => Ok(c.to_ascii_uppercase()),
        _ => Err(SheetsError::InvalidColumn(column.to_string())),
    }
}

/// Flattens a single-column value range into strings, skipping rows whose
/// leading cell is absent.
fn column_values(range: ValueRange) -> Vec<String> {
    range
        .values
        .into_iter()
        .filter_map(|row| row.into_iter().next())
        .map(render_cell)
        .collect()
}

/// Renders one cell: strings verbatim, other JSON values via their
/// canonical text form.
fn render_cell(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    }
}

// ============================================================================
// Tests
// ============================================================================
