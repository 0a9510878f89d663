//! Sheets client error types.

use thiserror::Error;

/// Error type for Sheets API operations.
#[derive(Debug, Error)]
pub enum SheetsError {
    /// The column reference was not a single letter.
    #[error("Invalid column '{0}', expected a single letter")]
    InvalidColumn(String),

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status. A 401 here usually
    /// means the cached credential went stale; `sheetcol auth` refreshes it.
    #[error("Sheets API error: HTTP {status}: {body}")]
    Api {
        /// HTTP status returned by the API.
        status: u16,
        /// Response body, for the one-line diagnostic.
        body: String,
    },

    /// The API answered 200 with a body that does not decode.
    #[error("Invalid response from Sheets API: {0}")]
    InvalidResponse(#[from] serde_json::Error),

    /// The base URL did not parse.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}
