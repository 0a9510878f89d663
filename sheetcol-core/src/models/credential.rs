//! The bearer credential and its serialized form.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An OAuth2 bearer credential.
///
/// This is both the in-memory value handed to the API client and the exact
/// on-disk cache record: the field names match the standard OAuth2 token
/// representation, so the cache file stays decodable by any standard OAuth2
/// client library.
///
/// # Cache Format
///
/// ```json
/// {
///   "access_token": "ya29.a0...",
///   "token_type": "Bearer",
///   "refresh_token": "1//0g...",
///   "expiry": "2025-06-01T12:00:00Z"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    /// The bearer token sent with API requests.
    pub access_token: String,

    /// Token type, normally `Bearer`.
    #[serde(default = "default_token_type")]
    pub token_type: String,

    /// Refresh token, when the authorization server issued one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    /// Expiry timestamp. `None` means non-expiring or unknown; no component
    /// of this tool inspects it proactively - a stale credential surfaces as
    /// a rejected API request and the operator re-runs `auth`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<DateTime<Utc>>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}
