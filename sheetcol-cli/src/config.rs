//! Client-credentials document loader.
//!
//! Reads the OAuth2 client document downloaded from the Google Cloud
//! console (`client_credentials.json` by default) and turns it into the
//! [`ProviderConfig`] consumed by the credential resolver. Both the
//! `installed` and `web` wrappers are accepted; endpoints and the redirect
//! default to Google's when the document omits them.

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use sheetcol_core::ProviderConfig;

// ============================================================================
// Constants
// ============================================================================

/// Default location of the client-credentials document.
pub const DEFAULT_CREDENTIALS_PATH: &str = "client_credentials.json";

/// The only scope this tool requests.
///
/// NOTE: if this scope changes, the previously cached credential must be
/// deleted so a new one is created.
pub const SPREADSHEETS_READONLY_SCOPE: &str =
    "https://www.googleapis.com/auth/spreadsheets.readonly";

/// Google's authorization endpoint, used when the document omits one.
const DEFAULT_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/auth";

/// Google's token endpoint, used when the document omits one.
const DEFAULT_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Out-of-band redirect for the manual copy-paste flow.
const OOB_REDIRECT_URI: &str = "urn:ietf:wg:oauth:2.0:oob";

// ============================================================================
// Document Structures
// ============================================================================

/// Top-level client-credentials document.
#[derive(Debug, Deserialize)]
struct CredentialsDocument {
    installed: Option<ClientSecret>,
    web: Option<ClientSecret>,
}

/// The client secret block inside either wrapper.
#[derive(Debug, Deserialize)]
struct ClientSecret {
    client_id: String,
    client_secret: String,
    #[serde(default)]
    auth_uri: Option<String>,
    #[serde(default)]
    token_uri: Option<String>,
    #[serde(default)]
    redirect_uris: Option<Vec<String>>,
}

// ============================================================================
// Loader
// ============================================================================

/// Loads a [`ProviderConfig`] with the readonly spreadsheets scope from a
/// client-credentials document.
pub fn load_provider_config(path: &Path) -> Result<ProviderConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("unable to read client credentials at {}", path.display()))?;

    parse_provider_config(&content)
        .with_context(|| format!("unable to parse client credentials at {}", path.display()))
}

fn parse_provider_config(content: &str) -> Result<ProviderConfig> {
    let document: CredentialsDocument = serde_json::from_str(content)?;

    let Some(secret) = document.installed.or(document.web) else {
        bail!("expected an \"installed\" or \"web\" client section");
    };

    let redirect_uri = secret
        .redirect_uris
        .unwrap_or_default()
        .into_iter()
        .next()
        .unwrap_or_else(|| OOB_REDIRECT_URI.to_string());

    Ok(ProviderConfig {
        client_id: secret.client_id,
        client_secret: secret.client_secret,
        scopes: vec![SPREADSHEETS_READONLY_SCOPE.to_string()],
        redirect_uri,
        auth_url: secret
            .auth_uri
            .unwrap_or_else(|| DEFAULT_AUTH_URL.to_string()),
        token_url: secret
            .token_uri
            .unwrap_or_else(|| DEFAULT_TOKEN_URL.to_string()),
    })
}

// ============================================================================
// Tests
// ============================================================================
