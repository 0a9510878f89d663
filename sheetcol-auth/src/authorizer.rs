//! Interactive authorization-code flow.
//!
//! Obtains a fresh credential when none is cached or the cached one is
//! unusable. The flow is inherently human-in-the-loop:
//!
//! 1. Build the authorization URL and print it, attempting a best-effort
//!    browser launch (launch failure is never an error - the URL is always
//!    printed so the user can open it manually)
//! 2. Block until the user types the authorization code back in
//! 3. Exchange the code for a credential at the provider's token endpoint
//!
//! There is no timeout on the human wait; a caller needing bounded latency
//! wraps the invocation externally. The read itself sits behind
//! [`CodePrompt`], which is the seam for injecting a non-blocking or
//! cancellable implementation.

use std::future::Future;
use std::io::Write as _;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{debug, instrument};
use url::Url;

use sheetcol_core::{Credential, ProviderConfig};

use crate::error::AuthError;

// ============================================================================
// Constants
// ============================================================================

/// Anti-replay state token embedded in the authorization URL. Fixed, since
/// the manual copy-paste flow never sees the redirect back.
const STATE_TOKEN: &str = "state-token";

/// Timeout for token endpoint requests.
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

// ============================================================================
// Authorize Trait
// ============================================================================

/// Anything that can produce a fresh [`Credential`] from a
/// [`ProviderConfig`].
///
/// [`CredentialResolver`] is generic over this so tests can drive the
/// resolver with a scripted authorizer instead of a human.
///
/// [`CredentialResolver`]: crate::CredentialResolver
pub trait Authorize: Send + Sync {
    /// Obtains a fresh credential. Errors are always fatal to the current
    /// resolution attempt - there is no retry loop.
    fn obtain(
        &self,
        config: &ProviderConfig,
    ) -> impl Future<Output = Result<Credential, AuthError>> + Send;
}

// ============================================================================
// Code Prompt
// ============================================================================

/// Reads one authorization code from an interactive channel.
///
/// The default implementation blocks on stdin. The trait exists so the
/// blocking read is replaceable - by a test double, or by an implementation
/// with a deadline.
pub trait CodePrompt: Send + Sync {
    /// Reads a single whitespace-delimited authorization code.
    ///
    /// # Errors
    ///
    /// Any I/O failure, including end-of-input before a code was typed.
    fn read_code(&self) -> std::io::Result<String>;
}

/// Blocking stdin prompt, the interactive default.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdinPrompt;

impl CodePrompt for StdinPrompt {
    fn read_code(&self) -> std::io::Result<String> {
        read_token(&mut std::io::stdin().lock())
    }
}

/// Reads the next whitespace-delimited token, skipping blank lines.
///
/// An accidental Enter must not abort the flow (the one-time code would be
/// burned), so empty lines keep the prompt waiting; only true end-of-input
/// is an error.
fn read_token(input: &mut impl std::io::BufRead) -> std::io::Result<String> {
    loop {
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Err(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "no authorization code entered",
            ));
        }

        if let Some(code) = line.split_whitespace().next() {
            return Ok(code.to_string());
        }
    }
}

// ============================================================================
// Interactive Authorizer
// ============================================================================

/// Human-in-the-loop authorization-code flow.
pub struct InteractiveAuthorizer {
    http: reqwest::Client,
    prompt: Arc<dyn CodePrompt>,
}

impl InteractiveAuthorizer {
    /// Creates an authorizer that prompts on stdin.
    pub fn new() -> Self {
        Self::with_prompt(Arc::new(StdinPrompt))
    }

    /// Creates an authorizer with a custom code prompt.
    pub fn with_prompt(prompt: Arc<dyn CodePrompt>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .expect("Failed to build HTTP client");

        Self { http, prompt }
    }

    /// Builds the authorization URL the user must visit.
    ///
    /// # Errors
    ///
    /// [`AuthError::InvalidUrl`] when the configured authorization endpoint
    /// does not parse.
    pub fn authorization_url(&self, config: &ProviderConfig) -> Result<Url, AuthError> {
        let mut url = Url::parse(&config.auth_url)?;
        url.query_pairs_mut()
            .append_pair("client_id", &config.client_id)
            .append_pair("redirect_uri", &config.redirect_uri)
            .append_pair("response_type", "code")
            .append_pair("scope", &config.scopes.join(" "))
            .append_pair("state", STATE_TOKEN)
            .append_pair("access_type", "offline");
        Ok(url)
    }

    /// Exchanges an authorization code for a credential at the token
    /// endpoint.
    #[instrument(skip(self, config, code))]
    async fn exchange(
        &self,
        config: &ProviderConfig,
        code: &str,
    ) -> Result<Credential, AuthError> {
        debug!(endpoint = %config.token_url, "Exchanging authorization code");

        let response = self
            .http
            .post(&config.token_url)
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("client_id", &config.client_id),
                ("client_secret", &config.client_secret),
                ("redirect_uri", &config.redirect_uri),
            ])
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        parse_token_response(status, &body, Utc::now())
    }
}

impl Default for InteractiveAuthorizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Authorize for InteractiveAuthorizer {
    #[instrument(skip(self, config))]
    async fn obtain(&self, config: &ProviderConfig) -> Result<Credential, AuthError> {
        let auth_url = self.authorization_url(config)?;

        println!("Authorization link:\n{auth_url}\n");

        // Convenience only; the URL is already printed for manual use.
        if let Err(e) = open::that(auth_url.as_str()) {
            debug!(error = %e, "Could not launch a browser");
        }

        print!("Type the authorization code: ");
        let _ = std::io::stdout().flush();

        let prompt = Arc::clone(&self.prompt);
        let code = tokio::task::spawn_blocking(move || prompt.read_code())
            .await
            .map_err(|e| AuthError::UserInput(std::io::Error::other(e)))?
            .map_err(AuthError::UserInput)?;

        self.exchange(config, &code).await
    }
}

// ============================================================================
// Token Endpoint Response
// ============================================================================

/// Success payload from the token endpoint.
#[derive(Debug, Deserialize)]
struct TokenEndpointResponse {
    access_token: String,
    #[serde(default)]
    token_type: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
    /// Lifetime in seconds, converted to an absolute expiry.
    #[serde(default)]
    expires_in: Option<i64>,
}

/// Error payload from the token endpoint (RFC 6749 §5.2).
#[derive(Debug, Deserialize)]
struct OAuthErrorBody {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

/// Maps a token endpoint response to a [`Credential`] or an exchange error.
fn parse_token_response(
    status: u16,
    body: &str,
    now: DateTime<Utc>,
) -> Result<Credential, AuthError> {
    if !(200..300).contains(&status) {
        // Surface the OAuth error code when the body carries one.
        let detail = match serde_json::from_str::<OAuthErrorBody>(body) {
            Ok(oauth_error) => match oauth_error.error_description {
                Some(description) => format!("{} - {description}", oauth_error.error),
                None => oauth_error.error,
            },
            Err(_) => body.to_string(),
        };
        return Err(AuthError::Exchange { status, detail });
    }

    let token: TokenEndpointResponse = serde_json::from_str(body).map_err(|e| {
        AuthError::Exchange {
            status,
            detail: format!("unparseable token response: {e}"),
        }
    })?;

    Ok(Credential {
        access_token: token.access_token,
        token_type: token.token_type.unwrap_or_else(|| "Bearer".to_string()),
        refresh_token: token.refresh_token,
        expiry: token.expires_in.map(|secs| now + chrono::Duration::seconds(secs)),
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_config() -> ProviderConfig {
        ProviderConfig {
            client_id: "client-id".to_string(),
            client_secret: "client-secret".to_string(),
            scopes: vec![
                "https://www.googleapis.com/auth/spreadsheets.readonly".to_string(),
            ],
            redirect_uri: "urn:ietf:wg:oauth:2.0:oob".to_string(),
            auth_url: "https://accounts.google.com/o/oauth2/auth".to_string(),
            token_url: "https://oauth2.googleapis.com/token".to_string(),
        }
    }

    #[test]
    fn authorization_url_embeds_the_flow_parameters() {
        let authorizer = InteractiveAuthorizer::new();
        let url = authorizer.authorization_url(&sample_config()).unwrap();

        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        assert!(pairs.contains(&("client_id".to_string(), "client-id".to_string())));
        assert!(pairs.contains(&("response_type".to_string(), "code".to_string())));
        assert!(pairs.contains(&("state".to_string(), STATE_TOKEN.to_string())));
        assert!(pairs.contains(&("access_type".to_string(), "offline".to_string())));
        assert!(pairs.contains(&(
            "scope".to_string(),
            "https://www.googleapis.com/auth/spreadsheets.readonly".to_string()
        )));
    }

    #[test]
    fn authorization_url_space_joins_multiple_scopes() {
        let mut config = sample_config();
        config.scopes = vec!["a".to_string(), "b".to_string()];

        let authorizer = InteractiveAuthorizer::new();
        let url = authorizer.authorization_url(&config).unwrap();

        let scope = url
            .query_pairs()
            .find(|(k, _)| k == "scope")
            .map(|(_, v)| v.into_owned())
            .unwrap();
        assert_eq!(scope, "a b");
    }

    #[test]
    fn authorization_url_rejects_a_bad_endpoint() {
        let mut config = sample_config();
        config.auth_url = "not a url".to_string();

        let authorizer = InteractiveAuthorizer::new();
        assert!(matches!(
            authorizer.authorization_url(&config),
            Err(AuthError::InvalidUrl(_))
        ));
    }

    #[test]
    fn blank_lines_keep_the_prompt_waiting() {
        let mut input = std::io::Cursor::new("\n\n  \n4/0Acode\n");
        assert_eq!(read_token(&mut input).unwrap(), "4/0Acode");
    }

    #[test]
    fn code_is_taken_up_to_the_first_whitespace() {
        let mut input = std::io::Cursor::new("  4/0Acode trailing\n");
        assert_eq!(read_token(&mut input).unwrap(), "4/0Acode");
    }

    #[test]
    fn end_of_input_without_a_code_is_an_error() {
        let mut input = std::io::Cursor::new("\n\n");
        let err = read_token(&mut input).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn parses_a_full_token_response() {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let body = r#"{
            "access_token": "ya29.token",
            "token_type": "Bearer",
            "refresh_token": "1//refresh",
            "expires_in": 3600
        }"#;

        let credential = parse_token_response(200, body, now).unwrap();
        assert_eq!(credential.access_token, "ya29.token");
        assert_eq!(credential.token_type, "Bearer");
        assert_eq!(credential.refresh_token, Some("1//refresh".to_string()));
        assert_eq!(
            credential.expiry,
            Some(Utc.with_ymd_and_hms(2025, 1, 1, 1, 0, 0).unwrap())
        );
    }

    #[test]
    fn missing_expires_in_means_no_expiry() {
        let body = r#"{"access_token": "abc", "token_type": "Bearer"}"#;

        let credential = parse_token_response(200, body, Utc::now()).unwrap();
        assert_eq!(credential.expiry, None);
        assert_eq!(credential.refresh_token, None);
    }

    #[test]
    fn rejected_code_surfaces_the_oauth_error() {
        let body = r#"{"error": "invalid_grant", "error_description": "Bad Request"}"#;

        let err = parse_token_response(400, body, Utc::now()).unwrap_err();
        match err {
            AuthError::Exchange { status, detail } => {
                assert_eq!(status, 400);
                assert!(detail.contains("invalid_grant"));
                assert!(detail.contains("Bad Request"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn non_json_error_body_is_kept_verbatim() {
        let err = parse_token_response(502, "Bad Gateway", Utc::now()).unwrap_err();
        match err {
            AuthError::Exchange { status, detail } => {
                assert_eq!(status, 502);
                assert_eq!(detail, "Bad Gateway");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unparseable_success_body_is_an_exchange_error() {
        let err = parse_token_response(200, "<html>", Utc::now()).unwrap_err();
        assert!(matches!(err, AuthError::Exchange { status: 200, .. }));
    }
}
