//! Auth error types.

use thiserror::Error;

/// Error type for credential resolution.
///
/// The variants map onto the distinct failure classes of the flow; which of
/// them are fatal depends on the entry point. [`CredentialResolver::resolve`]
/// treats environment and persistence failures as degraded-but-functional,
/// [`CredentialResolver::force_refresh`] treats them as fatal.
///
/// [`CredentialResolver::resolve`]: crate::CredentialResolver::resolve
/// [`CredentialResolver::force_refresh`]: crate::CredentialResolver::force_refresh
#[derive(Debug, Error)]
pub enum AuthError {
    /// The cache location could not be established (no home directory, or
    /// the cache directory could not be created).
    #[error("Cache location unavailable: {0}")]
    Environment(String),

    /// No cached credential exists at the cache path.
    #[error("No cached credential found")]
    NotFound,

    /// A cache file exists but does not decode into a credential. Folded
    /// into the same fallback branch as [`AuthError::NotFound`] by the
    /// resolver - an empty or truncated file behaves like a missing one.
    #[error("Cached credential is unreadable: {0}")]
    Corrupt(String),

    /// Reading the authorization code from the interactive input failed.
    #[error("Failed to read authorization code: {0}")]
    UserInput(#[source] std::io::Error),

    /// The token endpoint rejected the authorization code (invalid,
    /// expired, already used, or wrong redirect).
    #[error("Token endpoint rejected the authorization code: HTTP {status}: {detail}")]
    Exchange {
        /// HTTP status returned by the token endpoint.
        status: u16,
        /// OAuth error code and description, or the raw response body.
        detail: String,
    },

    /// Writing the credential to the cache file failed.
    #[error("Failed to persist credential: {0}")]
    Persist(#[source] std::io::Error),

    /// An endpoint URL in the provider configuration did not parse.
    #[error("Invalid URL in provider configuration: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// HTTP transport error talking to the token endpoint.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}
