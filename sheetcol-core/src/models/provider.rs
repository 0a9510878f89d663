//! Static OAuth2 provider configuration.

/// Static parameters for one OAuth2 authorization-code flow.
///
/// Built once per invocation from the external client-credentials document
/// and passed by value into the credential resolver; the core never mutates
/// it. Keeping endpoints and scopes here (rather than in process-wide
/// constants) lets tests point the flow at injected servers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    /// OAuth2 client identifier.
    pub client_id: String,

    /// OAuth2 client secret.
    pub client_secret: String,

    /// Requested access scopes, space-joined into the authorization URL.
    pub scopes: Vec<String>,

    /// Redirect target registered with the provider. For the manual
    /// copy-paste flow this is the out-of-band redirect URI.
    pub redirect_uri: String,

    /// Authorization endpoint URL.
    pub auth_url: String,

    /// Token endpoint URL.
    pub token_url: String,
}
