//! The `auth` command: explicit (re)authentication.

use std::path::PathBuf;

use anyhow::Result;

use sheetcol_auth::CredentialResolver;

use crate::config;

/// Arguments for the auth command.
#[derive(clap::Args)]
pub struct AuthArgs {
    /// Path to the client credentials document.
    #[arg(long, default_value = config::DEFAULT_CREDENTIALS_PATH)]
    pub credentials: PathBuf,
}

/// Runs the authorization flow and caches the resulting credential.
///
/// Unlike `get`, a failure to persist the credential is fatal here: the
/// whole point of this command is a refreshed cache.
pub async fn run(args: &AuthArgs) -> Result<()> {
    let provider = config::load_provider_config(&args.credentials)?;

    let resolver = CredentialResolver::new();
    resolver.force_refresh(&provider).await?;

    eprintln!("Credential cached.");
    Ok(())
}
