//! The `get` command: fetch one column and emit it to a sink.

use std::path::PathBuf;

use anyhow::{Context, Result};

use sheetcol_auth::CredentialResolver;
use sheetcol_sheets::SheetsClient;

use crate::{config, output};

/// Arguments for the get command.
#[derive(clap::Args)]
pub struct GetArgs {
    /// ID of the spreadsheet.
    #[arg(long)]
    pub spreadsheet: String,

    /// Name of the sheet.
    #[arg(long)]
    pub sheet: String,

    /// Column letter.
    #[arg(long)]
    pub column: String,

    /// Output path. Writes to stdout when omitted.
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Path to the client credentials document.
    #[arg(long, default_value = config::DEFAULT_CREDENTIALS_PATH)]
    pub credentials: PathBuf,
}

/// Resolves a credential, fetches the column, and writes it out.
pub async fn run(args: &GetArgs) -> Result<()> {
    let provider = config::load_provider_config(&args.credentials)?;

    let resolver = CredentialResolver::new();
    let credential = resolver
        .resolve(&provider)
        .await
        .context("unable to authorize requests")?;

    let client = SheetsClient::new(credential, &args.spreadsheet);
    let values = client
        .get_column(&args.sheet, &args.column)
        .await
        .context("unable to get column values")?;

    match &args.output {
        Some(path) => output::write_lines(path, &values)
            .with_context(|| format!("unable to write output to {}", path.display()))?,
        None => output::print_lines(&values),
    }

    Ok(())
}
