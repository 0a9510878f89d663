// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! sheetcol - pull a single column out of a Google Sheet.
//!
//! # Examples
//!
//! ```bash
//! # Authenticate and cache a credential
//! sheetcol auth
//!
//! # Print column B of a sheet to stdout
//! sheetcol get --spreadsheet 1BxiMVs0XRA5nFMdKvBdBZjgmUUqptlbs74OgvE2upms \
//!     --sheet "Class Data" --column b
//!
//! # Write the column to a file instead
//! sheetcol get --spreadsheet ... --sheet Data --column a --output names.txt
//! ```

mod commands;
mod config;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{auth, get};

// ============================================================================
// CLI Definition
// ============================================================================

/// sheetcol - Google Sheets column retrieval.
#[derive(Parser)]
#[command(name = "sheetcol")]
#[command(about = "Pull a single column out of a Google Sheet")]
#[command(version)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Quiet mode (minimal output).
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Authenticate via browser and cache the credential.
    ///
    /// Always runs the authorization flow, even when a cached credential
    /// exists; failure to cache the new credential is an error here.
    Auth(auth::AuthArgs),

    /// Fetch one column of one sheet.
    #[command(visible_alias = "g")]
    Get(get::GetArgs),
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool) {
    if quiet {
        return; // No logging in quiet mode
    }

    let filter = if verbose {
        EnvFilter::new("sheetcol_auth=debug,sheetcol_sheets=debug,sheetcol=debug,info")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let result = match &cli.command {
        Commands::Auth(args) => auth::run(args).await,
        Commands::Get(args) => get::run(args).await,
    };

    if let Err(e) = result {
        if !cli.quiet {
            eprintln!("Error: {e:#}");
        }
        std::process::exit(1);
    }
}
