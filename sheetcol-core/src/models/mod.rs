//! Domain models for sheetcol.

mod credential;
mod provider;

pub use credential::Credential;
pub use provider::ProviderConfig;
