// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # sheetcol Core
//!
//! Core types shared across the sheetcol crates.
//!
//! This crate defines the two values that flow through the whole tool:
//!
//! - [`ProviderConfig`] - static OAuth2 client parameters identifying the
//!   application and the requested access scope to the authorization server
//! - [`Credential`] - the bearer token (plus metadata) used to authenticate
//!   API calls, and the exact shape serialized to the on-disk cache
//!
//! Both are plain data: `ProviderConfig` is built once per invocation by the
//! CLI and never mutated, `Credential` is produced either by the interactive
//! authorization flow or by decoding a previously cached record.

pub mod models;

pub use models::{Credential, ProviderConfig};
