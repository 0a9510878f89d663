// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # sheetcol Sheets
//!
//! Thin client for the Google Sheets values API: given a resolved
//! credential and a spreadsheet id, fetch one column of one sheet as a
//! list of strings.
//!
//! ## API Endpoint
//!
//! ```text
//! GET https://sheets.googleapis.com/v4/spreadsheets/{id}/values/{Sheet!C:C}
//! Authorization: Bearer <access_token>
//! ```

pub mod client;
pub mod error;

pub use client::SheetsClient;
pub use error::SheetsError;
