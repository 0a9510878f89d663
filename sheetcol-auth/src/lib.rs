// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # sheetcol Auth
//!
//! Credential resolution and caching: decide on every invocation whether a
//! valid cached bearer credential exists, and if not, drive an interactive
//! authorization-code flow and persist the result for future runs.
//!
//! ## Components
//!
//! - [`CredentialStore`] - durable, user-scoped, permission-restricted
//!   persistence of exactly one [`Credential`] on disk
//! - [`InteractiveAuthorizer`] - human-in-the-loop authorization-code flow:
//!   print a URL, best-effort browser launch, read the code back, exchange
//!   it at the token endpoint
//! - [`CredentialResolver`] - orchestrates the two behind [`resolve`] and
//!   [`force_refresh`], with deliberately different failure policies
//!
//! [`Credential`]: sheetcol_core::Credential
//! [`resolve`]: CredentialResolver::resolve
//! [`force_refresh`]: CredentialResolver::force_refresh
//!
//! ## Usage
//!
//! ```ignore
//! use sheetcol_auth::CredentialResolver;
//!
//! let resolver = CredentialResolver::new();
//! let credential = resolver.resolve(&config).await?;
//! ```

pub mod authorizer;
pub mod error;
pub mod resolver;
pub mod store;

pub use authorizer::{Authorize, CodePrompt, InteractiveAuthorizer, StdinPrompt};
pub use error::AuthError;
pub use resolver::CredentialResolver;
pub use store::CredentialStore;
