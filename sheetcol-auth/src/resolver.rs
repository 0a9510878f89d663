//! Credential resolution orchestration.
//!
//! [`CredentialResolver`] ties the cache and the interactive flow together.
//! The only state between runs is the cache file itself; within one call,
//! load happens-before obtain happens-before save, and across invocations
//! no ordering is promised. Save is an unconditional truncate-and-write
//! with no locking, so concurrent invocations over the same cache file are
//! not coordinated.

use tracing::{debug, instrument, warn};

use sheetcol_core::{Credential, ProviderConfig};

use crate::authorizer::{Authorize, InteractiveAuthorizer};
use crate::error::AuthError;
use crate::store::CredentialStore;

/// Resolves a credential from cache, falling back to the interactive flow.
///
/// The two entry points differ deliberately in how they treat caching
/// failures, and they are separate named operations (rather than a flag)
/// so the contract is visible at call sites:
///
/// - [`resolve`](Self::resolve) treats caching as an optimization and
///   swallows persistence failures
/// - [`force_refresh`](Self::force_refresh) is the explicit
///   "(re)authenticate" path and propagates them
pub struct CredentialResolver<A: Authorize = InteractiveAuthorizer> {
    store: CredentialStore,
    authorizer: A,
}

impl CredentialResolver {
    /// Creates a resolver over the fixed per-user cache and the stdin
    /// authorizer.
    pub fn new() -> Self {
        Self::with_parts(CredentialStore::new(), InteractiveAuthorizer::new())
    }
}

impl Default for CredentialResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Authorize> CredentialResolver<A> {
    /// Creates a resolver from an explicit store and authorizer.
    pub fn with_parts(store: CredentialStore, authorizer: A) -> Self {
        Self { store, authorizer }
    }

    /// Returns the cached credential, or obtains and caches a fresh one.
    ///
    /// A cache hit is returned as-is with no validity check beyond a
    /// successful decode - in particular, no expiry check. A miss (absent
    /// or corrupt file, one fallback branch) triggers the interactive
    /// flow. An unusable cache location skips caching entirely rather than
    /// blocking usage, and a failed save is swallowed: the freshly
    /// obtained credential is still returned and the tool degrades to
    /// re-authorizing every run.
    ///
    /// # Errors
    ///
    /// Only failures of the interactive flow itself are fatal here:
    /// [`AuthError::UserInput`], [`AuthError::Exchange`],
    /// [`AuthError::Http`], [`AuthError::InvalidUrl`].
    #[instrument(skip(self, config))]
    pub async fn resolve(&self, config: &ProviderConfig) -> Result<Credential, AuthError> {
        let cache_path = match self.store.cache_path() {
            Ok(path) => Some(path),
            Err(e) => {
                warn!(error = %e, "Continuing without a credential cache");
                None
            }
        };

        if let Some(path) = &cache_path {
            match self.store.load(path) {
                Ok(credential) => {
                    debug!(path = %path.display(), "Using cached credential");
                    return Ok(credential);
                }
                Err(e) => debug!(error = %e, "Cache miss, starting authorization"),
            }
        }

        let credential = self.authorizer.obtain(config).await?;

        if let Some(path) = &cache_path {
            if let Err(e) = self.store.save(path, &credential) {
                warn!(error = %e, "Credential not cached, authorization will repeat next run");
            }
        }

        Ok(credential)
    }

    /// Obtains a fresh credential and caches it, never consulting the
    /// existing cache.
    ///
    /// Unlike [`resolve`](Self::resolve), a caller explicitly requesting a
    /// refreshed, cached credential must know when persistence failed, so
    /// cache errors propagate here.
    ///
    /// # Errors
    ///
    /// Everything [`resolve`](Self::resolve) can return, plus
    /// [`AuthError::Environment`] and [`AuthError::Persist`] when the
    /// credential could not be cached.
    #[instrument(skip(self, config))]
    pub async fn force_refresh(&self, config: &ProviderConfig) -> Result<Credential, AuthError> {
        let credential = self.authorizer.obtain(config).await?;

        let cache_path = self.store.cache_path()?;
        self.store.save(&cache_path, &credential)?;

        debug!(path = %cache_path.display(), "Credential refreshed and cached");
        Ok(credential)
    }
}

// ============================================================================
// Tests
// ============================================================================
