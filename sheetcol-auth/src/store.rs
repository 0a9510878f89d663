//! Credential cache persistence.
//!
//! Handles loading and saving the single cached credential with proper
//! security: the cache directory is owner-only (`0700`) and the cache file
//! is owner read/write only (`0600`), because the file contains a bearer
//! secret.
//!
//! The cache location is fixed per machine-user:
//!
//! ```text
//! <home>/.credentials/<percent-escaped token filename>
//! ```
//!
//! The filename is stable across runs and not parameterized by spreadsheet
//! or scope - one cached credential per machine-user, by design.

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

#[cfg(unix)]
use std::os::unix::fs::{DirBuilderExt, OpenOptionsExt};

use tracing::{debug, instrument};
use url::form_urlencoded;

use sheetcol_core::Credential;

use crate::error::AuthError;

// ============================================================================
// Constants
// ============================================================================

/// Name of the per-user directory holding the credential cache.
const CREDENTIALS_DIR: &str = ".credentials";

/// Name of the cache file, escaped before use as a path component.
const TOKEN_FILE: &str = "sheets.googleapis.com-sheetcol.json";

/// Owner read/write/execute, for the cache directory.
#[cfg(unix)]
const DIR_MODE: u32 = 0o700;

/// Owner read/write, for the cache file.
#[cfg(unix)]
const FILE_MODE: u32 = 0o600;

// ============================================================================
// Credential Store
// ============================================================================

/// Durable, user-scoped persistence of exactly one [`Credential`].
///
/// The directory and file names are explicit fields (with fixed defaults)
/// rather than process-wide constants, so tests can inject a scratch root
/// instead of the real home directory.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    /// Base directory. `None` means the current user's home directory,
    /// resolved at call time.
    root: Option<PathBuf>,
    dir_name: String,
    file_name: String,
}

impl Default for CredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialStore {
    /// Creates a store over the fixed per-user cache location.
    pub fn new() -> Self {
        Self {
            root: None,
            dir_name: CREDENTIALS_DIR.to_string(),
            file_name: TOKEN_FILE.to_string(),
        }
    }

    /// Creates a store rooted at an explicit directory instead of the
    /// user's home directory.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
            ..Self::new()
        }
    }

    /// Computes the cache file path, creating the cache directory with
    /// owner-only permissions if it does not exist yet.
    ///
    /// # Errors
    ///
    /// [`AuthError::Environment`] when the home directory cannot be
    /// determined or the cache directory cannot be created (permission
    /// denied, or an existing file where the directory should be).
    #[instrument(skip(self))]
    pub fn cache_path(&self) -> Result<PathBuf, AuthError> {
        let base = match &self.root {
            Some(root) => root.clone(),
            None => dirs::home_dir().ok_or_else(|| {
                AuthError::Environment("home directory could not be determined".to_string())
            })?,
        };

        let cache_dir = base.join(&self.dir_name);
        create_private_dir(&cache_dir).map_err(|e| {
            AuthError::Environment(format!(
                "could not create {}: {e}",
                cache_dir.display()
            ))
        })?;

        let escaped: String =
            form_urlencoded::byte_serialize(self.file_name.as_bytes()).collect();
        Ok(cache_dir.join(escaped))
    }

    /// Loads the cached credential from `path`.
    ///
    /// Expiry is not inspected: a structurally valid but stale record is
    /// still returned. Staleness is the downstream API client's concern.
    ///
    /// # Errors
    ///
    /// [`AuthError::NotFound`] when no file exists at `path`,
    /// [`AuthError::Corrupt`] when the file cannot be read or decoded.
    #[instrument(skip(self))]
    pub fn load(&self, path: &Path) -> Result<Credential, AuthError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(AuthError::NotFound),
            Err(e) => return Err(AuthError::Corrupt(e.to_string())),
        };

        let credential: Credential =
            serde_json::from_str(&content).map_err(|e| AuthError::Corrupt(e.to_string()))?;

        debug!(path = %path.display(), "Loaded cached credential");
        Ok(credential)
    }

    /// Saves `credential` to `path`, overwriting any prior record.
    ///
    /// The file is created (or truncated) with owner read/write permissions
    /// only; no merge, no backup.
    ///
    /// # Errors
    ///
    /// [`AuthError::Persist`] on any I/O failure.
    #[instrument(skip(self, credential))]
    pub fn save(&self, path: &Path, credential: &Credential) -> Result<(), AuthError> {
        let json = serde_json::to_string_pretty(credential)
            .map_err(|e| AuthError::Persist(std::io::Error::other(e)))?;

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        options.mode(FILE_MODE);

        let mut file = options.open(path).map_err(AuthError::Persist)?;
        file.write_all(json.as_bytes()).map_err(AuthError::Persist)?;

        // The mode on OpenOptions only applies at creation; re-assert it so
        // a pre-existing file ends up owner-only as well.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(FILE_MODE))
                .map_err(AuthError::Persist)?;
        }

        debug!(path = %path.display(), "Credential cached");
        Ok(())
    }
}

/// Creates a directory (and missing parents) with owner-only permissions.
fn create_private_dir(path: &Path) -> std::io::Result<()> {
    let mut builder = std::fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    builder.mode(DIR_MODE);
    builder.create(path)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono::Utc;
    use tempfile::TempDir;

    fn sample_credential() -> Credential {
        Credential {
            access_token: "ya29.sample".to_string(),
            token_type: "Bearer".to_string(),
            refresh_token: Some("1//refresh".to_string()),
            expiry: Some(Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()),
        }
    }

    #[test]
    fn cache_path_creates_the_directory() {
        let temp = TempDir::new().unwrap();
        let store = CredentialStore::with_root(temp.path());

        let path = store.cache_path().unwrap();

        assert!(path.parent().unwrap().is_dir());
        assert!(path.starts_with(temp.path().join(CREDENTIALS_DIR)));
    }

    #[test]
    fn cache_path_is_stable_across_calls() {
        let temp = TempDir::new().unwrap();
        let store = CredentialStore::with_root(temp.path());

        assert_eq!(store.cache_path().unwrap(), store.cache_path().unwrap());
    }

    #[test]
    fn cache_path_escapes_the_file_name() {
        let temp = TempDir::new().unwrap();
        let store = CredentialStore::with_root(temp.path());

        let path = store.cache_path().unwrap();
        let name = path.file_name().unwrap().to_str().unwrap();

        assert!(!name.contains('/'));
        assert!(name.ends_with(".json"));
    }

    #[test]
    fn cache_path_fails_when_a_file_blocks_the_directory() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(CREDENTIALS_DIR), b"not a directory").unwrap();
        let store = CredentialStore::with_root(temp.path());

        let err = store.cache_path().unwrap_err();
        assert!(matches!(err, AuthError::Environment(_)));
    }

    #[cfg(unix)]
    #[test]
    fn cache_directory_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let store = CredentialStore::with_root(temp.path());

        let path = store.cache_path().unwrap();
        let mode = std::fs::metadata(path.parent().unwrap())
            .unwrap()
            .permissions()
            .mode()
            & 0o777;
        assert_eq!(mode, 0o700);
    }

    #[test]
    fn save_then_load_round_trips() {
        let temp = TempDir::new().unwrap();
        let store = CredentialStore::with_root(temp.path());
        let path = store.cache_path().unwrap();
        let credential = sample_credential();

        store.save(&path, &credential).unwrap();
        let loaded = store.load(&path).unwrap();

        assert_eq!(loaded, credential);
    }

    #[test]
    fn load_missing_file_is_not_found() {
        let temp = TempDir::new().unwrap();
        let store = CredentialStore::with_root(temp.path());
        let path = store.cache_path().unwrap();

        assert!(matches!(store.load(&path), Err(AuthError::NotFound)));
    }

    #[test]
    fn load_empty_file_is_corrupt() {
        let temp = TempDir::new().unwrap();
        let store = CredentialStore::with_root(temp.path());
        let path = store.cache_path().unwrap();
        std::fs::write(&path, b"").unwrap();

        assert!(matches!(store.load(&path), Err(AuthError::Corrupt(_))));
    }

    #[test]
    fn load_non_json_file_is_corrupt() {
        let temp = TempDir::new().unwrap();
        let store = CredentialStore::with_root(temp.path());
        let path = store.cache_path().unwrap();
        std::fs::write(&path, b"definitely not json").unwrap();

        assert!(matches!(store.load(&path), Err(AuthError::Corrupt(_))));
    }

    #[test]
    fn load_truncated_record_is_corrupt() {
        let temp = TempDir::new().unwrap();
        let store = CredentialStore::with_root(temp.path());
        let path = store.cache_path().unwrap();
        std::fs::write(&path, br#"{"access_token": "ya29"#).unwrap();

        assert!(matches!(store.load(&path), Err(AuthError::Corrupt(_))));
    }

    #[test]
    fn save_overwrites_a_prior_record() {
        let temp = TempDir::new().unwrap();
        let store = CredentialStore::with_root(temp.path());
        let path = store.cache_path().unwrap();

        store.save(&path, &sample_credential()).unwrap();

        let replacement = Credential {
            access_token: "ya29.replacement".to_string(),
            token_type: "Bearer".to_string(),
            refresh_token: None,
            expiry: None,
        };
        store.save(&path, &replacement).unwrap();

        assert_eq!(store.load(&path).unwrap(), replacement);
    }

    #[cfg(unix)]
    #[test]
    fn saved_file_is_owner_read_write_only() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let store = CredentialStore::with_root(temp.path());
        let path = store.cache_path().unwrap();

        store.save(&path, &sample_credential()).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600, "cache file should be 0600");
    }

    #[cfg(unix)]
    #[test]
    fn save_re_restricts_a_pre_existing_file() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let store = CredentialStore::with_root(temp.path());
        let path = store.cache_path().unwrap();

        std::fs::write(&path, b"{}").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();

        store.save(&path, &sample_credential()).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);
    }

    #[test]
    fn save_to_a_directory_path_is_a_persist_error() {
        let temp = TempDir::new().unwrap();
        let store = CredentialStore::with_root(temp.path());
        let path = store.cache_path().unwrap();
        std::fs::create_dir(&path).unwrap();

        let err = store.save(&path, &sample_credential()).unwrap_err();
        assert!(matches!(err, AuthError::Persist(_)));
    }
}
