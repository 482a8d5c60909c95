//! File-backed secret store
//!
//! Example file:
//! ```toml
//! OS_AUTH_URL = "https://identity.example.com/v3"
//! OS_USERNAME = "alice"
//! OS_PASSWORD = "secret"
//! OS_TENANT_ID = "0123456789abcdef"
//! OS_DOMAIN_NAME = "example"
//! ```

use super::{SecretStore, SecretStoreError};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Read-only view of a TOML table of string secrets
#[derive(Debug, Clone)]
pub struct FileSecretStore {
    path: PathBuf,
    values: HashMap<String, String>,
}

impl FileSecretStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SecretStoreError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            SecretStoreError::Unavailable(format!("Failed to read {:?}: {}", path, e))
        })?;

        let values: HashMap<String, String> = toml::from_str(&content).map_err(|e| {
            SecretStoreError::Unavailable(format!("Failed to parse {:?}: {}", path, e))
        })?;

        warn_if_shared(path);
        debug!("Opened secret file {:?} ({} keys)", path, values.len());

        Ok(Self {
            path: path.to_path_buf(),
            values,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(unix)]
fn warn_if_shared(path: &Path) {
    use std::os::unix::fs::PermissionsExt;

    if let Ok(metadata) = std::fs::metadata(path) {
        if metadata.permissions().mode() & 0o077 != 0 {
            warn!("Secret file {:?} is accessible by group or others", path);
        }
    }
}

#[cfg(not(unix))]
fn warn_if_shared(_path: &Path) {}

impl SecretStore for FileSecretStore {
    fn get(&self, key: &str) -> Result<String, SecretStoreError> {
        self.values
            .get(key)
            .cloned()
            .ok_or_else(|| SecretStoreError::NotFound(key.to_string()))
    }
}
