//! Credential lookup for Swiftbox
//!
//! Credentials are never stored by Swiftbox itself. They are read from an
//! injected [`SecretStore`] under the `OS_*` keys below.

pub mod secrets;

pub use secrets::{
    EnvSecretStore, FileSecretStore, MemorySecretStore, SecretStore, SecretStoreError,
};

use swiftbox_core::config::{SecretSource, SecretsConfig};
use swiftbox_core::{Credentials, Error, Result};
use tracing::debug;

/// Secret store keys
pub mod keys {
    pub const AUTH_URL: &str = "OS_AUTH_URL";
    pub const USERNAME: &str = "OS_USERNAME";
    pub const PASSWORD: &str = "OS_PASSWORD";
    pub const TENANT_ID: &str = "OS_TENANT_ID";
    pub const DOMAIN_NAME: &str = "OS_DOMAIN_NAME";

    pub const ALL: [&str; 5] = [AUTH_URL, USERNAME, PASSWORD, TENANT_ID, DOMAIN_NAME];
}

fn lookup(store: &dyn SecretStore, key: &str) -> Result<String> {
    store
        .get(key)
        .map_err(|e| Error::SecretStore(e.to_string()))
}

/// Read all five credential fields from a secret store.
///
/// Any lookup failure is reported as [`Error::SecretStore`].
pub fn credentials_from_store(store: &dyn SecretStore) -> Result<Credentials> {
    let auth_url = lookup(store, keys::AUTH_URL)?;
    let username = lookup(store, keys::USERNAME)?;
    let password = lookup(store, keys::PASSWORD)?;
    let tenant_id = lookup(store, keys::TENANT_ID)?;
    let domain_name = lookup(store, keys::DOMAIN_NAME)?;

    debug!("Loaded credentials for user {} from secret store", username);

    Ok(Credentials::new(auth_url, username, password)
        .with_tenant_id(tenant_id)
        .with_domain_name(domain_name))
}

/// Build the secret store described by the configuration
pub fn open_store(config: &SecretsConfig) -> Result<Box<dyn SecretStore>> {
    config.validate()?;

    match config.source {
        SecretSource::Env => {
            let store = match &config.env_prefix {
                Some(prefix) => EnvSecretStore::with_prefix(prefix.clone()),
                None => EnvSecretStore::new(),
            };
            Ok(Box::new(store))
        }
        SecretSource::File => {
            let path = config
                .file
                .as_ref()
                .ok_or_else(|| Error::Config("secrets.file is not set".into()))?;
            let store = FileSecretStore::open(path).map_err(|e| Error::SecretStore(e.to_string()))?;
            Ok(Box::new(store))
        }
    }
}
