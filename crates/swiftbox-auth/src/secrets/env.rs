//! Environment-backed secret store

use super::{SecretStore, SecretStoreError};

/// Reads secrets from process environment variables.
#[derive(Debug, Clone, Default)]
pub struct EnvSecretStore {
    prefix: Option<String>,
}

impl EnvSecretStore {
    pub fn new() -> Self {
        Self { prefix: None }
    }

    /// Look up `<prefix><key>` instead of `<key>`
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
        }
    }

    fn var_name(&self, key: &str) -> String {
        match &self.prefix {
            Some(prefix) => format!("{}{}", prefix, key),
            None => key.to_string(),
        }
    }
}

impl SecretStore for EnvSecretStore {
    fn get(&self, key: &str) -> Result<String, SecretStoreError> {
        let name = self.var_name(key);
        match std::env::var(&name) {
            Ok(value) => Ok(value),
            Err(std::env::VarError::NotPresent) => Err(SecretStoreError::NotFound(name)),
            Err(std::env::VarError::NotUnicode(_)) => Err(SecretStoreError::Unavailable(format!(
                "{} is not valid unicode",
                name
            ))),
        }
    }
}
