//! Secret store capability

mod env;
mod file;
mod memory;

pub use env::EnvSecretStore;
pub use file::FileSecretStore;
pub use memory::MemorySecretStore;

use thiserror::Error;

/// Errors reported by a secret store
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SecretStoreError {
    #[error("Secret not found: {0}")]
    NotFound(String),

    #[error("Secret store unavailable: {0}")]
    Unavailable(String),
}

/// Key/value lookup of secrets
pub trait SecretStore: Send + Sync {
    fn get(&self, key: &str) -> Result<String, SecretStoreError>;
}

