//! Swiftbox
//!
//! A small object storage client. [`StorageClient`] wraps one authenticated
//! backend connection and exposes container and object operations whose
//! failures always come back as a classified [`Error`], so callers can
//! branch on [`ErrorKind`] without knowing which provider is behind it.
//!
//! ```no_run
//! # async fn run() -> swiftbox::Result<()> {
//! let config = swiftbox::SwiftboxConfig::from_env();
//! let client = swiftbox::connect_from_config(&config).await?;
//! client.create_container("reports").await?;
//! client.upload_file("reports", "/tmp/q3.csv").await?;
//! # Ok(())
//! # }
//! ```

pub mod classify;
mod client;

pub use client::{ClientOptions, StorageClient};

pub use swiftbox_auth::{credentials_from_store, open_store, SecretStore};
pub use swiftbox_core::{
    Credentials, EmptinessCheck, Error, ErrorKind, ObjectInfo, Result, SwiftboxConfig,
};
pub use swiftbox_storage::{connector_for, Backend, BackendError, Connector};

use tracing::debug;

/// Read credentials from the configured secret store and connect to the
/// configured backend.
pub async fn connect_from_config(config: &SwiftboxConfig) -> Result<StorageClient> {
    config.validate()?;

    let store = open_store(&config.secrets)?;
    let credentials = credentials_from_store(store.as_ref())?;

    let connector = connector_for(&config.backend);
    debug!("Using {} connector", connector.name());

    StorageClient::connect_with(
        connector.as_ref(),
        &credentials,
        ClientOptions::from(&config.client),
    )
    .await
}
