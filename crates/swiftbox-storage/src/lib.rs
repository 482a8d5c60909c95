//! Storage backends for Swiftbox
//!
//! A backend is an authenticated connection to an object storage service.
//! Backends report failures as raw [`BackendError`] text; turning that text
//! into domain errors is the client's job.

pub mod backend;

pub use backend::{
    Backend, BackendError, BackendResult, Connector, LocalBackend, LocalConnector,
    MemoryBackend, MemoryConnector, Operation, S3Backend, S3Connector,
};

use swiftbox_core::config::{BackendConfig, BackendKind};

/// Build the connector selected by the configuration
pub fn connector_for(config: &BackendConfig) -> Box<dyn Connector> {
    match config.kind {
        BackendKind::S3 => Box::new(S3Connector::from_config(config)),
        BackendKind::Local => Box::new(LocalConnector::new(&config.data_dir)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connector_for() {
        let mut config = BackendConfig::default();
        assert_eq!(connector_for(&config).name(), "s3");

        config.kind = BackendKind::Local;
        assert_eq!(connector_for(&config).name(), "local");
    }
}
