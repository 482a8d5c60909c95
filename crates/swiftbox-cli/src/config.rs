//! Configuration loading for the Swiftbox CLI
//!
//! Config file location: ~/.swiftbox/config.toml
//!
//! Example config:
//! ```toml
//! [backend]
//! kind = "s3"
//! region = "us-east-1"
//!
//! [client]
//! emptiness_check = "objects"
//!
//! [secrets]
//! source = "file"
//! file = "/home/me/.swiftbox/credentials.toml"
//! ```
//!
//! Precedence: command-line flags, then `SWIFTBOX_*` environment
//! variables, then the file.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use swiftbox_core::config::{BackendKind, SecretSource};
use swiftbox_core::{EmptinessCheck, SwiftboxConfig};

/// `~/.swiftbox/config.toml`, if a home directory can be determined
pub fn default_config_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|dirs| dirs.home_dir().join(".swiftbox").join("config.toml"))
}

/// Load the explicit file, else the default file when it exists, else
/// defaults. Environment overrides are applied on top.
pub fn load(explicit: Option<&Path>) -> Result<SwiftboxConfig> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => default_config_path().filter(|path| path.exists()),
    };

    let mut config = match path {
        Some(path) => SwiftboxConfig::from_file(&path)
            .with_context(|| format!("Failed to load config from {:?}", path))?,
        None => SwiftboxConfig::default(),
    };

    config.apply_env();
    Ok(config)
}

/// Values given on the command line
#[derive(Debug, Default)]
pub struct Overrides {
    pub backend: Option<BackendKind>,
    pub data_dir: Option<PathBuf>,
    pub region: Option<String>,
    pub secrets_file: Option<PathBuf>,
    pub log_level: Option<String>,
    pub emptiness_check: Option<EmptinessCheck>,
}

impl Overrides {
    pub fn apply(self, config: &mut SwiftboxConfig) {
        if let Some(backend) = self.backend {
            config.backend.kind = backend;
        }
        if let Some(data_dir) = self.data_dir {
            config.backend.data_dir = data_dir;
        }
        if let Some(region) = self.region {
            config.backend.region = region;
        }
        if let Some(file) = self.secrets_file {
            config.secrets.source = SecretSource::File;
            config.secrets.file = Some(file);
        }
        if let Some(level) = self.log_level {
            config.logging.level = level;
        }
        if let Some(check) = self.emptiness_check {
            config.client.emptiness_check = check;
        }
    }
}
