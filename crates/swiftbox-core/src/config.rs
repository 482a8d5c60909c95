//! Configuration for Swiftbox

use crate::types::EmptinessCheck;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SwiftboxConfig {
    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub client: ClientConfig,

    #[serde(default)]
    pub secrets: SecretsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SwiftboxConfig {
    pub fn from_file(path: impl AsRef<Path>) -> crate::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| crate::Error::Config(format!("Failed to read config {:?}: {}", path, e)))?;

        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> crate::Result<Self> {
        toml::from_str(content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))
    }

    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Override fields from `SWIFTBOX_*` environment variables
    pub fn apply_env(&mut self) {
        self.apply_vars(|key| std::env::var(key).ok());
    }

    /// Override fields from `SWIFTBOX_*` values returned by `lookup`.
    /// Unparseable values are skipped with a warning.
    pub fn apply_vars(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(kind) = lookup("SWIFTBOX_BACKEND") {
            match BackendKind::parse(&kind) {
                Some(kind) => self.backend.kind = kind,
                None => tracing::warn!("Ignoring unknown SWIFTBOX_BACKEND value: {}", kind),
            }
        }
        if let Some(region) = lookup("SWIFTBOX_REGION") {
            self.backend.region = region;
        }
        if let Some(dir) = lookup("SWIFTBOX_DATA_DIR") {
            self.backend.data_dir = PathBuf::from(dir);
        }
        if let Some(timeout) = lookup("SWIFTBOX_TIMEOUT_SECS") {
            match timeout.parse() {
                Ok(t) => self.backend.timeout_secs = t,
                Err(e) => tracing::warn!(
                    "Ignoring invalid SWIFTBOX_TIMEOUT_SECS value {:?}: {}",
                    timeout,
                    e
                ),
            }
        }
        if let Some(check) = lookup("SWIFTBOX_EMPTINESS_CHECK") {
            match EmptinessCheck::parse(&check) {
                Some(check) => self.client.emptiness_check = check,
                None => tracing::warn!(
                    "Ignoring unknown SWIFTBOX_EMPTINESS_CHECK value: {} (expected objects or container-prefix)",
                    check
                ),
            }
        }
        if let Some(file) = lookup("SWIFTBOX_SECRETS_FILE") {
            self.secrets.source = SecretSource::File;
            self.secrets.file = Some(PathBuf::from(file));
        }
        if let Some(level) = lookup("SWIFTBOX_LOG_LEVEL") {
            self.logging.level = level;
        }
    }

    pub fn validate(&self) -> crate::Result<()> {
        self.backend.validate()?;
        self.secrets.validate()?;
        Ok(())
    }
}

/// Which adapter talks to the storage service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// S3-compatible HTTP endpoint
    #[default]
    S3,
    /// Directory tree on the local filesystem
    Local,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::S3 => "s3",
            Self::Local => "local",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "s3" => Some(Self::S3),
            "local" | "fs" => Some(Self::Local),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default)]
    pub kind: BackendKind,
    /// Region used when signing S3 requests
    #[serde(default = "default_region")]
    pub region: String,
    /// Path style access (use path instead of virtual hosted style)
    #[serde(default = "default_true")]
    pub path_style: bool,
    /// Operation timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Root directory of the local backend
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

fn default_region() -> String {
    crate::DEFAULT_REGION.to_string()
}

fn default_true() -> bool {
    true
}

fn default_timeout() -> u64 {
    crate::DEFAULT_TIMEOUT_SECS
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("/var/lib/swiftbox")
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            kind: BackendKind::default(),
            region: default_region(),
            path_style: true,
            timeout_secs: default_timeout(),
            data_dir: default_data_dir(),
        }
    }
}

impl BackendConfig {
    pub fn validate(&self) -> crate::Result<()> {
        if self.timeout_secs == 0 {
            return Err(crate::Error::Config(
                "backend.timeout_secs must be greater than zero".into(),
            ));
        }
        if self.kind == BackendKind::S3 && self.region.is_empty() {
            return Err(crate::Error::Config(
                "backend.region cannot be empty for the s3 backend".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub emptiness_check: EmptinessCheck,
}

/// Where credentials are looked up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SecretSource {
    #[default]
    Env,
    File,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecretsConfig {
    #[serde(default)]
    pub source: SecretSource,
    /// TOML file holding `OS_*` keys, required when `source = "file"`
    pub file: Option<PathBuf>,
    /// Prefix prepended to every key looked up in the environment
    pub env_prefix: Option<String>,
}

impl SecretsConfig {
    pub fn validate(&self) -> crate::Result<()> {
        if self.source == SecretSource::File && self.file.is_none() {
            return Err(crate::Error::Config(
                "secrets.source is \"file\" but secrets.file is not set".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
