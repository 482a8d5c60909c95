//! Container types

use serde::{Deserialize, Serialize};

/// How a container is checked for emptiness before it is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum EmptinessCheck {
    /// List the objects inside the container
    #[default]
    Objects,
    /// List containers using the container name as a prefix filter.
    /// Any container sharing the prefix (including itself) blocks deletion.
    ContainerPrefix,
}

impl EmptinessCheck {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Objects => "objects",
            Self::ContainerPrefix => "container-prefix",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "objects" => Some(Self::Objects),
            "container-prefix" | "prefix" => Some(Self::ContainerPrefix),
            _ => None,
        }
    }
}

/// Validate a container name
pub fn validate_container_name(name: &str) -> crate::Result<()> {
    if name.is_empty() {
        return Err(crate::Error::InvalidArgument(
            "Container name cannot be empty".into(),
        ));
    }
    if name.contains('/') || name.contains('\\') {
        return Err(crate::Error::InvalidArgument(format!(
            "Container name cannot contain a path separator: {}",
            name
        )));
    }
    if name == "." || name == ".." {
        return Err(crate::Error::InvalidArgument(format!(
            "Container name cannot be a dot segment: {}",
            name
        )));
    }
    Ok(())
}
