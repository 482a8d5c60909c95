//! Object types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One entry of an object listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectInfo {
    /// The name of the object
    pub name: String,
    /// The size of the object in bytes
    pub size_bytes: i64,
    /// The last modified time of the object
    pub last_modified: DateTime<Utc>,
}

impl ObjectInfo {
    pub fn new(name: impl Into<String>, size_bytes: i64, last_modified: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            size_bytes,
            last_modified,
        }
    }
}

/// Validate an object name
pub fn validate_object_name(name: &str) -> crate::Result<()> {
    if name.is_empty() {
        return Err(crate::Error::InvalidArgument(
            "Object name cannot be empty".into(),
        ));
    }
    Ok(())
}
