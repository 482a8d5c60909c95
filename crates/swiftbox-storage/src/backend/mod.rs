//! Backend trait and implementations

mod local;
mod memory;
mod s3;

pub use local::{LocalBackend, LocalConnector};
pub use memory::{MemoryBackend, MemoryConnector};
pub use s3::{S3Backend, S3Connector};

use async_trait::async_trait;
use bytes::Bytes;
use swiftbox_core::{Credentials, ObjectInfo};
use thiserror::Error;

pub type BackendResult<T> = std::result::Result<T, BackendError>;

/// Raw provider error. Only the message text is kept.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct BackendError {
    message: String,
}

impl BackendError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn into_message(self) -> String {
        self.message
    }

    pub fn contains(&self, marker: &str) -> bool {
        self.message.contains(marker)
    }

    // S3-style messages emitted by the in-process backends

    pub fn no_such_bucket(container: &str) -> Self {
        Self::new(format!(
            "NoSuchBucket: The specified bucket does not exist: {}",
            container
        ))
    }

    pub fn no_such_key(container: &str, key: &str) -> Self {
        Self::new(format!(
            "NoSuchKey: The specified key does not exist: {}/{}",
            container, key
        ))
    }

    pub fn bucket_already_exists(container: &str) -> Self {
        Self::new(format!(
            "BucketAlreadyExists: The requested bucket name is not available: {}",
            container
        ))
    }

    pub fn bucket_not_empty(container: &str) -> Self {
        Self::new(format!(
            "BucketNotEmpty: The bucket you tried to delete is not empty: {} (HTTP 409)",
            container
        ))
    }

    pub fn internal(detail: impl std::fmt::Display) -> Self {
        Self::new(format!("InternalError: {}", detail))
    }
}

impl From<std::io::Error> for BackendError {
    fn from(err: std::io::Error) -> Self {
        Self::internal(err)
    }
}

/// Backend primitives, used for failure injection and call logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ListContainers,
    CreateContainer,
    DeleteContainer,
    ListObjects,
    PutObject,
    GetObject,
    DeleteObject,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ListContainers => "list_containers",
            Self::CreateContainer => "create_container",
            Self::DeleteContainer => "delete_container",
            Self::ListObjects => "list_objects",
            Self::PutObject => "put_object",
            Self::GetObject => "get_object",
            Self::DeleteObject => "delete_object",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An authenticated connection to an object storage service
#[async_trait]
pub trait Backend: Send + Sync {
    /// Short backend name for logs
    fn name(&self) -> &'static str;

    /// Container names starting with `prefix`, in backend order
    async fn list_containers(&self, prefix: &str) -> BackendResult<Vec<String>>;

    /// Create a container
    async fn create_container(&self, name: &str) -> BackendResult<()>;

    /// Delete a container
    async fn delete_container(&self, name: &str) -> BackendResult<()>;

    /// Every object in a container, pagination resolved
    async fn list_objects(&self, container: &str) -> BackendResult<Vec<ObjectInfo>>;

    /// Store object data, replacing any existing object
    async fn put_object(&self, container: &str, name: &str, data: Bytes) -> BackendResult<()>;

    /// Retrieve object data
    async fn get_object(&self, container: &str, name: &str) -> BackendResult<Bytes>;

    /// Delete an object
    async fn delete_object(&self, container: &str, name: &str) -> BackendResult<()>;
}

/// Produces authenticated backends from credentials
#[async_trait]
pub trait Connector: Send + Sync {
    fn name(&self) -> &'static str;

    async fn authenticate(&self, credentials: &Credentials) -> BackendResult<Box<dyn Backend>>;
}
