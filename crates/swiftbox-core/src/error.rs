//! Error types for Swiftbox

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Classification tag of an [`Error`]. Callers branch on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    AlreadyExists,
    Conflict,
    NotFound,
    NoSuchKey,
    CannotOpenFile,
    CannotCreateFile,
    BackendFailure,
    SecretStore,
    InvalidArgument,
    Config,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AlreadyExists => "AlreadyExists",
            Self::Conflict => "Conflict",
            Self::NotFound => "NotFound",
            Self::NoSuchKey => "NoSuchKey",
            Self::CannotOpenFile => "CannotOpenFile",
            Self::CannotCreateFile => "CannotCreateFile",
            Self::BackendFailure => "BackendFailure",
            Self::SecretStore => "SecretStore",
            Self::InvalidArgument => "InvalidArgument",
            Self::Config => "Config",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum Error {
    // Container Errors
    #[error("The container already exists: {0}")]
    AlreadyExists(String),

    #[error("The container is not empty or is in a conflicting state: {0}")]
    Conflict(String),

    #[error("The specified container does not exist: {0}")]
    NotFound(String),

    // Object Errors
    #[error("The specified key does not exist: {container}/{key}")]
    NoSuchKey { container: String, key: String },

    // Local File Errors
    #[error("Cannot open file {path:?}: {source}")]
    CannotOpenFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot create file {path:?}: {source}")]
    CannotCreateFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Backend Errors
    #[error("Backend error: {0}")]
    Backend(String),

    // Configuration Errors
    #[error("Secret store error: {0}")]
    SecretStore(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::AlreadyExists(_) => ErrorKind::AlreadyExists,
            Error::Conflict(_) => ErrorKind::Conflict,
            Error::NotFound(_) => ErrorKind::NotFound,
            Error::NoSuchKey { .. } => ErrorKind::NoSuchKey,
            Error::CannotOpenFile { .. } => ErrorKind::CannotOpenFile,
            Error::CannotCreateFile { .. } => ErrorKind::CannotCreateFile,
            Error::Backend(_) => ErrorKind::BackendFailure,
            Error::SecretStore(_) => ErrorKind::SecretStore,
            Error::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Error::Config(_) => ErrorKind::Config,
        }
    }

    /// Stable error code, suitable for logs and CLI output.
    pub fn code(&self) -> &'static str {
        match self.kind() {
            ErrorKind::AlreadyExists => "ErrBucketAlreadyExists",
            ErrorKind::Conflict => "ErrConflict",
            ErrorKind::NotFound => "ErrNoSuchBucket",
            ErrorKind::NoSuchKey => "ErrNoSuchKey",
            ErrorKind::CannotOpenFile => "ErrCannotOpenFile",
            ErrorKind::CannotCreateFile => "ErrCannotCreateFile",
            ErrorKind::BackendFailure => "ErrBackend",
            ErrorKind::SecretStore => "ErrVault",
            ErrorKind::InvalidArgument => "ErrInvalidArgument",
            ErrorKind::Config => "ErrConfig",
        }
    }

    /// Original backend message for unclassified failures.
    pub fn backend_detail(&self) -> Option<&str> {
        match self {
            Error::Backend(detail) => Some(detail),
            _ => None,
        }
    }
}
