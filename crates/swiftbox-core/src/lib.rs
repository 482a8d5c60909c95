//! Swiftbox Core Library
//!
//! Core types, error taxonomy, and configuration shared by the Swiftbox
//! object storage client crates.

pub mod config;
pub mod error;
pub mod types;
pub mod utils;

pub use config::SwiftboxConfig;
pub use error::{Error, ErrorKind, Result};
pub use types::{Credentials, EmptinessCheck, ObjectInfo};

/// Swiftbox version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default S3 region
pub const DEFAULT_REGION: &str = "us-east-1";

/// Account directory used by the local backend when no tenant is given
pub const DEFAULT_TENANT: &str = "default";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;
