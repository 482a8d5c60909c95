//! Backend error classification
//!
//! Each operation has one function mapping a raw [`BackendError`] onto the
//! domain [`Error`] vocabulary. Matching is a best-effort heuristic over the
//! provider's message text; providers are free to change their wording, in
//! which case the marker lists below are the only place to update.

use swiftbox_core::Error;
use swiftbox_storage::BackendError;

/// The container named in a create already exists
pub const ALREADY_EXISTS_MARKERS: &[&str] = &["BucketAlreadyExists", "BucketAlreadyOwnedByYou"];

/// The target container does not exist
pub const NO_SUCH_BUCKET_MARKERS: &[&str] = &["NoSuchBucket"];

/// The target object does not exist
pub const NO_SUCH_KEY_MARKERS: &[&str] = &["NoSuchKey"];

/// The service refused a container delete with a conflict
pub const CONFLICT_MARKERS: &[&str] = &["but got 409 instead", "BucketNotEmpty"];

fn matches_any(err: &BackendError, markers: &[&str]) -> bool {
    markers.iter().any(|marker| err.contains(marker))
}

/// Wrap without classification, keeping the provider message
pub fn backend_failure(err: BackendError) -> Error {
    Error::Backend(err.into_message())
}

pub fn authenticate(err: BackendError) -> Error {
    backend_failure(err)
}

pub fn list_containers(err: BackendError) -> Error {
    backend_failure(err)
}

pub fn create_container(err: BackendError, name: &str) -> Error {
    if matches_any(&err, ALREADY_EXISTS_MARKERS) {
        return Error::AlreadyExists(name.to_string());
    }
    backend_failure(err)
}

pub fn delete_container(err: BackendError, name: &str) -> Error {
    if matches_any(&err, NO_SUCH_BUCKET_MARKERS) {
        Error::NotFound(name.to_string())
    } else if matches_any(&err, CONFLICT_MARKERS) {
        Error::Conflict(name.to_string())
    } else {
        backend_failure(err)
    }
}

pub fn upload(err: BackendError, container: &str) -> Error {
    if matches_any(&err, NO_SUCH_BUCKET_MARKERS) {
        return Error::NotFound(container.to_string());
    }
    backend_failure(err)
}

/// Shared by download and object delete
pub fn object_access(err: BackendError, container: &str, key: &str) -> Error {
    if matches_any(&err, NO_SUCH_BUCKET_MARKERS) {
        Error::NotFound(container.to_string())
    } else if matches_any(&err, NO_SUCH_KEY_MARKERS) {
        Error::NoSuchKey {
            container: container.to_string(),
            key: key.to_string(),
        }
    } else {
        backend_failure(err)
    }
}

pub fn download(err: BackendError, container: &str, key: &str) -> Error {
    object_access(err, container, key)
}

pub fn delete_object(err: BackendError, container: &str, key: &str) -> Error {
    object_access(err, container, key)
}

pub fn list_objects(err: BackendError, container: &str) -> Error {
    if matches_any(&err, NO_SUCH_BUCKET_MARKERS) {
        return Error::NotFound(container.to_string());
    }
    backend_failure(err)
}
