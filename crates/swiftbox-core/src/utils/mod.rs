//! Utility functions

use std::path::Path;

/// Base name of a local path, used as the object name on upload
pub fn object_name_from_path(path: &Path) -> Option<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .filter(|name| !name.is_empty())
}
