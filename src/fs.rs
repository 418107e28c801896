//! Filesystem probes
//!
//! Stat failures other than "not found" are logged and reported as absent.

use std::fs::Metadata;
use std::io::ErrorKind;
use std::path::Path;
use tracing::warn;

fn stat(path: &Path) -> Option<Metadata> {
    match std::fs::metadata(path) {
        Ok(meta) => Some(meta),
        Err(e) if e.kind() == ErrorKind::NotFound => None,
        Err(e) => {
            warn!("unknown error while checking if {} exists: {}", path.display(), e);
            None
        }
    }
}

/// Check if `path` exists and is not a directory
pub fn is_file(path: impl AsRef<Path>) -> bool {
    stat(path.as_ref()).is_some_and(|m| !m.is_dir())
}

/// Check if `path` exists and is a directory
pub fn is_dir(path: impl AsRef<Path>) -> bool {
    stat(path.as_ref()).is_some_and(|m| m.is_dir())
}

/// Check if anything exists at `path`
pub fn path_exists(path: impl AsRef<Path>) -> bool {
    stat(path.as_ref()).is_some()
}
