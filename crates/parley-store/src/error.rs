//! Profile store error types.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors from profile store operations.
///
/// `PermissionDenied` is the one failure callers treat as "no profile
/// available" rather than a hard error.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store refused access to the document.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// The identity ID cannot be used as a document key.
    #[error("invalid document key: {0:?}")]
    InvalidKey(String),

    /// A write would produce a document violating the layout.
    #[error("invalid profile document: {0}")]
    InvalidDocument(String),

    /// Filesystem failure other than a permission problem.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A stored document could not be parsed or written.
    #[error("malformed document {}: {source}", path.display())]
    Serialization {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The store cannot be reached at all.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    #[must_use]
    pub const fn is_permission_denied(&self) -> bool {
        matches!(self, Self::PermissionDenied(_))
    }

    /// Map an I/O error, routing permission failures to `PermissionDenied`.
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::PermissionDenied {
            Self::PermissionDenied(format!("{}: {source}", path.display()))
        } else {
            Self::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_permission_error_becomes_permission_denied() {
        let err = StoreError::io(
            Path::new("/data/users/uid-1.json"),
            std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        );
        assert!(err.is_permission_denied());
        assert!(err.to_string().contains("/data/users/uid-1.json"));
    }

    #[test]
    fn other_io_errors_stay_io() {
        let err = StoreError::io(
            Path::new("/data/users/uid-1.json"),
            std::io::Error::other("disk on fire"),
        );
        assert!(!err.is_permission_denied());
        assert!(matches!(err, StoreError::Io { .. }));
    }
}
