//! Error taxonomy shared by every sidekick operation.

use std::io;
use std::path::Path;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SidekickError>;

#[derive(Debug, Error)]
pub enum SidekickError {
    /// A session, file or blob that the caller referenced does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A file exists but cannot be read.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// A session id is already in use.
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// Out-of-range numbers, unknown enum strings and malformed regex queries.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A persisted blob could not be parsed.
    #[error("Storage corrupt: {0}")]
    StorageCorrupt(String),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

impl SidekickError {
    /// Stable machine-readable code for the transport layer.
    pub fn code(&self) -> &'static str {
        match self {
            SidekickError::NotFound(_) => "NOT_FOUND",
            SidekickError::PermissionDenied(_) => "PERMISSION_DENIED",
            SidekickError::AlreadyExists(_) => "ALREADY_EXISTS",
            SidekickError::InvalidArgument(_) => "INVALID_ARGUMENT",
            SidekickError::StorageCorrupt(_) => "STORAGE_CORRUPT",
            SidekickError::Io(_) => "IO_ERROR",
            SidekickError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        SidekickError::InvalidArgument(message.into())
    }

    /// Map an I/O failure on `path` into the taxonomy by error kind.
    pub fn from_file_io(err: io::Error, path: &Path) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => {
                SidekickError::NotFound(format!("File not found: {}", path.display()))
            }
            io::ErrorKind::PermissionDenied => {
                SidekickError::PermissionDenied(format!("Cannot read file: {}", path.display()))
            }
            _ => SidekickError::Io(err),
        }
    }

    /// True for the failures that must stop the owning session.
    pub fn is_file_access_failure(&self) -> bool {
        matches!(
            self,
            SidekickError::NotFound(_) | SidekickError::PermissionDenied(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_kind_mapping() {
        let path = Path::new("/var/log/session.log");

        let err = SidekickError::from_file_io(io::Error::from(io::ErrorKind::NotFound), path);
        assert!(matches!(err, SidekickError::NotFound(_)));
        assert!(err.to_string().contains("/var/log/session.log"));

        let err =
            SidekickError::from_file_io(io::Error::from(io::ErrorKind::PermissionDenied), path);
        assert!(matches!(err, SidekickError::PermissionDenied(_)));
        assert!(err.is_file_access_failure());

        let err = SidekickError::from_file_io(io::Error::from(io::ErrorKind::Interrupted), path);
        assert!(matches!(err, SidekickError::Io(_)));
        assert!(!err.is_file_access_failure());
    }

    #[test]
    fn test_codes() {
        assert_eq!(SidekickError::invalid("x").code(), "INVALID_ARGUMENT");
        assert_eq!(
            SidekickError::AlreadyExists("s1".to_string()).code(),
            "ALREADY_EXISTS"
        );
        assert_eq!(
            SidekickError::StorageCorrupt("bad".to_string()).code(),
            "STORAGE_CORRUPT"
        );
    }
}
