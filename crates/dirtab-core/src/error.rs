//! Error types for scanning operations.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that stop a directory enumeration.
///
/// A scan that hits one of these keeps whatever entries it had already
/// collected and reports itself as partial.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Permission denied for a path.
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// Path not found.
    #[error("Path not found: {path}")]
    NotFound { path: PathBuf },

    /// Path exists but is not a directory.
    #[error("Not a directory: {path}")]
    NotADirectory { path: PathBuf },

    /// Generic I/O error.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ScanError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            std::io::ErrorKind::NotADirectory => Self::NotADirectory { path },
            _ => Self::Io { path, source },
        }
    }

    /// The path the enumeration failed on.
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::PermissionDenied { path }
            | Self::NotFound { path }
            | Self::NotADirectory { path }
            | Self::Io { path, .. } => path,
        }
    }
}

/// Kind of scan warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarningKind {
    /// The entry's type could not be determined; it was listed as a file.
    TypeCheckFailed,
    /// The file's size could not be read; it was listed as "Unknown".
    MetadataError,
}

/// Non-fatal problem with a single entry. The entry is still listed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanWarning {
    /// Path where the warning occurred.
    pub path: PathBuf,
    /// Human-readable message.
    pub message: String,
    /// Kind of warning.
    pub kind: WarningKind,
}

impl ScanWarning {
    /// Create a new scan warning.
    pub fn new(path: impl Into<PathBuf>, message: impl Into<String>, kind: WarningKind) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            kind,
        }
    }

    /// Create a warning for a failed directory/file type check.
    pub fn type_check_failed(path: impl Into<PathBuf>, error: &std::io::Error) -> Self {
        Self::new(path, format!("Type check failed: {error}"), WarningKind::TypeCheckFailed)
    }

    /// Create a warning for an unreadable file size.
    pub fn metadata_error(path: impl Into<PathBuf>, error: &std::io::Error) -> Self {
        Self::new(path, format!("Metadata error: {error}"), WarningKind::MetadataError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_error_io() {
        let err = ScanError::io(
            "/test/path",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(matches!(err, ScanError::PermissionDenied { .. }));
        assert_eq!(err.path(), std::path::Path::new("/test/path"));

        let err = ScanError::io("/gone", std::io::Error::from(std::io::ErrorKind::NotFound));
        assert!(matches!(err, ScanError::NotFound { .. }));

        let err = ScanError::io("/odd", std::io::Error::other("boom"));
        assert!(matches!(err, ScanError::Io { .. }));
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn test_scan_warning_creation() {
        let error = std::io::Error::from(std::io::ErrorKind::PermissionDenied);
        let warning = ScanWarning::metadata_error("/test/file", &error);
        assert_eq!(warning.kind, WarningKind::MetadataError);
        assert!(warning.message.starts_with("Metadata error"));

        let warning = ScanWarning::type_check_failed("/test/file", &error);
        assert_eq!(warning.kind, WarningKind::TypeCheckFailed);
    }
}
