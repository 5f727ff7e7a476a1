//! Error types for Weft
//!
//! Uses `thiserror` for library errors; `anyhow` is reserved for the binary.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Weft operations
pub type WeftResult<T> = Result<T, WeftError>;

/// Main error type for Weft operations
#[derive(Error, Debug)]
pub enum WeftError {
    /// Template file name does not follow the `<name>.<format>.<media>`
    /// convention, so its output path cannot be derived
    #[error("template name '{file}' does not follow <name>.<format>.<media> - expected at least 3 dot-separated segments")]
    Mapping { file: String },

    /// The external template compiler failed
    #[error("template compilation failed: {message}")]
    Compile { message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Build snapshot could not be written
    #[error("failed to write build snapshot {path}: {message}")]
    Snapshot { path: PathBuf, message: String },

    /// Source directory does not exist or is not a directory
    #[error("source directory not found: {path}")]
    SourceDirNotFound { path: PathBuf },
}

impl WeftError {
    /// True for deletion targets that are already gone.
    ///
    /// The reconciler treats these as success so repeated runs stay idempotent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, WeftError::Io(e) if e.kind() == std::io::ErrorKind::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_mapping() {
        let err = WeftError::Mapping {
            file: "bad".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "template name 'bad' does not follow <name>.<format>.<media> - expected at least 3 dot-separated segments"
        );
    }

    #[test]
    fn test_error_display_compile() {
        let err = WeftError::Compile {
            message: "exit code 2".to_string(),
        };
        assert_eq!(err.to_string(), "template compilation failed: exit code 2");
    }

    #[test]
    fn test_is_not_found() {
        let gone = WeftError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "no such file",
        ));
        assert!(gone.is_not_found());

        let denied = WeftError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        assert!(!denied.is_not_found());
    }
}
