//! Result and error types for prettycov.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for report generation and viewing
pub type ReportResult<T> = Result<T, ReportError>;

/// Errors that can occur while building or loading a report payload
#[derive(Debug, Error)]
pub enum ReportError {
    /// A coverage tree accessor failed (unreadable source, missing file coverage)
    #[error("Failed to read coverage node {entity:?}: {message}")]
    TraversalAccess {
        /// Qualified name of the node, when known
        entity: String,
        /// Error message
        message: String,
    },

    /// Source text could not be compressed or restored
    #[error("Compression failed for {entity:?}: {message}")]
    Compression {
        /// Qualified name of the file
        entity: String,
        /// Error message
        message: String,
    },

    /// Writing to the output directory failed
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        /// Target path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Input coverage data breaks the statement/branch/function id invariants
    #[error("Invalid coverage for {path}: {message}")]
    InvalidCoverage {
        /// Source file path the coverage belongs to
        path: String,
        /// Error message
        message: String,
    },

    /// Two nodes produced the same entity
    #[error("Duplicate report entity {entity:?}")]
    DuplicateEntity {
        /// The repeated entity
        entity: String,
    },

    /// Payload is not a well-formed report sequence
    #[error("Malformed report payload: {message}")]
    Schema {
        /// Error message
        message: String,
    },

    /// No route exists for an address
    #[error("No report at {address}")]
    UnknownRoute {
        /// Requested address
        address: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ReportError {
    /// Create a traversal access error
    #[must_use]
    pub fn traversal(entity: impl Into<String>, message: impl Into<String>) -> Self {
        Self::TraversalAccess {
            entity: entity.into(),
            message: message.into(),
        }
    }

    /// Create a compression error
    #[must_use]
    pub fn compression(entity: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Compression {
            entity: entity.into(),
            message: message.into(),
        }
    }

    /// Create a write error for the given path
    #[must_use]
    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }

    /// Create an invalid coverage error
    #[must_use]
    pub fn invalid_coverage(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidCoverage {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a schema error
    #[must_use]
    pub fn schema(message: impl Into<String>) -> Self {
        Self::Schema {
            message: message.into(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_traversal_error_names_entity() {
        let err = ReportError::traversal("src/a.js", "permission denied");
        let msg = err.to_string();
        assert!(msg.contains("src/a.js"));
        assert!(msg.contains("permission denied"));
    }

    #[test]
    fn test_write_error_keeps_source() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err = ReportError::write("/out/loadcov.js", io_err);
        assert!(err.to_string().contains("/out/loadcov.js"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_duplicate_entity_message() {
        let err = ReportError::DuplicateEntity {
            entity: "lib".to_string(),
        };
        assert!(err.to_string().contains("\"lib\""));
    }

    #[test]
    fn test_io_error_from() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: ReportError = io_err.into();
        assert!(err.to_string().contains("I/O"));
    }
}
