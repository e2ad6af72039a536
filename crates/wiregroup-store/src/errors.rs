//! Error handling for wiregroup-store
//!
//! Wraps wiregroup-core ExError with store-specific helpers

use std::path::Path;

use wiregroup_core::errors::{ExError, ExErrorKind};

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create a slot configuration validation error
pub fn config_validation(reason: &str) -> ExError {
    ExError::new(ExErrorKind::InvalidConfig)
        .with_op("slot_config_parse")
        .with_message(reason.to_string())
}

/// Create a corpus read error naming the offending file
pub fn corpus_read(path: &Path, reason: &str) -> ExError {
    ExError::new(ExErrorKind::InvalidInput)
        .with_op("load_corpus")
        .with_message(format!("{}: {}", path.display(), reason))
}

/// Create an IO error
pub fn io_error(operation: &str, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Io)
        .with_op(operation.to_string())
        .with_message(err.to_string())
}
