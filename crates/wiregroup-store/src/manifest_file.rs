//! Manifest file access

#![allow(clippy::result_large_err)]

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::atomic::atomic_write;
use crate::errors::{io_error, Result};

/// Replace the manifest at `path` atomically
///
/// # Errors
///
/// Fails when the parent directory cannot be created or the file cannot
/// be written or renamed into place.
pub fn write_manifest(path: &Path, text: &str) -> Result<()> {
    atomic_write(path, text.as_bytes())?;
    tracing::info!(path = %path.display(), bytes = text.len(), "manifest written");
    Ok(())
}

/// Read the manifest at `path`, `None` when it does not exist yet
///
/// # Errors
///
/// Fails on any read error other than a missing file.
pub fn read_manifest(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(io_error("read_manifest", e)),
    }
}
