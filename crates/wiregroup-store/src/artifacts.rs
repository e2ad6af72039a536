//! Filesystem artifact store
//!
//! One file per (slot, representative version) under a root directory.
//! File existence is the memo: a present file is never rewritten.

#![allow(clippy::result_large_err)]

use std::path::{Path, PathBuf};

use wiregroup_core::dispatch::{ArtifactHandle, ArtifactKey, ArtifactMemo};
use wiregroup_core::errors::ExError;

use crate::atomic::atomic_write;

#[derive(Debug, Clone)]
pub struct FsArtifactStore {
    root: PathBuf,
}

impl FsArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute location of an artifact, whether or not it exists
    pub fn path_for(&self, key: &ArtifactKey) -> PathBuf {
        self.root.join(key.relative_path())
    }

    fn handle(&self, key: &ArtifactKey) -> ArtifactHandle {
        ArtifactHandle {
            key: key.clone(),
            location: self.path_for(key).display().to_string(),
        }
    }
}

impl ArtifactMemo for FsArtifactStore {
    fn lookup(&self, key: &ArtifactKey) -> Result<Option<ArtifactHandle>, ExError> {
        if self.path_for(key).is_file() {
            Ok(Some(self.handle(key)))
        } else {
            Ok(None)
        }
    }

    fn record(&mut self, key: &ArtifactKey, source: &str) -> Result<ArtifactHandle, ExError> {
        let path = self.path_for(key);
        if !path.is_file() {
            atomic_write(&path, source.as_bytes())?;
            tracing::debug!(path = %path.display(), "artifact written");
        }
        Ok(self.handle(key))
    }
}
