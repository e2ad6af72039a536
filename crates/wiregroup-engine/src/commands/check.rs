//! Manifest staleness check.

#![allow(clippy::result_large_err)]

use wiregroup_core::{manifest_digest, VersionCorpus};
use wiregroup_store::{Result, SlotConfig};

use crate::commands::run::compute_manifest;

/// Whether an on-disk manifest matches the one the inputs produce
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestStatus {
    UpToDate { digest: String },
    /// `found` is `None` when there is no manifest yet
    Stale {
        expected: String,
        found: Option<String>,
    },
}

impl ManifestStatus {
    pub fn is_stale(&self) -> bool {
        matches!(self, ManifestStatus::Stale { .. })
    }
}

/// Recompute the manifest and compare digests with `on_disk`
///
/// # Errors
///
/// Everything [`compute_manifest`] rejects.
pub fn check_manifest(
    corpus: &VersionCorpus,
    config: &SlotConfig,
    on_disk: Option<&str>,
) -> Result<ManifestStatus> {
    let computed = compute_manifest(corpus, config)?;
    let found = on_disk.map(manifest_digest);

    if found.as_deref() == Some(computed.digest.as_str()) {
        Ok(ManifestStatus::UpToDate {
            digest: computed.digest,
        })
    } else {
        tracing::info!(
            op = "check_manifest",
            expected = %computed.digest,
            found = ?found,
            "manifest is stale"
        );
        Ok(ManifestStatus::Stale {
            expected: computed.digest,
            found,
        })
    }
}
