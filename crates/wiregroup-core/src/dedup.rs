//! Version corpus deduplication
//!
//! Collapses every version whose whole document equals an earlier kept
//! version into an alias of that version.

use crate::errors::{Result, WireGroupError};
use crate::model::{AliasTable, ProtocolVersion, VersionCorpus};
use crate::{log_op_end, log_op_error, log_op_start};

/// Output of [`deduplicate`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Deduplicated {
    /// Documents not equal to any earlier kept one
    pub corpus: VersionCorpus,
    /// Dropped version → earliest kept version with an equal document
    pub aliases: AliasTable,
    /// Every version in the configured range, kept or aliased, ascending
    pub considered: Vec<ProtocolVersion>,
}

/// Deduplicate a corpus within `[min_version, max_version]`
///
/// Versions below `min_version` only prove that the range has a base;
/// versions above `max_version` are dropped.
///
/// # Errors
///
/// Returns `MissingBaseVersion` when no version at or below `min_version`
/// exists.
pub fn deduplicate(
    corpus: &VersionCorpus,
    min_version: ProtocolVersion,
    max_version: Option<ProtocolVersion>,
) -> Result<Deduplicated> {
    log_op_start!("deduplicate", version_count = corpus.len());
    let start = std::time::Instant::now();

    let result = deduplicate_impl(corpus, min_version, max_version).map_err(|e| {
        log_op_error!(
            "deduplicate",
            e,
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!(
        "deduplicate",
        duration_ms = start.elapsed().as_millis() as u64,
        version_count = result.corpus.len(),
        alias_count = result.aliases.len()
    );

    Ok(result)
}

fn deduplicate_impl(
    corpus: &VersionCorpus,
    min_version: ProtocolVersion,
    max_version: Option<ProtocolVersion>,
) -> Result<Deduplicated> {
    if !corpus.versions().any(|v| v <= min_version) {
        return Err(WireGroupError::MissingBaseVersion {
            min_version: min_version.get(),
        });
    }

    let mut out = Deduplicated::default();
    let in_range = corpus
        .iter()
        .filter(|(v, _)| *v >= min_version && max_version.map_or(true, |max| *v <= max));

    for (version, document) in in_range {
        out.considered.push(version);

        let earlier = out
            .corpus
            .iter()
            .find(|(_, kept)| *kept == document)
            .map(|(kept_version, _)| kept_version);

        match earlier {
            Some(target) => {
                tracing::debug!(version = version.get(), alias_of = target.get(), "version aliased");
                out.aliases.insert(version, target);
            }
            None => {
                out.corpus.insert(version, document.clone());
            }
        }
    }

    Ok(out)
}
