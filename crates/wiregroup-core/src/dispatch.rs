//! Generation dispatch
//!
//! Issues one generation request per group, for the representative
//! version only, and only when no artifact exists yet. The memo table and
//! the generator are both seams: the filesystem store and an external
//! command are the production implementations.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;
use serde_json::Value;

use crate::accessor::SpecView;
use crate::core_types::schema::EVENT_GAP;
use crate::errors::{ExError, ExErrorKind, WireGroupError};
use crate::grouping::SlotGroups;
use crate::model::{ProtocolVersion, Slot, TypeScope, VersionCorpus};

/// Identity of one generated artifact: a slot at a representative version
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ArtifactKey {
    pub slot: Slot,
    pub version: ProtocolVersion,
}

impl ArtifactKey {
    pub fn new(slot: Slot, version: ProtocolVersion) -> Self {
        Self { slot, version }
    }

    /// Path of the artifact relative to the artifact root
    ///
    /// - packets: `<direction>/<state>/<packet>/v<N>.rs`
    /// - common types: `types/<name>/v<N>.rs`
    /// - scoped types: `types/<direction>/<state>/<name>/v<N>.rs`
    pub fn relative_path(&self) -> PathBuf {
        let mut path = PathBuf::new();
        match &self.slot {
            Slot::Packet(p) => {
                path.push(p.direction.as_str());
                path.push(&p.state);
                path.push(&p.packet);
            }
            Slot::Type(t) => {
                path.push("types");
                if let TypeScope::Scoped { direction, state } = &t.scope {
                    path.push(direction.as_str());
                    path.push(state);
                }
                path.push(&t.name);
            }
        }
        path.push(format!("v{}.rs", self.version));
        path
    }
}

/// Where an existing artifact lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactHandle {
    pub key: ArtifactKey,
    pub location: String,
}

/// Memo table of already generated artifacts
///
/// Existence is the sole memoization key: a recorded artifact is never
/// regenerated.
pub trait ArtifactMemo {
    /// # Errors
    ///
    /// Implementations fail when the backing storage cannot be read.
    fn lookup(&self, key: &ArtifactKey) -> Result<Option<ArtifactHandle>, ExError>;

    /// Persist generated source verbatim
    ///
    /// # Errors
    ///
    /// Implementations fail when the backing storage cannot be written.
    fn record(&mut self, key: &ArtifactKey, source: &str) -> Result<ArtifactHandle, ExError>;
}

/// One request to the external generator
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationRequest {
    /// Packet or type name
    pub name: String,
    /// Full slot label, e.g. `c2s.handshaking.set_protocol`
    pub slot: String,
    pub version: u32,
    /// Resolved definition subtree
    pub spec: Value,
}

/// Turns a specification subtree into source text
pub trait SourceGenerator {
    /// # Errors
    ///
    /// Any failure is reported as a gap, never aborts a run.
    fn generate(&self, request: &GenerationRequest) -> Result<String, ExError>;
}

/// What happened to one group
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// Artifact already present; generator not invoked
    Existing(ArtifactHandle),
    /// Artifact generated and recorded during this run
    Generated(ArtifactHandle),
    /// Generation unavailable, failed or empty
    Gap { kind: ExErrorKind, reason: String },
}

impl DispatchOutcome {
    pub fn is_gap(&self) -> bool {
        matches!(self, DispatchOutcome::Gap { .. })
    }

    pub fn is_generated(&self) -> bool {
        matches!(self, DispatchOutcome::Generated(_))
    }
}

/// Dispatch outcome of one group
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchRecord {
    pub key: ArtifactKey,
    pub outcome: DispatchOutcome,
}

/// Ensure an artifact exists for every group representative
///
/// # Errors
///
/// Fails only when the memo table cannot be read or written, or when a
/// representative's definition cannot be resolved. Generation problems
/// are recorded as gaps.
pub fn dispatch_groups(
    corpus: &VersionCorpus,
    slot_groups: &[SlotGroups],
    memo: &mut dyn ArtifactMemo,
    generator: Option<&dyn SourceGenerator>,
) -> Result<Vec<DispatchRecord>, ExError> {
    let mut records = Vec::new();

    for entry in slot_groups {
        for group in &entry.groups {
            let key = ArtifactKey::new(entry.slot.clone(), group.representative());
            let outcome = dispatch_one(corpus, &key, memo, generator)?;

            if let DispatchOutcome::Gap { kind, reason } = &outcome {
                tracing::warn!(
                    op = "dispatch_groups",
                    event = EVENT_GAP,
                    slot = %key.slot,
                    version = key.version.get(),
                    err.code = kind.code(),
                    reason = %reason,
                    "artifact not generated"
                );
            }
            records.push(DispatchRecord { key, outcome });
        }
    }

    Ok(records)
}

fn dispatch_one(
    corpus: &VersionCorpus,
    key: &ArtifactKey,
    memo: &mut dyn ArtifactMemo,
    generator: Option<&dyn SourceGenerator>,
) -> Result<DispatchOutcome, ExError> {
    if let Some(handle) = memo.lookup(key)? {
        return Ok(DispatchOutcome::Existing(handle));
    }

    let Some(generator) = generator else {
        let err: ExError = WireGroupError::GenerationUnavailable {
            slot: key.slot.label(),
            version: key.version.get(),
        }
        .into();
        return Ok(gap(err));
    };

    let doc = corpus.get(key.version).ok_or_else(|| {
        ExError::new(ExErrorKind::Internal)
            .with_slot(key.slot.label())
            .with_version(key.version.get())
            .with_message("representative is not part of the corpus")
    })?;
    let spec = SpecView::new(key.version, doc)
        .slot_spec(&key.slot)
        .map_err(ExError::from)?
        .ok_or_else(|| {
            ExError::new(ExErrorKind::Internal)
                .with_slot(key.slot.label())
                .with_version(key.version.get())
                .with_message("representative does not define the slot")
        })?;

    let request = GenerationRequest {
        name: key.slot.name().to_string(),
        slot: key.slot.label(),
        version: key.version.get(),
        spec: spec.clone(),
    };

    match generator.generate(&request) {
        Ok(source) if source.trim().is_empty() => Ok(gap(WireGroupError::GenerationFailed {
            slot: request.slot,
            version: request.version,
            reason: "generator returned an empty response".to_string(),
        }
        .into())),
        Ok(source) => Ok(DispatchOutcome::Generated(memo.record(key, &source)?)),
        Err(err) => Ok(gap(err)),
    }
}

fn gap(err: ExError) -> DispatchOutcome {
    DispatchOutcome::Gap {
        kind: err.kind(),
        reason: err.to_string(),
    }
}

/// In-memory memo table
#[derive(Debug, Default)]
pub struct InMemoryArtifactMemo {
    artifacts: BTreeMap<ArtifactKey, String>,
}

impl InMemoryArtifactMemo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn source(&self, key: &ArtifactKey) -> Option<&str> {
        self.artifacts.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }
}

impl ArtifactMemo for InMemoryArtifactMemo {
    fn lookup(&self, key: &ArtifactKey) -> Result<Option<ArtifactHandle>, ExError> {
        Ok(self.artifacts.get(key).map(|_| ArtifactHandle {
            key: key.clone(),
            location: format!("memory:{}", key.relative_path().display()),
        }))
    }

    fn record(&mut self, key: &ArtifactKey, source: &str) -> Result<ArtifactHandle, ExError> {
        self.artifacts.insert(key.clone(), source.to_string());
        Ok(ArtifactHandle {
            key: key.clone(),
            location: format!("memory:{}", key.relative_path().display()),
        })
    }
}
