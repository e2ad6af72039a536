//! WireGroup Core - protocol version equivalence engine
//!
//! This crate decides, for every tracked packet and shared type, which
//! protocol versions share an identical wire definition:
//! - Version corpus model and slot registry
//! - Spec tree accessor over the per-version JSON documents
//! - Whole-document deduplication into an alias table
//! - Recursive structural equivalence with tracked type resolution
//! - Per-slot grouping with wire id buckets
//! - Deterministic manifest emission and digest
//! - Generation dispatch behind the `ArtifactMemo` and `SourceGenerator` seams

#![allow(clippy::result_large_err)]

pub mod accessor;
pub mod dedup;
pub mod dispatch;
pub mod equivalence;
pub mod errors;
pub mod grouping;
pub mod logging_facility;
pub mod manifest;
pub mod model;
pub mod naming;

pub use wiregroup_core_types as core_types;

// Re-export commonly used types
pub use accessor::SpecView;
pub use dedup::{deduplicate, Deduplicated};
pub use dispatch::{
    dispatch_groups, ArtifactHandle, ArtifactKey, ArtifactMemo, DispatchOutcome, DispatchRecord,
    GenerationRequest, InMemoryArtifactMemo, SourceGenerator,
};
pub use equivalence::{Equivalence, EquivalenceChecker};
pub use errors::{ExError, ExErrorKind, Result, WireGroupError};
pub use grouping::{group_slot, EquivalenceGroup, SlotGroups};
pub use manifest::{build_manifest, manifest_digest, render_manifest, Manifest, ManifestGroup};
pub use model::{
    AliasTable, Direction, PacketSlot, ProtocolVersion, Slot, SlotRegistry, SpecDocument,
    TypeScope, TypeSlot, VersionCorpus, WireId,
};
