//! WireGroup Engine - Orchestration layer
//!
//! Coordinates the grouping core with the filesystem adapters: one run
//! deduplicates the corpus, groups every configured slot, builds the
//! manifest and dispatches generation for group representatives.

pub mod commands;

pub use commands::check::{check_manifest, ManifestStatus};
pub use commands::generator::{CommandGenerator, GENERATOR_KEY_ENV};
pub use commands::run::{
    compute_manifest, compute_manifest_with, run_pipeline, ComputedManifest, RunOutcome, RunReport,
};
pub use commands::untracked::{untracked_packets, UntrackedPacket};
