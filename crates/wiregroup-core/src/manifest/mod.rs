//! Equivalence manifest emission.
//!
//! The manifest is the persisted record a downstream code generator reads
//! to emit one implementation per group of equivalent versions.
//!
//! ## Responsibilities
//!
//! - Merge per-slot groups with the alias table (`emit`)
//! - Render the deterministic TOML document (`render`)
//! - Compute the manifest digest for change detection (`digest`)
//!
//! ## Non-Responsibilities
//!
//! - Persistence (handled by `wiregroup-store`)
//! - Orchestration (handled by `wiregroup-engine`)

pub mod digest;
pub mod emit;
pub mod model;
pub mod render;

pub use digest::manifest_digest;
pub use emit::build_manifest;
pub use model::{Manifest, ManifestGroup};
pub use render::{render_manifest, MANIFEST_HEADER};
