//! WireGroup Store - filesystem adapters around the grouping core
//!
//! Provides:
//! - Corpus loader for a minecraft-data style `data/pc` directory
//! - Slot configuration parser (TOML or YAML) with validation
//! - Filesystem artifact store implementing `ArtifactMemo`
//! - Atomic manifest file writes

pub mod artifacts;
pub mod atomic;
pub mod config;
pub mod corpus;
pub mod errors;
pub mod manifest_file;

// Re-export key types
pub use artifacts::FsArtifactStore;
pub use config::{parse_slot_config_file, parse_slot_config_str, ConfigFormat, SlotConfig};
pub use corpus::{load_corpus, CorpusFilter, LoadedCorpus, SkipReason};
pub use errors::Result;
pub use manifest_file::{read_manifest, write_manifest};
