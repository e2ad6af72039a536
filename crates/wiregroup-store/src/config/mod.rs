//! Slot configuration
//!
//! Declares the version range and the tracked packets and types.

pub mod format;
pub mod parser;

pub use format::SlotConfigFile;
pub use parser::{parse_slot_config_file, parse_slot_config_str, ConfigFormat, SlotConfig};
