//! Slot configuration parser with validation
//!
//! Parses TOML or YAML and validates directions, type paths, duplicate
//! slots and the version range.

#![allow(clippy::result_large_err)]

use std::fs;
use std::path::Path;

use wiregroup_core::errors::ExError;
use wiregroup_core::model::{Direction, PacketSlot, ProtocolVersion, Slot, SlotRegistry, TypeSlot};

use crate::config::format::SlotConfigFile;
use crate::errors::{config_validation, Result};

/// Serialization format of a slot configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Yaml,
}

impl ConfigFormat {
    /// Pick the format from a file extension (`toml`, `yaml`, `yml`)
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
            "toml" => Some(ConfigFormat::Toml),
            "yaml" | "yml" => Some(ConfigFormat::Yaml),
            _ => None,
        }
    }
}

/// Validated slot configuration
#[derive(Debug, Clone)]
pub struct SlotConfig {
    pub min_version: ProtocolVersion,
    pub max_version: Option<ProtocolVersion>,
    pub registry: SlotRegistry,
}

/// Parse a slot configuration file, choosing the format by extension
///
/// # Errors
///
/// Fails with `InvalidConfig` when the extension is unknown, the file
/// cannot be read, or the contents do not validate.
pub fn parse_slot_config_file(path: &Path) -> Result<SlotConfig> {
    let format = ConfigFormat::from_path(path).ok_or_else(|| {
        config_validation(&format!(
            "Unsupported configuration file {}: expected .toml, .yaml or .yml",
            path.display()
        ))
    })?;
    let content = fs::read_to_string(path)
        .map_err(|e| config_validation(&format!("Failed to read {}: {}", path.display(), e)))?;

    parse_slot_config_str(&content, format)
}

/// Parse a slot configuration from a string
///
/// # Errors
///
/// Fails with `InvalidConfig` or `DuplicateSlot` when the contents do not
/// parse or validate.
pub fn parse_slot_config_str(content: &str, format: ConfigFormat) -> Result<SlotConfig> {
    let file: SlotConfigFile = match format {
        ConfigFormat::Toml => toml::from_str(content)
            .map_err(|e| config_validation(&format!("TOML parse error: {}", e)))?,
        ConfigFormat::Yaml => serde_yaml::from_str(content)
            .map_err(|e| config_validation(&format!("YAML parse error: {}", e)))?,
    };

    validate_config(file)
}

fn validate_config(file: SlotConfigFile) -> Result<SlotConfig> {
    if let Some(max) = file.max_version {
        if max < file.min_version {
            return Err(config_validation(&format!(
                "max_version {} is below min_version {}",
                max, file.min_version
            )));
        }
    }

    let with_op = |e: wiregroup_core::errors::WireGroupError| {
        ExError::from(e).with_op("slot_config_parse")
    };

    let mut slots = Vec::new();
    for path in &file.types {
        slots.push(Slot::Type(TypeSlot::parse(path).map_err(with_op)?));
    }
    for (direction, states) in &file.packets {
        let direction = Direction::parse(direction).map_err(with_op)?;
        for (state, packets) in states {
            for packet in packets {
                slots.push(Slot::Packet(PacketSlot::new(direction, state, packet)));
            }
        }
    }

    let registry = SlotRegistry::new(slots).map_err(with_op)?;

    Ok(SlotConfig {
        min_version: ProtocolVersion(file.min_version),
        max_version: file.max_version.map(ProtocolVersion),
        registry,
    })
}
