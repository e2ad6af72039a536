//! On-disk slot configuration schema
//!
//! ```toml
//! min_version = 5
//! max_version = 769
//! types = ["tags", "s2c.play.spawn_info"]
//!
//! [packets.c2s]
//! handshaking = ["set_protocol"]
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Slot configuration as written by the operator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SlotConfigFile {
    /// Lowest protocol version to consider
    pub min_version: u32,

    /// Highest protocol version to consider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_version: Option<u32>,

    /// Tracked shared types: `name` or `direction.state.name`
    #[serde(default)]
    pub types: Vec<String>,

    /// direction → state → packet names
    #[serde(default)]
    pub packets: BTreeMap<String, BTreeMap<String, Vec<String>>>,
}
