use crate::errors::{Result, WireGroupError};
use serde::{Deserialize, Serialize};

/// Packet direction, named from the server's point of view
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Client to server (`toServer` in the documents)
    C2S,
    /// Server to client (`toClient` in the documents)
    S2C,
}

impl Direction {
    pub const ALL: [Direction; 2] = [Direction::C2S, Direction::S2C];

    /// Short name used in slot keys, manifests and artifact paths
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::C2S => "c2s",
            Direction::S2C => "s2c",
        }
    }

    /// Key of this direction inside a state of a spec document
    pub fn doc_key(self) -> &'static str {
        match self {
            Direction::C2S => "toServer",
            Direction::S2C => "toClient",
        }
    }

    /// Parse `c2s` / `s2c` (case-insensitive)
    ///
    /// # Errors
    ///
    /// Returns `WireGroupError::UnknownDirection` for any other input.
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "c2s" => Ok(Direction::C2S),
            "s2c" => Ok(Direction::S2C),
            _ => Err(WireGroupError::UnknownDirection {
                direction: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
