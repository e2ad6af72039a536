//! Run correlation
//!
//! Every pipeline run carries a `RunId` so that log lines emitted while
//! grouping slots and dispatching generation requests can be tied back
//! to a single invocation.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of one pipeline run, a time-ordered UUIDv7
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(String);

impl RunId {
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<String> for RunId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
