//! Canonical schema constants for structured logging and events
//!
//! These constants keep field names identical across the grouping engine,
//! the dispatcher and the CLI.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_RUN_ID: &str = "run_id";

// Corpus and slot identifiers
pub const FIELD_VERSION: &str = "version";
pub const FIELD_ALIAS_OF: &str = "alias_of";
pub const FIELD_SLOT: &str = "slot";
pub const FIELD_WIRE_ID: &str = "wire_id";
pub const FIELD_REPRESENTATIVE: &str = "representative";

// Collection sizes
pub const FIELD_VERSION_COUNT: &str = "version_count";
pub const FIELD_ALIAS_COUNT: &str = "alias_count";
pub const FIELD_SLOT_COUNT: &str = "slot_count";
pub const FIELD_GROUP_COUNT: &str = "group_count";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
pub const EVENT_GAP: &str = "gap";
