//! Structured logging for wiregroup runs
//!
//! Public operations (`deduplicate`, `group_slot`, `load_corpus`, `run`,
//! `untracked_packets`) report themselves through `log_op_start!`,
//! `log_op_end!` and `log_op_error!` so start, end and failure events share
//! the field names in `wiregroup_core_types::schema`. The binary picks a
//! [`Profile`] once at startup:
//!
//! ```rust
//! use wiregroup_core::logging_facility::{init, Profile};
//!
//! init(Profile::Production);
//! ```
//!
//! Tests install [`init_test_capture`] instead and assert on the recorded
//! events.

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
