//! Core types shared across wiregroup facilities
//!
//! This crate provides foundational types used by both error handling
//! and logging facilities:
//!
//! - **Correlation**: `RunId` attached to every pipeline run
//! - **Sensitive data**: `Sensitive<T>` marker for generator credentials
//! - **Schema constants**: Canonical field keys and event names

pub mod correlation;
pub mod schema;
pub mod sensitive;

pub use correlation::RunId;
pub use sensitive::Sensitive;
