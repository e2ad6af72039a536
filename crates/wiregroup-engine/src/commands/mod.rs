//! Command orchestration layer.
//!
//! Each command coordinates core grouping logic with the store adapters.

pub mod check;
pub mod generator;
pub mod run;
pub mod untracked;
