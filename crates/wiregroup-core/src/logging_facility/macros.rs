//! Canonical logging macros
//!
//! Every pipeline stage brackets its work with a start and an end (or
//! end_error) event so a run can be reconstructed from its log. Extra
//! `tracing` fields may follow the required arguments.

/// Log the start of an operation
///
/// ```
/// # use wiregroup_core::log_op_start;
/// log_op_start!("group_slot");
/// log_op_start!("group_slot", slot = "c2s.handshaking.set_protocol");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr $(, $($field:tt)*)?) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_START,
            $($($field)*)?
        )
    };
}

/// Log the successful end of an operation
///
/// ```
/// # use wiregroup_core::log_op_end;
/// log_op_end!("deduplicate", duration_ms = 3);
/// log_op_end!("deduplicate", duration_ms = 3, alias_count = 1);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_END,
            duration_ms = $duration,
            $($($field)*)?
        )
    };
}

/// Log the failed end of an operation
///
/// `$err` is cloned and converted into `ExError`, so both `ExError` and
/// `WireGroupError` values are accepted.
///
/// ```
/// # use wiregroup_core::{log_op_error, errors::WireGroupError};
/// let err = WireGroupError::MissingBaseVersion { min_version: 5 };
/// log_op_error!("deduplicate", err, duration_ms = 1);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {{
        let logged: $crate::errors::ExError = ($err).clone().into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err.kind = ?logged.kind(),
            err.code = logged.code(),
            $($($field)*)?
        )
    }};
}
