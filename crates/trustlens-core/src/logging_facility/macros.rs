//! Boundary logging macros
//!
//! A boundary is one engine-level operation such as `select`, `refresh` or
//! `tree`. It emits one `start` event and then exactly one `end` or
//! `end_error`. Every event carries `component` (the calling module), `op`
//! and `event`. Trailing `key = value` fields are passed to `tracing`
//! unchanged, so `%` and `?` sigils work as usual.
//!
//! Callers need `tracing` in their own dependencies.

/// Open a boundary
///
/// ```
/// # use trustlens_core::log_op_start;
/// log_op_start!("compare");
/// log_op_start!("refresh", show_unchanged = false, request_id = "r-1");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr $(, $($field:tt)+)?) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::logging_facility::EVENT_START
            $(, $($field)+)?
        )
    };
}

/// Close a boundary successfully; `duration_ms` is required
///
/// ```
/// # use trustlens_core::log_op_end;
/// log_op_end!("compare", duration_ms = 3);
/// log_op_end!("refresh", duration_ms = 7, node_count = 12);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr $(, $($field:tt)+)?) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::logging_facility::EVENT_END,
            duration_ms = $duration
            $(, $($field)+)?
        )
    };
}

/// Close a boundary with an error
///
/// `$err` is anything convertible into
/// [`ExError`](crate::errors::ExError). Its kind, code and message are
/// recorded, plus the diff path when the error carries one.
///
/// ```
/// # use trustlens_core::log_op_error;
/// # use trustlens_core::errors::{ExError, ExErrorKind};
/// let err = ExError::new(ExErrorKind::ComparisonFailed).with_path("$.roles");
/// log_op_error!("select", err, duration_ms = 1);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr $(, $($field:tt)+)?) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::logging_facility::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?ex_err.kind(),
            err_code = ex_err.code(),
            err_message = ex_err.message(),
            err_path = ex_err.path()
            $(, $($field)+)?
        );
    }};
}
