//! Names shared by the logging macros and the log consumers
//!
//! The macros spell field names as identifiers (`tracing` requires that);
//! these constants are what readers of the output match against.

/// Module that emitted a boundary event
pub const FIELD_COMPONENT: &str = "component";
/// Boundary operation (`select`, `refresh`, `tree`, ...)
pub const FIELD_OP: &str = "op";
/// One of [`EVENT_START`], [`EVENT_END`], [`EVENT_END_ERROR`]
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_REQUEST_ID: &str = "request_id";
/// Stable `ERR_*` code of a failed boundary
pub const FIELD_ERR_CODE: &str = "err_code";
/// Diff path a failure was raised at, when known
pub const FIELD_ERR_PATH: &str = "err_path";

pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
