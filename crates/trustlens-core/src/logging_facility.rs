//! Structured logging for the TrustLens pipeline
//!
//! The binary calls [`init`] once with a [`Profile`]. Engine operations wrap
//! their work in `log_op_start!` / `log_op_end!` / `log_op_error!` so that
//! each `select`, `refresh` or `tree` call leaves a start event and a single
//! closing event. Core modules stay below that level and emit
//! `tracing::debug!` detail only (compared objects, emitted nodes, layout
//! ranks).
//!
//! ```rust
//! use trustlens_core::logging_facility::{init, Profile};
//!
//! init(Profile::Production);
//! ```

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{active_profile, init, Profile};
pub use test_capture::{init_test_capture, BoundaryTrace, CapturedEvent, TestCapture};
pub use trustlens_core_types::schema::{EVENT_END, EVENT_END_ERROR, EVENT_START};
