#![allow(clippy::unwrap_used, clippy::expect_used)]

use trustlens_core::errors::{ExError, ExErrorKind, TrustLensError};
use trustlens_core::logging_facility::test_capture::init_test_capture;
use trustlens_core::{log_op_end, log_op_error, log_op_start};
use trustlens_core::logging_facility::{EVENT_END, EVENT_END_ERROR, EVENT_START};

#[test]
fn test_log_op_start_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_start_unique_1";

    log_op_start!(op_name);

    capture.assert_event_exists(op_name, EVENT_START);
}

#[test]
fn test_log_op_end_records_duration() {
    let capture = init_test_capture();
    let op_name = "test_log_op_end_unique_2";

    log_op_end!(op_name, duration_ms = 42);

    let events = capture.events_for_op(op_name);
    let end_events: Vec<_> = events
        .iter()
        .filter(|e| e.event.as_deref() == Some(EVENT_END))
        .collect();
    assert_eq!(end_events.len(), 1, "Should have exactly one end event");
    assert_eq!(end_events[0].field("duration_ms"), Some("42"));
}

#[test]
fn test_log_op_error_includes_code() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_3";

    let err = TrustLensError::CycleDetected {
        node_id: "node-2".to_string(),
    };
    log_op_error!(op_name, err, duration_ms = 10);

    let events = capture.events_for_op(op_name);
    let error_event = events
        .iter()
        .find(|e| e.event.as_deref() == Some(EVENT_END_ERROR))
        .expect("error event");
    assert_eq!(error_event.field("err_code"), Some("ERR_CYCLE_DETECTED"));
}

#[test]
fn test_log_op_error_accepts_ex_error() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_4";

    let err = ExError::new(ExErrorKind::LayoutFailed).with_message("boom");
    log_op_error!(op_name, err, duration_ms = 1, node_count = 3);

    let events = capture.events_for_op(op_name);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].field("err_code"), Some("ERR_LAYOUT_FAILED"));
    assert_eq!(events[0].field("err_message"), Some("boom"));
    assert_eq!(events[0].field("node_count"), Some("3"));
}

#[test]
fn test_boundary_ownership_single_start_end() {
    let capture = init_test_capture();
    let op_name = "test_boundary_ownership_unique_5";

    log_op_start!(op_name, show_unchanged = true);
    log_op_end!(op_name, duration_ms = 7);

    let trace = capture.boundary(op_name);
    assert_eq!((trace.starts, trace.ends, trace.errors), (1, 1, 0));
    assert!(trace.is_balanced());
}

#[test]
fn test_log_op_error_records_diff_path() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_path_unique_6";

    let err = TrustLensError::DepthLimitExceeded {
        path: "$.roles.a".to_string(),
        limit: 512,
    };
    log_op_start!(op_name);
    log_op_error!(op_name, err, duration_ms = 2);

    let events = capture.events_for_op(op_name);
    let error_event = events
        .iter()
        .find(|e| e.is(op_name, EVENT_END_ERROR))
        .expect("error event");
    assert_eq!(error_event.field("err_code"), Some("ERR_INTERNAL"));
    assert_eq!(error_event.field("err_path"), Some("$.roles.a"));
    assert!(capture.boundary(op_name).is_balanced());
}

#[test]
fn test_error_without_path_omits_field() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_nopath_unique_7";

    log_op_error!(op_name, TrustLensError::NoComparisonSelected, duration_ms = 0);

    let events = capture.events_for_op(op_name);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].field("err_path"), None);
}
