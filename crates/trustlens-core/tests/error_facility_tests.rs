use serde_json::json;
use trustlens_core::diff::{compare, MAX_DIFF_DEPTH};
use trustlens_core::errors::{ExError, ExErrorKind, TrustLensError};
use trustlens_core::graph::{layout, Graph, LayoutConfig};

#[test]
fn test_depth_limit_surfaces_as_comparison_failed() {
    let mut old = json!("leaf");
    let mut new = json!("other");
    for _ in 0..=MAX_DIFF_DEPTH {
        old = json!({ "nested": old });
        new = json!({ "nested": new });
    }

    let err = compare(Some(&old), Some(&new)).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::ComparisonFailed);
    assert_eq!(err.code(), "ERR_COMPARISON_FAILED");
    assert_eq!(err.op(), Some("compare"));
    let cause = err.source_error().unwrap();
    assert!(cause.path().unwrap().starts_with("$.nested.nested"));
}

#[test]
fn test_graph_faults_verifiable_by_kind() {
    let cases = [
        (
            TrustLensError::CycleDetected {
                node_id: "node-1".to_string(),
            },
            ExErrorKind::CycleDetected,
        ),
        (
            TrustLensError::DanglingEdge {
                edge_id: "edge-node-0-node-9".to_string(),
                node_id: "node-9".to_string(),
            },
            ExErrorKind::DanglingEdge,
        ),
        (
            TrustLensError::DuplicateNode {
                node_id: "node-0".to_string(),
            },
            ExErrorKind::DuplicateNode,
        ),
        (TrustLensError::NoComparisonSelected, ExErrorKind::NoComparison),
    ];

    for (err, kind) in cases {
        let ex_err: ExError = err.into();
        assert_eq!(ex_err.kind(), kind);
        assert!(!ex_err.message().is_empty());
    }
}

#[test]
fn test_serde_error_converts() {
    let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let ex_err: ExError = TrustLensError::from(parse_err).into();
    assert_eq!(ex_err.kind(), ExErrorKind::Serialization);
    assert_eq!(ex_err.code(), "ERR_SERIALIZATION");
}

#[test]
fn test_error_kind_code_mapping() {
    let kinds = vec![
        (ExErrorKind::InvalidInput, "ERR_INVALID_INPUT"),
        (ExErrorKind::InvalidSnapshot, "ERR_INVALID_SNAPSHOT"),
        (ExErrorKind::InvalidConfig, "ERR_INVALID_CONFIG"),
        (ExErrorKind::CycleDetected, "ERR_CYCLE_DETECTED"),
        (ExErrorKind::DanglingEdge, "ERR_DANGLING_EDGE"),
        (ExErrorKind::DuplicateNode, "ERR_DUPLICATE_NODE"),
        (ExErrorKind::Io, "ERR_IO"),
        (ExErrorKind::Internal, "ERR_INTERNAL"),
    ];

    for (kind, expected_code) in kinds {
        assert_eq!(kind.code(), expected_code);
    }
}

#[test]
fn test_layout_of_valid_empty_graph_succeeds() {
    assert!(layout(&Graph::default(), &LayoutConfig::default()).is_ok());
}
