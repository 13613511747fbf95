use serde_json::Value;
use trustlens_core::diff::{compare, DiffOutcome, DiffResult};
use trustlens_core::expansion::ExpansionState;
use trustlens_core::graph::{build, CompileOptions, Graph};

/// Compare two present documents
#[allow(dead_code)]
pub fn diff(old: &Value, new: &Value) -> DiffOutcome {
    compare(Some(old), Some(new)).unwrap()
}

/// Compare two objects and return the per-key result
#[allow(dead_code)]
pub fn keyed(old: &Value, new: &Value) -> DiffResult {
    match diff(old, new) {
        DiffOutcome::Keyed(result) => result,
        other => panic!("expected keyed diff, got {:?}", other),
    }
}

/// Compile a diff of two documents with fresh expansion state
#[allow(dead_code)]
pub fn compile(old: &Value, new: &Value, options: &CompileOptions) -> Graph {
    build(&diff(old, new), options, &ExpansionState::new()).unwrap()
}

/// Node paths in emission order
#[allow(dead_code)]
pub fn paths(graph: &Graph) -> Vec<String> {
    graph.nodes.iter().map(|n| n.path.clone()).collect()
}
