use thiserror::Error;

/// Result type alias using TrustLensError
pub type Result<T> = std::result::Result<T, TrustLensError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that callers (the engine, the CLI and
/// any rendering surface) can match on without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Input
    InvalidInput,
    InvalidSnapshot,
    InvalidConfig,

    // Pipeline stages
    /// The diff could not be produced; no partial tree is exposed
    ComparisonFailed,
    /// Node/edge compilation failed; the previous graph stays in place
    GraphBuildFailed,
    /// Position assignment failed; the previous graph stays in place
    LayoutFailed,

    // Graph structure
    CycleDetected,
    DanglingEdge,
    DuplicateNode,

    // Session
    /// A graph operation was requested before any snapshot pair was selected
    NoComparison,

    // Integration/IO
    Io,
    Serialization,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::InvalidSnapshot => "ERR_INVALID_SNAPSHOT",
            ExErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
            ExErrorKind::ComparisonFailed => "ERR_COMPARISON_FAILED",
            ExErrorKind::GraphBuildFailed => "ERR_GRAPH_BUILD_FAILED",
            ExErrorKind::LayoutFailed => "ERR_LAYOUT_FAILED",
            ExErrorKind::CycleDetected => "ERR_CYCLE_DETECTED",
            ExErrorKind::DanglingEdge => "ERR_DANGLING_EDGE",
            ExErrorKind::DuplicateNode => "ERR_DUPLICATE_NODE",
            ExErrorKind::NoComparison => "ERR_NO_COMPARISON",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification kind plus optional context (operation, diff path)
/// and an optional nested cause.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    path: Option<String>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            path: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add diff/graph path context
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the path context, if any
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {:?}", self.code(), self.kind)?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Internal fault taxonomy for the diff and graph pipeline
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrustLensError {
    /// Nesting exceeded the recursion bound (cyclic or pathological input)
    #[error("Nesting depth exceeded limit {limit} at {path}")]
    DepthLimitExceeded { path: String, limit: usize },

    /// An edge references a node id that is not in the node list
    #[error("Edge {edge_id} references unknown node {node_id}")]
    DanglingEdge { edge_id: String, node_id: String },

    /// The same node id was emitted twice
    #[error("Duplicate node id: {node_id}")]
    DuplicateNode { node_id: String },

    /// The graph contains a directed cycle
    #[error("Cycle detected involving node {node_id}")]
    CycleDetected { node_id: String },

    /// No snapshot pair has been selected yet
    #[error("No comparison selected")]
    NoComparisonSelected,

    /// JSON (de)serialization failure
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

/// Conversion from TrustLensError to ExError
impl From<TrustLensError> for ExError {
    fn from(err: TrustLensError) -> Self {
        match err {
            TrustLensError::DepthLimitExceeded { path, limit } => {
                ExError::new(ExErrorKind::Internal)
                    .with_path(path)
                    .with_message(format!("nesting depth exceeded limit {}", limit))
            }

            TrustLensError::DanglingEdge { edge_id, node_id } => {
                ExError::new(ExErrorKind::DanglingEdge)
                    .with_message(format!("edge {} references unknown node {}", edge_id, node_id))
            }

            TrustLensError::DuplicateNode { node_id } => ExError::new(ExErrorKind::DuplicateNode)
                .with_message(format!("duplicate node id {}", node_id)),

            TrustLensError::CycleDetected { node_id } => ExError::new(ExErrorKind::CycleDetected)
                .with_message(format!("cycle detected involving node {}", node_id)),

            TrustLensError::NoComparisonSelected => ExError::new(ExErrorKind::NoComparison)
                .with_message("select a base and compare snapshot first"),

            TrustLensError::Serialization { message } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }
        }
    }
}

/// Conversion from serde_json::Error to TrustLensError
impl From<serde_json::Error> for TrustLensError {
    fn from(err: serde_json::Error) -> Self {
        TrustLensError::Serialization {
            message: err.to_string(),
        }
    }
}
