use thiserror::Error;

use crate::types::Capacity;

/// Errors of graph construction and flow queries.
///
/// Vertices are carried in their rendered form so that one error type serves
/// every vertex type. Pushing more than a path's bottleneck is not listed
/// here: it is an engine bug and panics in `ResidualNetwork::apply_flow`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlowError {
    #[error("edge {from} -> {to} has negative capacity {capacity}")]
    InvalidCapacity {
        from: String,
        to: String,
        capacity: Capacity,
    },
    #[error("amounts involving {from} -> {to} add up to more than i64::MAX")]
    CapacityOverflow { from: String, to: String },
    #[error("capacity matrix is not square: row {row:?} has {found} entries, expected {expected}")]
    InvalidMatrix {
        row: Option<usize>,
        expected: usize,
        found: usize,
    },
    #[error("vertex {vertex} is not part of the graph")]
    UnknownVertex { vertex: String },
    #[error("edge {from} -> {to} is not part of the graph")]
    UnknownEdge { from: String, to: String },
    #[error("edge {from} -> {to} cannot carry flow {flow}")]
    InvalidFlow {
        from: String,
        to: String,
        flow: Capacity,
    },
    #[error("degenerate query: {vertex} is both source and sink")]
    DegenerateQuery { vertex: String },
    #[error("query needs at least one origin and one destination")]
    EmptyQuery,
    #[error("requested flow {requested} is negative")]
    InvalidRequestedFlow { requested: Capacity },
    #[error("augmentation budget exceeded after {augmentations} augmentations (flow so far: {flow})")]
    BudgetExceeded {
        augmentations: usize,
        flow: Capacity,
    },
}

/// Errors while reading graphs and network descriptions from files.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
    #[error("line {line}: {message}")]
    Format { line: usize, message: String },
    #[error("network description: {0}")]
    Network(String),
    #[error(transparent)]
    Graph(#[from] FlowError),
}
