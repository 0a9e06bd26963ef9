//! Graph compilation error.
//!
//! Returned by `StateGraph::compile` when edges reference unknown nodes or the
//! graph has no entry/exit.

use thiserror::Error;

/// Error when compiling a state graph.
///
/// Validation ensures every id in edges (except START/END) exists in the node
/// map, there is exactly one START edge, END is reachable, and each node has a
/// single routing source (one unconditional edge or one conditional router).
#[derive(Debug, Error)]
pub enum CompilationError {
    /// A node id in an edge was not registered via `add_node` (and is not START/END).
    #[error("node not found: {0}")]
    NodeNotFound(String),

    /// No edge has from_id == START, or more than one such edge.
    #[error("graph must have exactly one edge from START")]
    MissingStart,

    /// Nothing routes to END: no edge and no conditional path can reach it.
    #[error("graph has no path to END")]
    MissingEnd,

    /// A node has more than one unconditional outgoing edge.
    #[error("node has multiple outgoing edges: {0}")]
    NodeHasMultipleEdges(String),

    /// A node has both an outgoing edge and conditional edges; it must have one.
    #[error("node has both edge and conditional edges: {0}")]
    NodeHasBothEdgeAndConditional(String),

    /// A value in a conditional path_map is not a valid node id or END.
    #[error("conditional path_map invalid target: {0}")]
    InvalidConditionalPathMap(String),
}
