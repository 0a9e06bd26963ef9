//! Agent execution error types.
//!
//! Used by `Node::run`, the graph run loop, and all collaborator traits. Per-tool
//! failures are represented as data (`ToolResult` with error status) and never
//! reach this enum; see `tools::dispatch`.

use thiserror::Error;

/// Agent execution error.
///
/// Only two categories are allowed to drive control flow by propagation:
/// unrecoverable execution failures (a reasoning stage with no fallback left,
/// an empty graph, the recursion-limit backstop) and merge conflicts, which
/// indicate a scheduling bug and are fatal to the task.
#[derive(Debug, Error)]
pub enum AgentError {
    /// Execution failed with a message (e.g. model call failed after fallback, empty graph).
    #[error("execution failed: {0}")]
    ExecutionFailed(String),

    /// Model invocation failed and no fallback succeeded.
    #[error("inference failed: {0}")]
    Inference(String),

    /// Two updates in one scheduling step wrote different values to a replace-rule
    /// state field. Not recoverable; the single-writer-per-field partition was broken.
    #[error("merge conflict: {0}")]
    MergeConflict(String),
}
