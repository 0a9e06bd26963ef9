//! State graph: named nodes, table-driven routing, step-synchronous execution.
//!
//! Build with [`StateGraph`]: add nodes and edges (conditional routers may fan
//! out to several successors), then `compile` into an immutable
//! [`CompiledStateGraph`] and `invoke` it with an initial state. Nodes return
//! partial updates which a [`StateUpdater`](crate::channels::StateUpdater)
//! folds into the state once per scheduling step; deferred nodes act as
//! barriers that run only when the cycle's other branches have finished.

mod compile_error;
mod compiled;
mod conditional;
mod logging;
mod node;
mod node_middleware;
mod state_graph;

pub use compile_error::CompilationError;
pub use compiled::CompiledStateGraph;
pub use conditional::{ConditionalRouter, ConditionalRouterFn, NextEntry};
pub use logging::{
    log_graph_complete, log_graph_error, log_graph_start, log_node_complete, log_node_start,
    log_routing, log_state_update,
};
pub use node::Node;
pub use node_middleware::NodeMiddleware;
pub use state_graph::{StateGraph, DEFAULT_RECURSION_LIMIT, END, START};
