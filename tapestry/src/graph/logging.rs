//! Structured logging for graph execution events.

/// Log graph execution start.
pub fn log_graph_start() {
    tracing::info!("starting graph execution");
}

/// Log graph execution completion.
pub fn log_graph_complete(steps: usize) {
    tracing::info!(steps, "graph execution complete");
}

/// Log graph execution error.
pub fn log_graph_error(error: &crate::error::AgentError) {
    tracing::error!(?error, "graph execution error");
}

/// Log node execution start.
pub fn log_node_start(node_id: &str) {
    tracing::debug!(node_id, "starting node");
}

/// Log node execution completion.
pub fn log_node_complete(node_id: &str) {
    tracing::debug!(node_id, "node complete");
}

/// Log that a step's updates were folded into the state.
pub fn log_state_update(step: usize, writers: usize) {
    tracing::debug!(step, writers, "state updated");
}

/// Log a routing decision.
pub fn log_routing(from: &str, targets: &[String]) {
    tracing::debug!(from, ?targets, "routing");
}
