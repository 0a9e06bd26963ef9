//! Graph node trait: one step in a StateGraph.
//!
//! Receives a snapshot of state `S`, returns a partial update `U`. Routing is
//! not a node concern: the next node(s) come entirely from the graph's edge
//! table and conditional routers, so the control-flow table stays inspectable
//! independent of handler logic.

use async_trait::async_trait;
use std::fmt::Debug;

use crate::error::AgentError;

/// One step in a graph: state snapshot in, partial update out.
///
/// The runner clones the current state for each node in a step, so a node can
/// freely consume its snapshot. Nodes must only write fields they own — the
/// updater rejects same-step conflicting writes on replace-rule fields.
#[async_trait]
pub trait Node<S, U>: Send + Sync
where
    S: Clone + Send + Sync + Debug + 'static,
    U: Clone + Send + Sync + Debug + 'static,
{
    /// Node id (e.g. `"reason"`, `"act"`). Must be unique within a graph.
    fn id(&self) -> &str;

    /// One step: read the state snapshot, return this node's partial update.
    async fn run(&self, state: S) -> Result<U, AgentError>;
}
