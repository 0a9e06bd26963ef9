//! Compiled state graph: immutable, supports invoke only.
//!
//! Execution is step-synchronous: every node in the current frontier runs (in
//! order, one at a time — a single logical task), the step's partial updates
//! are folded into the state as one batch, and only then are routers resolved
//! to build the next frontier. Successors targeting a deferred node are held
//! until no non-deferred work remains, which gives convergence-barrier
//! semantics: the deferred node sees the merged state of every branch.

use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::sync::Arc;

use crate::channels::{BoxedStateUpdater, ChannelError};
use crate::error::AgentError;

use super::conditional::NextEntry;
use super::logging::{
    log_graph_complete, log_graph_error, log_graph_start, log_node_complete, log_node_start,
    log_routing, log_state_update,
};
use super::node::Node;
use super::node_middleware::NodeMiddleware;
use super::state_graph::END;

/// Compiled graph: immutable structure, supports invoke only.
///
/// Created by `StateGraph::compile()`. Runs from the first node; after each
/// step, the edge table and conditional routers choose the next frontier,
/// until a router returns END or nothing is left to schedule.
#[derive(Clone)]
pub struct CompiledStateGraph<S, U>
where
    S: Clone + Send + Sync + Debug + 'static,
    U: Clone + Send + Sync + Debug + 'static,
{
    nodes: HashMap<String, Arc<dyn Node<S, U>>>,
    deferred: HashSet<String>,
    first_node_id: String,
    next_map: HashMap<String, NextEntry<S>>,
    updater: BoxedStateUpdater<S, U>,
    middleware: Option<Arc<dyn NodeMiddleware<S, U>>>,
    recursion_limit: usize,
}

impl<S, U> CompiledStateGraph<S, U>
where
    S: Clone + Send + Sync + Debug + 'static,
    U: Clone + Send + Sync + Debug + 'static,
{
    #[allow(clippy::too_many_arguments)]
    pub(super) fn new(
        nodes: HashMap<String, Arc<dyn Node<S, U>>>,
        deferred: HashSet<String>,
        first_node_id: String,
        next_map: HashMap<String, NextEntry<S>>,
        updater: BoxedStateUpdater<S, U>,
        middleware: Option<Arc<dyn NodeMiddleware<S, U>>>,
        recursion_limit: usize,
    ) -> Self {
        Self {
            nodes,
            deferred,
            first_node_id,
            next_map,
            updater,
            middleware,
            recursion_limit,
        }
    }

    async fn execute_node(&self, node: Arc<dyn Node<S, U>>, state: S) -> Result<U, AgentError> {
        if let Some(middleware) = &self.middleware {
            let node_id = node.id().to_string();
            let node_clone = node.clone();
            middleware
                .around_run(
                    &node_id,
                    state,
                    Box::new(move |s| {
                        let node = node_clone.clone();
                        Box::pin(async move { node.run(s).await })
                    }),
                )
                .await
        } else {
            node.run(state).await
        }
    }

    /// Runs the graph to completion with the given initial state.
    ///
    /// Ends when a router returns END (the whole run ends, held barriers
    /// included) or when nothing is left to schedule. Exceeding the recursion
    /// limit, a node error, or a same-step merge conflict fail the run.
    pub async fn invoke(&self, state: S) -> Result<S, AgentError> {
        if self.nodes.is_empty() || !self.nodes.contains_key(&self.first_node_id) {
            return Err(AgentError::ExecutionFailed("empty graph".into()));
        }

        log_graph_start();
        let mut state = state;
        let mut frontier: Vec<String> = vec![self.first_node_id.clone()];
        // Deferred successors held until the frontier drains.
        let mut held: Vec<String> = Vec::new();
        let mut steps = 0usize;

        loop {
            if frontier.is_empty() {
                if held.is_empty() {
                    break;
                }
                frontier = std::mem::take(&mut held);
            }

            steps += 1;
            if steps > self.recursion_limit {
                let err = AgentError::ExecutionFailed(format!(
                    "recursion limit of {} steps exceeded",
                    self.recursion_limit
                ));
                log_graph_error(&err);
                return Err(err);
            }

            // Run every frontier node sequentially, collecting the step's updates.
            let mut updates: Vec<(String, U)> = Vec::with_capacity(frontier.len());
            for id in &frontier {
                let node = self
                    .nodes
                    .get(id)
                    .expect("compiled graph has all nodes")
                    .clone();
                log_node_start(id);
                let update = match self.execute_node(node, state.clone()).await {
                    Ok(u) => u,
                    Err(e) => {
                        log_graph_error(&e);
                        return Err(e);
                    }
                };
                log_node_complete(id);
                updates.push((id.clone(), update));
            }

            // Fold the whole step at once; conflicting replace writes are fatal.
            if let Err(e) = self.updater.apply_step(&mut state, &updates) {
                let err = match e {
                    ChannelError::Conflict(field) => AgentError::MergeConflict(field),
                    ChannelError::InvalidUpdate(msg) => AgentError::ExecutionFailed(msg),
                };
                log_graph_error(&err);
                return Err(err);
            }
            log_state_update(steps, updates.len());

            // Resolve routers only after the step's updates are applied.
            let mut next: Vec<String> = Vec::new();
            let mut end_requested = false;
            for id in &frontier {
                let targets = match self.next_map.get(id) {
                    Some(NextEntry::Conditional(router)) => router.resolve_next(&state),
                    Some(NextEntry::Unconditional(target)) => vec![target.clone()],
                    None => Vec::new(),
                };
                log_routing(id, &targets);
                for target in targets {
                    if target == END {
                        end_requested = true;
                    } else if !self.nodes.contains_key(&target) {
                        let err = AgentError::ExecutionFailed(format!(
                            "router returned unknown node: {}",
                            target
                        ));
                        log_graph_error(&err);
                        return Err(err);
                    } else if self.deferred.contains(&target) {
                        if !held.contains(&target) {
                            held.push(target);
                        }
                    } else if !next.contains(&target) {
                        next.push(target);
                    }
                }
            }

            if end_requested {
                // END is terminal for the whole run; held barriers are dropped.
                break;
            }
            frontier = next;
        }

        log_graph_complete(steps);
        Ok(state)
    }
}
