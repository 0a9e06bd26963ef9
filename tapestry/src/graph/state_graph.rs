//! State graph builder: nodes + edges (from → to) and conditional routers.
//!
//! Add nodes with `add_node` (or `add_deferred_node` for barrier nodes), define
//! the control-flow table with `add_edge(from, to)` using `START` and `END` for
//! graph entry/exit, and `add_conditional_edges` for state-based routing —
//! routers may return several keys to fan out. Then `compile` to get a
//! [`CompiledStateGraph`].
//!
//! # Deferred nodes
//!
//! A deferred node is scheduled like any other successor but only runs once no
//! non-deferred work is left in the cycle. Point every fanned-out branch at one
//! deferred node to get a convergence barrier: its router then sees the merged
//! state of all branches.

use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::sync::Arc;

use crate::channels::{BoxedStateUpdater, ReplaceUpdater, StateUpdater};

use super::compile_error::CompilationError;
use super::compiled::CompiledStateGraph;
use super::conditional::{ConditionalRouter, ConditionalRouterFn, NextEntry};
use super::node::Node;
use super::node_middleware::NodeMiddleware;

/// Sentinel for graph entry: use as `from_id` in `add_edge(START, first_node_id)`.
pub const START: &str = "__start__";

/// Sentinel for graph exit: use as `to_id` or a router target.
pub const END: &str = "__end__";

/// Safety backstop for cyclic graphs: maximum scheduling steps per invoke.
pub const DEFAULT_RECURSION_LIMIT: usize = 100;

/// State graph under construction. Generic over state `S` and update `U`.
pub struct StateGraph<S, U>
where
    S: Clone + Send + Sync + Debug + 'static,
    U: Clone + Send + Sync + Debug + 'static,
{
    nodes: HashMap<String, Arc<dyn Node<S, U>>>,
    /// Barrier nodes: held back until the frontier has no non-deferred work.
    deferred: HashSet<String>,
    /// Edges (from_id, to_id). A node has one outgoing edge or conditional edges.
    edges: Vec<(String, String)>,
    conditional_edges: HashMap<String, ConditionalRouter<S>>,
    middleware: Option<Arc<dyn NodeMiddleware<S, U>>>,
    updater: BoxedStateUpdater<S, U>,
    recursion_limit: usize,
}

impl<S> StateGraph<S, S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    /// Graph whose nodes return full states; each output replaces the state.
    pub fn new() -> Self {
        Self::with_updater(Arc::new(ReplaceUpdater))
    }
}

impl<S> Default for StateGraph<S, S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<S, U> StateGraph<S, U>
where
    S: Clone + Send + Sync + Debug + 'static,
    U: Clone + Send + Sync + Debug + 'static,
{
    /// Graph with an explicit updater defining how node outputs merge into state.
    pub fn with_updater(updater: Arc<dyn StateUpdater<S, U>>) -> Self {
        Self {
            nodes: HashMap::new(),
            deferred: HashSet::new(),
            edges: Vec::new(),
            conditional_edges: HashMap::new(),
            middleware: None,
            updater,
            recursion_limit: DEFAULT_RECURSION_LIMIT,
        }
    }

    /// Attaches node middleware wrapping every node execution.
    pub fn with_middleware(mut self, middleware: Arc<dyn NodeMiddleware<S, U>>) -> Self {
        self.middleware = Some(middleware);
        self
    }

    /// Overrides the scheduling-step backstop (default [`DEFAULT_RECURSION_LIMIT`]).
    pub fn with_recursion_limit(mut self, limit: usize) -> Self {
        self.recursion_limit = limit;
        self
    }

    /// Adds a node; id must be unique. Replaces if same id.
    pub fn add_node(&mut self, id: impl Into<String>, node: Arc<dyn Node<S, U>>) -> &mut Self {
        self.nodes.insert(id.into(), node);
        self
    }

    /// Adds a barrier node: scheduled successors wait until the cycle's other
    /// branches have finished before it runs.
    pub fn add_deferred_node(
        &mut self,
        id: impl Into<String>,
        node: Arc<dyn Node<S, U>>,
    ) -> &mut Self {
        let id = id.into();
        self.deferred.insert(id.clone());
        self.nodes.insert(id, node);
        self
    }

    /// Adds an edge from `from_id` to `to_id` (`START`/`END` for entry/exit).
    pub fn add_edge(&mut self, from_id: impl Into<String>, to_id: impl Into<String>) -> &mut Self {
        self.edges.push((from_id.into(), to_id.into()));
        self
    }

    /// Adds conditional edges from `source`: after the source runs and the
    /// step's updates are applied, `path(state)` returns keys; each key is
    /// looked up in `path_map` when provided, or used as the next node id.
    /// Multiple keys fan out to multiple successors.
    pub fn add_conditional_edges(
        &mut self,
        source: impl Into<String>,
        path: ConditionalRouterFn<S>,
        path_map: Option<HashMap<String, String>>,
    ) -> &mut Self {
        self.conditional_edges
            .insert(source.into(), ConditionalRouter::new(path, path_map));
        self
    }

    /// Builds the executable graph, validating the control-flow table.
    pub fn compile(self) -> Result<CompiledStateGraph<S, U>, CompilationError> {
        for (from, to) in &self.edges {
            if from != START && !self.nodes.contains_key(from) {
                return Err(CompilationError::NodeNotFound(from.clone()));
            }
            if to != END && !self.nodes.contains_key(to) {
                return Err(CompilationError::NodeNotFound(to.clone()));
            }
        }
        for (source, router) in &self.conditional_edges {
            if !self.nodes.contains_key(source) {
                return Err(CompilationError::NodeNotFound(source.clone()));
            }
            if let Some(path_map) = &router.path_map {
                for target in path_map.values() {
                    if target != END && !self.nodes.contains_key(target) {
                        return Err(CompilationError::InvalidConditionalPathMap(target.clone()));
                    }
                }
            }
        }

        let start_edges: Vec<_> = self
            .edges
            .iter()
            .filter(|(f, _)| f == START)
            .map(|(_, t)| t.clone())
            .collect();
        let first = match start_edges.len() {
            1 => start_edges.into_iter().next().unwrap(),
            _ => return Err(CompilationError::MissingStart),
        };

        // END must be reachable: a direct edge, a mapped router target, or a
        // router without a path map (which may emit END at runtime).
        let has_end = self.edges.iter().any(|(_, t)| t == END)
            || self.conditional_edges.values().any(|r| {
                r.path_map
                    .as_ref()
                    .map_or(true, |m| m.values().any(|v| v == END))
            });
        if !has_end {
            return Err(CompilationError::MissingEnd);
        }

        let mut seen_from: HashSet<&str> = HashSet::new();
        for (from, _) in self.edges.iter().filter(|(f, _)| f != START) {
            if !seen_from.insert(from.as_str()) {
                return Err(CompilationError::NodeHasMultipleEdges(from.clone()));
            }
            if self.conditional_edges.contains_key(from) {
                return Err(CompilationError::NodeHasBothEdgeAndConditional(from.clone()));
            }
        }

        let mut next_map: HashMap<String, NextEntry<S>> = self
            .edges
            .iter()
            .filter(|(f, _)| f != START)
            .map(|(f, t)| (f.clone(), NextEntry::Unconditional(t.clone())))
            .collect();
        for (source, router) in self.conditional_edges {
            next_map.insert(source, NextEntry::Conditional(router));
        }

        Ok(CompiledStateGraph::new(
            self.nodes,
            self.deferred,
            first,
            next_map,
            self.updater,
            self.middleware,
            self.recursion_limit,
        ))
    }
}
