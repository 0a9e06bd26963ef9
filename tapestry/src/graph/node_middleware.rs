//! Node middleware: wrap node.run with external async logic (around pattern).
//!
//! Set via `StateGraph::with_middleware`. The graph wraps every node execution;
//! middleware decides when to call the inner logic and can observe or modify
//! the result (e.g. timing for the observability collaborator).

use async_trait::async_trait;
use std::fmt::Debug;
use std::pin::Pin;

use crate::error::AgentError;

/// Async middleware that wraps node.run; implemented externally.
#[async_trait]
pub trait NodeMiddleware<S, U>: Send + Sync
where
    S: Clone + Send + Sync + Debug + 'static,
    U: Clone + Send + Sync + Debug + 'static,
{
    /// Wraps one node execution.
    ///
    /// - `node_id`: current node id
    /// - `state`: state snapshot passed to the node
    /// - `inner`: the actual node.run logic; must be called to execute the node
    async fn around_run(
        &self,
        node_id: &str,
        state: S,
        inner: Box<
            dyn FnOnce(
                    S,
                )
                    -> Pin<Box<dyn std::future::Future<Output = Result<U, AgentError>> + Send>>
                + Send,
        >,
    ) -> Result<U, AgentError>;
}
