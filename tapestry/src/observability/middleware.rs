//! Node middleware that reports per-node durations to an [`Observer`].

use async_trait::async_trait;
use std::fmt::Debug;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Instant;

use crate::error::AgentError;
use crate::graph::NodeMiddleware;

use super::Observer;

/// Wraps every node run, timing it and forwarding the duration (and error, if
/// any) to the observer. The node's result passes through unchanged.
pub struct NodeTimingMiddleware<S, U> {
    observer: Arc<dyn Observer>,
    _phantom: std::marker::PhantomData<fn(S) -> U>,
}

impl<S, U> NodeTimingMiddleware<S, U> {
    pub fn new(observer: Arc<dyn Observer>) -> Self {
        Self {
            observer,
            _phantom: std::marker::PhantomData,
        }
    }
}

#[async_trait]
impl<S, U> NodeMiddleware<S, U> for NodeTimingMiddleware<S, U>
where
    S: Clone + Send + Sync + Debug + 'static,
    U: Clone + Send + Sync + Debug + 'static,
{
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
    ) -> Result<U, AgentError> {
        let started = Instant::now();
        let result = inner(state).await;
        let elapsed = started.elapsed();
        match &result {
            Ok(_) => self.observer.on_node_duration(node_id, elapsed, None),
            Err(e) => self
                .observer
                .on_node_duration(node_id, elapsed, Some(&e.to_string())),
        }
        result
    }
}
