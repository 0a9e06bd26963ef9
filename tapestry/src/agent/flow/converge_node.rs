//! Converge node: deferred barrier where the cycle's branches rejoin.

use async_trait::async_trait;

use crate::error::AgentError;
use crate::graph::Node;
use crate::state::{StateUpdate, TaskState};

/// No-op barrier node. Registered as deferred, it runs only once the review
/// and action branches of the cycle have both finished, so its routing gate
/// sees their merged state.
pub struct ConvergeNode;

#[async_trait]
impl Node<TaskState, StateUpdate> for ConvergeNode {
    fn id(&self) -> &str {
        "converge"
    }

    async fn run(&self, _state: TaskState) -> Result<StateUpdate, AgentError> {
        Ok(StateUpdate::default())
    }
}
