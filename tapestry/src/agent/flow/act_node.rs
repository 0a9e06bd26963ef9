//! Act node: execute the decision's tool calls through the dispatch engine.

use async_trait::async_trait;
use tracing::debug;

use crate::channels::Patch;
use crate::error::AgentError;
use crate::graph::Node;
use crate::state::{StateUpdate, TaskState, ToolExchange};
use crate::tools::{DispatchMode, ToolDispatcher};

/// Consumes the structured decision: its tool calls go through the dispatcher
/// (mode fixed at graph construction), the resulting exchanges are appended to
/// the log, and the decision is cleared. Per-call failures are already data in
/// the results — this node never fails the run.
pub struct ActNode {
    dispatcher: ToolDispatcher,
    mode: DispatchMode,
}

impl ActNode {
    pub fn new(dispatcher: ToolDispatcher, mode: DispatchMode) -> Self {
        Self { dispatcher, mode }
    }
}

#[async_trait]
impl Node<TaskState, StateUpdate> for ActNode {
    fn id(&self) -> &str {
        "act"
    }

    async fn run(&self, state: TaskState) -> Result<StateUpdate, AgentError> {
        let Some(decision) = state.structured_decisions else {
            // Routing should not send us here without a decision.
            debug!("act invoked without a structured decision");
            return Ok(StateUpdate::default());
        };

        if decision.tool_calls.is_empty() {
            return Ok(StateUpdate {
                structured_decisions: Patch::Clear,
                ..StateUpdate::default()
            });
        }

        let outcomes = self
            .dispatcher
            .dispatch(&decision.tool_calls, self.mode)
            .await;
        let tool_exchanges: Vec<ToolExchange> = outcomes
            .into_iter()
            .map(|o| ToolExchange {
                request: o.call,
                result: o.result,
            })
            .collect();

        Ok(StateUpdate {
            structured_decisions: Patch::Clear,
            tool_exchanges,
            ..StateUpdate::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::Decision;
    use crate::state::{ToolCall, ToolStatus};
    use crate::tools::{tool_success, DeviceTool, ToolExecutionError, ToolRegistry, ToolSpec};
    use async_trait::async_trait;
    use std::sync::Arc;

    struct OkTool;

    #[async_trait]
    impl DeviceTool for OkTool {
        fn name(&self) -> &str {
            "tap"
        }
        fn spec(&self) -> ToolSpec {
            ToolSpec {
                name: "tap".to_string(),
                description: None,
                input_schema: serde_json::json!({}),
            }
        }
        async fn execute(
            &self,
            _args: serde_json::Value,
        ) -> Result<serde_json::Value, ToolExecutionError> {
            Ok(tool_success("tapped"))
        }
    }

    fn state_with_decision(tool_calls: Vec<ToolCall>) -> TaskState {
        let mut state = TaskState::new("goal");
        state.structured_decisions = Some(Decision {
            payload: "{}".to_string(),
            rationale: "act".to_string(),
            complete_subgoal_ids: vec![],
            tool_calls,
        });
        state
    }

    fn act_node() -> ActNode {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(OkTool));
        ActNode::new(ToolDispatcher::new(registry), DispatchMode::Sequential)
    }

    /// **Scenario**: The decision's calls are dispatched, exchanges appended,
    /// and the consumed decision cleared.
    #[tokio::test]
    async fn act_dispatches_and_clears_decision() {
        let calls = vec![ToolCall::new("tap", serde_json::json!({"x": 1}))];
        let update = act_node()
            .run(state_with_decision(calls.clone()))
            .await
            .unwrap();

        assert_eq!(update.structured_decisions, Patch::Clear);
        assert_eq!(update.tool_exchanges.len(), 1);
        assert_eq!(update.tool_exchanges[0].request.id, calls[0].id);
        assert_eq!(update.tool_exchanges[0].result.status, ToolStatus::Success);
    }

    /// **Scenario**: A decision without tool calls clears itself without
    /// touching the exchange log.
    #[tokio::test]
    async fn act_with_no_calls_only_clears() {
        let update = act_node()
            .run(state_with_decision(vec![]))
            .await
            .unwrap();
        assert_eq!(update.structured_decisions, Patch::Clear);
        assert!(update.tool_exchanges.is_empty());
    }

    /// **Scenario**: Without a decision the node is a no-op, not an error.
    #[tokio::test]
    async fn act_without_decision_is_noop() {
        let update = act_node().run(TaskState::new("goal")).await.unwrap();
        assert_eq!(update, StateUpdate::default());
    }
}
