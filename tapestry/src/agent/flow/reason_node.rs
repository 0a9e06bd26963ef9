//! Reason node: turn the current state into the next decision.

use async_trait::async_trait;
use tracing::warn;

use crate::channels::Patch;
use crate::error::AgentError;
use crate::graph::Node;
use crate::llm::ReasonContext;
use crate::state::{StateUpdate, TaskState};

use super::reasoning::ResilientReasoner;

/// Produces the next [`Decision`](crate::llm::Decision) from the goal, plan,
/// narrative and the just-captured device snapshot. The snapshot is consumed
/// here: whatever happens, the update clears `device_context` so stale
/// perception never reaches the next cycle.
///
/// An unrecoverable decision failure follows the replan policy: the running
/// subgoal is marked failed instead of crashing the task.
pub struct ReasonNode {
    reasoner: ResilientReasoner,
}

impl ReasonNode {
    pub fn new(reasoner: ResilientReasoner) -> Self {
        Self { reasoner }
    }
}

#[async_trait]
impl Node<TaskState, StateUpdate> for ReasonNode {
    fn id(&self) -> &str {
        "reason"
    }

    async fn run(&self, state: TaskState) -> Result<StateUpdate, AgentError> {
        let ctx = ReasonContext::from_state(&state);
        let decision = match self.reasoner.decide(&ctx).await {
            Ok(decision) => decision,
            Err(e) => {
                warn!(error = %e, "decision failed on both models");
                let mut update =
                    super::fail_running_subgoal(&state, format!("Reasoning failed: {}", e));
                update.device_context = Patch::Clear;
                return Ok(update);
            }
        };

        let mut update = StateUpdate {
            device_context: Patch::Clear,
            ..StateUpdate::default()
        };
        match decision {
            Some(decision) => {
                if !decision.rationale.is_empty() {
                    update.agent_thoughts.push(decision.rationale.clone());
                }
                update.complete_subgoal_ids =
                    Patch::Set(decision.complete_subgoal_ids.clone());
                update.structured_decisions = Patch::Set(decision);
            }
            None => {
                update.structured_decisions = Patch::Clear;
                update
                    .agent_thoughts
                    .push("No decision produced; reviewing subgoal progress.".to_string());
            }
        }
        Ok(update)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{Decision, MockReasoner};
    use crate::state::{PlanUpdate, Subgoal, SubgoalStatus, ToolCall};
    use std::sync::Arc;

    fn node(reasoner: MockReasoner) -> ReasonNode {
        ReasonNode::new(ResilientReasoner::new(Arc::new(reasoner)))
    }

    /// **Scenario**: A decision lands in the state update with its completion
    /// ids, and the consumed snapshot is cleared.
    #[tokio::test]
    async fn reason_records_decision_and_clears_snapshot() {
        let decision = Decision {
            payload: "{\"action\": \"tap\"}".to_string(),
            rationale: "the send button is visible".to_string(),
            complete_subgoal_ids: vec!["s1".to_string()],
            tool_calls: vec![ToolCall::new("tap", serde_json::json!({"x": 3}))],
        };
        let node = node(MockReasoner::new().push_decision(decision.clone()));

        let mut state = TaskState::new("goal");
        state.device_context = Some(crate::state::DeviceSnapshot::empty());
        let update = node.run(state).await.unwrap();

        assert_eq!(update.device_context, Patch::Clear);
        assert_eq!(update.structured_decisions, Patch::Set(decision));
        assert_eq!(
            update.complete_subgoal_ids,
            Patch::Set(vec!["s1".to_string()])
        );
        assert_eq!(update.agent_thoughts.len(), 1);
    }

    /// **Scenario**: An empty decision clears stale decisions and still
    /// records a thought so the cycle is visible in the narrative.
    #[tokio::test]
    async fn reason_handles_empty_decision() {
        let node = node(MockReasoner::new());
        let update = node.run(TaskState::new("goal")).await.unwrap();

        assert_eq!(update.structured_decisions, Patch::Clear);
        assert!(!update.agent_thoughts.is_empty());
    }

    /// **Scenario**: A decision failure marks the running subgoal failed
    /// (replan routing) instead of erroring the task.
    #[tokio::test]
    async fn reason_failure_fails_running_subgoal() {
        let node = node(MockReasoner::new().push_decision_error("context too large"));
        let mut state = TaskState::new("goal");
        state.subgoal_plan = vec![Subgoal {
            id: "s1".to_string(),
            description: "open the app".to_string(),
            status: SubgoalStatus::Running,
            completion_reason: None,
        }];

        let update = node.run(state).await.unwrap();

        match update.subgoal_plan {
            Some(PlanUpdate::Revise(revisions)) => {
                assert_eq!(revisions[0].status, SubgoalStatus::Failure)
            }
            other => panic!("expected Revise, got {:?}", other),
        }
        assert_eq!(update.device_context, Patch::Clear);
    }
}
