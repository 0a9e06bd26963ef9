//! Plan node: draft the subgoal plan, or revise it after a failure.

use async_trait::async_trait;
use tracing::info;

use crate::error::AgentError;
use crate::graph::Node;
use crate::llm::ReasonContext;
use crate::state::{any_failed, StateUpdate, Subgoal, TaskState};

use super::reasoning::ResilientReasoner;

/// Entry stage of the full configuration: turns the goal (plus the previous
/// plan and narrative, on a replan) into a fresh ordered subgoal plan.
///
/// A plan failure that survives the fallback propagates — with no plan there
/// is nothing to route to, so the task is exposed to the caller as failed.
pub struct PlanNode {
    reasoner: ResilientReasoner,
}

impl PlanNode {
    pub fn new(reasoner: ResilientReasoner) -> Self {
        Self { reasoner }
    }
}

#[async_trait]
impl Node<TaskState, StateUpdate> for PlanNode {
    fn id(&self) -> &str {
        "plan"
    }

    async fn run(&self, state: TaskState) -> Result<StateUpdate, AgentError> {
        let replan = any_failed(&state.subgoal_plan);
        let mut ctx = ReasonContext::from_state(&state);
        ctx.replan = replan;

        let outcome = self.reasoner.plan(&ctx).await?;
        let subgoals: Vec<Subgoal> = match outcome {
            Some(plan) if !plan.subgoals.is_empty() => {
                plan.subgoals.into_iter().map(Subgoal::pending).collect()
            }
            _ => {
                return Err(AgentError::Inference(
                    "planner produced no subgoals".to_string(),
                ))
            }
        };

        info!(count = subgoals.len(), replan, "generated plan");
        let mut update = StateUpdate::replace_plan(subgoals);
        update.agent_thoughts = vec![if replan {
            "Revised the plan after a failed subgoal.".to_string()
        } else {
            "Drafted the initial subgoal plan.".to_string()
        }];
        Ok(update)
    }
}
