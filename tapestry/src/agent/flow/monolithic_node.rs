//! Monolithic node: single-reasoner baseline stage.
//!
//! Collapses planning, orchestration and reasoning into one decision per
//! cycle. Completion is a textual signal: an answer with no tool calls whose
//! rationale claims the task is done sets the terminal flag.

use async_trait::async_trait;
use tracing::warn;

use crate::channels::Patch;
use crate::error::AgentError;
use crate::graph::Node;
use crate::llm::ReasonContext;
use crate::state::{StateUpdate, TaskState};

use super::reasoning::ResilientReasoner;

/// Phrases that signal textual task completion.
pub const COMPLETION_PHRASES: [&str; 4] = [
    "task is complete",
    "goal has been achieved",
    "successfully completed",
    "task has been completed",
];

fn is_completion_text(text: &str) -> bool {
    let lower = text.to_lowercase();
    COMPLETION_PHRASES.iter().any(|p| lower.contains(p))
}

/// The single reasoning stage of the baseline configuration.
///
/// Unlike the staged flow there is no plan to fall back on, so a decision
/// failure that survives the fallback propagates and fails the task.
pub struct MonolithicNode {
    reasoner: ResilientReasoner,
}

impl MonolithicNode {
    pub fn new(reasoner: ResilientReasoner) -> Self {
        Self { reasoner }
    }
}

#[async_trait]
impl Node<TaskState, StateUpdate> for MonolithicNode {
    fn id(&self) -> &str {
        "reason"
    }

    async fn run(&self, state: TaskState) -> Result<StateUpdate, AgentError> {
        let ctx = ReasonContext::from_state(&state);
        let decision = self.reasoner.decide(&ctx).await?;

        let mut update = StateUpdate {
            device_context: Patch::Clear,
            ..StateUpdate::default()
        };
        match decision {
            Some(decision) => {
                let complete =
                    decision.tool_calls.is_empty() && is_completion_text(&decision.rationale);
                if !decision.rationale.is_empty() {
                    update.agent_thoughts.push(decision.rationale.clone());
                }
                update.structured_decisions = Patch::Set(decision);
                update.run_complete = complete;
            }
            None => {
                warn!("monolithic stage produced no decision, repeating the cycle");
                update.structured_decisions = Patch::Clear;
            }
        }
        Ok(update)
    }
}
