//! Summarize node: append the cycle narrative.

use async_trait::async_trait;
use tracing::warn;

use crate::error::AgentError;
use crate::graph::Node;
use crate::llm::ReasonContext;
use crate::state::{StateUpdate, TaskState};

use super::reasoning::ResilientReasoner;

/// Closes the action branch of each cycle with a short narrative thought.
///
/// With post-action validation enabled, the summary context includes the
/// latest tool exchanges so the reasoner can judge whether the actions did
/// what the decision intended; disabled, it narrates without outcomes. A
/// failed summary is tolerated — the exchange log itself is never touched.
pub struct SummarizeNode {
    reasoner: ResilientReasoner,
    validate_outcomes: bool,
}

impl SummarizeNode {
    pub fn new(reasoner: ResilientReasoner, validate_outcomes: bool) -> Self {
        Self {
            reasoner,
            validate_outcomes,
        }
    }
}

#[async_trait]
impl Node<TaskState, StateUpdate> for SummarizeNode {
    fn id(&self) -> &str {
        "summarize"
    }

    async fn run(&self, state: TaskState) -> Result<StateUpdate, AgentError> {
        let mut ctx = ReasonContext::from_state(&state);
        if !self.validate_outcomes {
            ctx.recent_exchanges.clear();
        }

        match self.reasoner.summarize(&ctx).await {
            Ok(Some(summary)) => Ok(StateUpdate::thought(summary)),
            Ok(None) => Ok(StateUpdate::default()),
            Err(e) => {
                warn!(error = %e, "cycle summary failed, continuing without it");
                Ok(StateUpdate::default())
            }
        }
    }
}
