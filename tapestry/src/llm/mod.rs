//! Reasoning collaborator abstraction for the graph's decision stages.
//!
//! The graph never builds prompts or model requests; it hands a [`ReasonContext`]
//! to a [`Reasoner`] and gets structured outputs back. Each stage has its own
//! output shape (plan, subgoal review, decision, summary) but they share one
//! collaborator seam, and every call goes through the resilient wrapper in
//! [`resilient`]. `Ok(None)` means the model produced an empty result, which the
//! wrapper can treat as a failure.
//!
//! [`MockReasoner`] provides scripted responses for tests.

pub mod resilient;

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::AgentError;
use crate::state::{DeviceSnapshot, Subgoal, ToolCall, ToolExchange};

/// Decision produced by a reasoning stage: what to do next.
///
/// `payload` is the opaque structured-decisions blob handed to downstream
/// stages; `tool_calls` are the device actions this decision requests.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Decision {
    /// Opaque decision payload (stringified structured decisions).
    pub payload: String,
    /// Free-text rationale for the narrative log.
    pub rationale: String,
    /// Subgoal ids this decision believes are finished.
    pub complete_subgoal_ids: Vec<String>,
    /// Requested device actions, in execution order.
    pub tool_calls: Vec<ToolCall>,
}

impl Decision {
    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}

/// Output of the planning stage: ordered subgoal descriptions.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PlanOutcome {
    pub subgoals: Vec<String>,
}

/// Output of the subgoal review stage.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SubgoalReview {
    /// Subgoal ids confirmed complete.
    pub completed_subgoal_ids: Vec<String>,
    /// Whether the plan no longer fits and a replan is needed.
    pub needs_replanning: bool,
    /// Free-text reason for the narrative log.
    pub reason: String,
}

/// Context snapshot handed to the reasoning collaborator.
///
/// Built from the task state by each stage node; prompt construction from it
/// is the collaborator's concern.
#[derive(Debug, Clone, Default)]
pub struct ReasonContext {
    pub goal: String,
    pub subgoal_plan: Vec<Subgoal>,
    pub complete_subgoal_ids: Vec<String>,
    pub device_context: Option<DeviceSnapshot>,
    pub agent_thoughts: Vec<String>,
    /// Most recent tool exchanges, newest last (for feedback / validation).
    pub recent_exchanges: Vec<ToolExchange>,
    /// Planning stage only: whether this is a replan after a failure.
    pub replan: bool,
}

/// How many trailing exchanges stages put into the context.
pub const RECENT_EXCHANGE_WINDOW: usize = 10;

impl ReasonContext {
    /// Snapshot of the given state with the trailing exchange window.
    pub fn from_state(state: &crate::state::TaskState) -> Self {
        let start = state
            .tool_exchange_log
            .len()
            .saturating_sub(RECENT_EXCHANGE_WINDOW);
        Self {
            goal: state.initial_goal.clone(),
            subgoal_plan: state.subgoal_plan.clone(),
            complete_subgoal_ids: state.complete_subgoal_ids.clone(),
            device_context: state.device_context.clone(),
            agent_thoughts: state.agent_thoughts.clone(),
            recent_exchanges: state.tool_exchange_log[start..].to_vec(),
            replan: false,
        }
    }
}

/// Reasoning/model collaborator: turns context into stage outputs.
///
/// Implementations own prompting, model choice and output parsing. Every
/// method may return `Ok(None)` for an empty model output; callers invoke
/// these only through [`resilient::invoke_with_fallback`].
#[async_trait]
pub trait Reasoner: Send + Sync {
    /// Produce a fresh ordered subgoal plan for the goal (or a replan).
    async fn plan(&self, ctx: &ReasonContext) -> Result<Option<PlanOutcome>, AgentError>;

    /// Review subgoal progress: confirm completions, flag a needed replan.
    async fn review_subgoals(&self, ctx: &ReasonContext)
        -> Result<Option<SubgoalReview>, AgentError>;

    /// Produce the next decision (structured payload plus requested tool calls).
    async fn decide(&self, ctx: &ReasonContext) -> Result<Option<Decision>, AgentError>;

    /// Produce a short cycle summary for the narrative log.
    async fn summarize(&self, ctx: &ReasonContext) -> Result<Option<String>, AgentError>;
}

type Scripted<T> = Mutex<VecDeque<Result<Option<T>, String>>>;

fn pop<T>(queue: &Scripted<T>) -> Result<Option<T>, AgentError> {
    match queue.lock().unwrap().pop_front() {
        Some(Ok(v)) => Ok(v),
        Some(Err(msg)) => Err(AgentError::Inference(msg)),
        None => Ok(None),
    }
}

/// Scripted reasoner for tests: each method pops from its own response queue;
/// an exhausted queue yields `Ok(None)`.
#[derive(Default)]
pub struct MockReasoner {
    plans: Scripted<PlanOutcome>,
    reviews: Scripted<SubgoalReview>,
    decisions: Scripted<Decision>,
    summaries: Scripted<String>,
}

impl MockReasoner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_plan(self, subgoals: Vec<&str>) -> Self {
        self.plans.lock().unwrap().push_back(Ok(Some(PlanOutcome {
            subgoals: subgoals.into_iter().map(String::from).collect(),
        })));
        self
    }

    pub fn push_review(self, review: SubgoalReview) -> Self {
        self.reviews.lock().unwrap().push_back(Ok(Some(review)));
        self
    }

    pub fn push_decision(self, decision: Decision) -> Self {
        self.decisions.lock().unwrap().push_back(Ok(Some(decision)));
        self
    }

    pub fn push_empty_decision(self) -> Self {
        self.decisions.lock().unwrap().push_back(Ok(None));
        self
    }

    pub fn push_summary(self, text: &str) -> Self {
        self.summaries
            .lock()
            .unwrap()
            .push_back(Ok(Some(text.to_string())));
        self
    }

    pub fn push_plan_error(self, msg: &str) -> Self {
        self.plans.lock().unwrap().push_back(Err(msg.to_string()));
        self
    }

    pub fn push_review_error(self, msg: &str) -> Self {
        self.reviews.lock().unwrap().push_back(Err(msg.to_string()));
        self
    }

    pub fn push_decision_error(self, msg: &str) -> Self {
        self.decisions
            .lock()
            .unwrap()
            .push_back(Err(msg.to_string()));
        self
    }
}

#[async_trait]
impl Reasoner for MockReasoner {
    async fn plan(&self, _ctx: &ReasonContext) -> Result<Option<PlanOutcome>, AgentError> {
        pop(&self.plans)
    }

    async fn review_subgoals(
        &self,
        _ctx: &ReasonContext,
    ) -> Result<Option<SubgoalReview>, AgentError> {
        pop(&self.reviews)
    }

    async fn decide(&self, _ctx: &ReasonContext) -> Result<Option<Decision>, AgentError> {
        pop(&self.decisions)
    }

    async fn summarize(&self, _ctx: &ReasonContext) -> Result<Option<String>, AgentError> {
        pop(&self.summaries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Scenario**: MockReasoner replays scripted responses in order, then yields None.
    #[tokio::test]
    async fn mock_reasoner_pops_in_order() {
        let reasoner = MockReasoner::new()
            .push_plan(vec!["open the app", "send the message"])
            .push_plan_error("rate limited");

        let ctx = ReasonContext::default();
        let first = reasoner.plan(&ctx).await.unwrap().unwrap();
        assert_eq!(first.subgoals.len(), 2);

        let second = reasoner.plan(&ctx).await;
        assert!(matches!(second, Err(AgentError::Inference(_))));

        let third = reasoner.plan(&ctx).await.unwrap();
        assert!(third.is_none());
    }

    /// **Scenario**: from_state keeps only the trailing exchange window.
    #[test]
    fn reason_context_windows_exchanges() {
        use crate::state::{TaskState, ToolCall, ToolExchange, ToolResult};

        let mut state = TaskState::new("goal");
        for i in 0..(RECENT_EXCHANGE_WINDOW + 5) {
            let call = ToolCall::new("tap", serde_json::json!({"i": i}));
            let result = ToolResult::success(&call, "ok");
            state.tool_exchange_log.push(ToolExchange {
                request: call,
                result,
            });
        }

        let ctx = ReasonContext::from_state(&state);
        assert_eq!(ctx.recent_exchanges.len(), RECENT_EXCHANGE_WINDOW);
        assert_eq!(
            ctx.recent_exchanges.last().unwrap().request.arguments["i"],
            serde_json::json!(RECENT_EXCHANGE_WINDOW + 4)
        );
    }
}
