//! Orchestrate node: subgoal status review and replan decision.

use async_trait::async_trait;
use tracing::{info, warn};

use crate::channels::Patch;
use crate::error::AgentError;
use crate::graph::Node;
use crate::llm::ReasonContext;
use crate::state::{
    running_subgoal, StateUpdate, Subgoal, SubgoalStatus, TaskState,
};

use super::reasoning::ResilientReasoner;

/// Reviews subgoal progress each cycle: consumes the decision stage's
/// completion ids, asks the reasoner to confirm completions or flag a replan,
/// and advances the next pending subgoal to running.
///
/// An unrecoverable review failure is translated into a failed running
/// subgoal (replan routing) instead of crashing the task.
pub struct OrchestrateNode {
    reasoner: ResilientReasoner,
}

impl OrchestrateNode {
    pub fn new(reasoner: ResilientReasoner) -> Self {
        Self { reasoner }
    }
}

#[async_trait]
impl Node<TaskState, StateUpdate> for OrchestrateNode {
    fn id(&self) -> &str {
        "orchestrate"
    }

    async fn run(&self, state: TaskState) -> Result<StateUpdate, AgentError> {
        let ctx = ReasonContext::from_state(&state);
        let review = match self.reasoner.review_subgoals(&ctx).await {
            Ok(review) => review,
            Err(e) => {
                warn!(error = %e, "subgoal review failed on both models");
                let mut update =
                    super::fail_running_subgoal(&state, format!("Subgoal review failed: {}", e));
                update.complete_subgoal_ids = Patch::Clear;
                return Ok(update);
            }
        };

        // Ids the decision stage reported, plus whatever the review confirmed.
        let mut completed: Vec<String> = state.complete_subgoal_ids.clone();
        let mut needs_replanning = false;
        let mut reason: Option<String> = None;
        if let Some(review) = review {
            for id in review.completed_subgoal_ids {
                if !completed.contains(&id) {
                    completed.push(id);
                }
            }
            needs_replanning = review.needs_replanning;
            if !review.reason.is_empty() {
                reason = Some(review.reason);
            }
        }

        let mut revisions: Vec<Subgoal> = Vec::new();
        for subgoal in &state.subgoal_plan {
            if completed.contains(&subgoal.id) {
                revisions.push(Subgoal {
                    id: subgoal.id.clone(),
                    description: subgoal.description.clone(),
                    status: SubgoalStatus::Success,
                    completion_reason: reason.clone(),
                });
            }
        }

        if needs_replanning {
            if let Some(current) = running_subgoal(&state.subgoal_plan) {
                if !completed.contains(&current.id) {
                    info!(subgoal = %current.id, "marking running subgoal failed for replan");
                    revisions.push(Subgoal {
                        id: current.id.clone(),
                        description: current.description.clone(),
                        status: SubgoalStatus::Failure,
                        completion_reason: reason.clone(),
                    });
                }
            }
        } else {
            // Advance the plan: first subgoal left pending becomes running.
            let next = state
                .subgoal_plan
                .iter()
                .filter(|s| !completed.contains(&s.id))
                .find(|s| s.status == SubgoalStatus::Pending);
            if let Some(next) = next {
                revisions.push(Subgoal {
                    id: next.id.clone(),
                    description: next.description.clone(),
                    status: SubgoalStatus::Running,
                    completion_reason: None,
                });
            }
        }

        let mut update = StateUpdate::revise_plan(revisions);
        update.complete_subgoal_ids = Patch::Clear;
        if let Some(reason) = reason {
            update.agent_thoughts.push(reason);
        }
        Ok(update)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{MockReasoner, SubgoalReview};
    use crate::state::PlanUpdate;
    use std::sync::Arc;

    fn plan_state(statuses: &[(&str, SubgoalStatus)]) -> TaskState {
        let mut state = TaskState::new("goal");
        state.subgoal_plan = statuses
            .iter()
            .map(|(id, status)| Subgoal {
                id: id.to_string(),
                description: format!("step {}", id),
                status: *status,
                completion_reason: None,
            })
            .collect();
        state
    }

    fn node(reasoner: MockReasoner) -> OrchestrateNode {
        OrchestrateNode::new(ResilientReasoner::new(Arc::new(reasoner)))
    }

    /// **Scenario**: Completion ids from the decision stage are consumed —
    /// the subgoal goes to Success and the id set is cleared.
    #[tokio::test]
    async fn completes_reported_subgoals_and_clears_ids() {
        let mut state = plan_state(&[
            ("s1", SubgoalStatus::Running),
            ("s2", SubgoalStatus::Pending),
        ]);
        state.complete_subgoal_ids = vec!["s1".to_string()];

        let update = node(MockReasoner::new()).run(state).await.unwrap();

        assert_eq!(update.complete_subgoal_ids, Patch::Clear);
        match update.subgoal_plan {
            Some(PlanUpdate::Revise(revisions)) => {
                assert!(revisions
                    .iter()
                    .any(|s| s.id == "s1" && s.status == SubgoalStatus::Success));
                // The next pending subgoal starts running.
                assert!(revisions
                    .iter()
                    .any(|s| s.id == "s2" && s.status == SubgoalStatus::Running));
            }
            other => panic!("expected Revise, got {:?}", other),
        }
    }

    /// **Scenario**: A review flagging a replan fails the running subgoal.
    #[tokio::test]
    async fn replan_review_fails_running_subgoal() {
        let state = plan_state(&[("s1", SubgoalStatus::Running)]);
        let node = node(MockReasoner::new().push_review(SubgoalReview {
            completed_subgoal_ids: vec![],
            needs_replanning: true,
            reason: "screen does not match the plan".to_string(),
        }));

        let update = node.run(state).await.unwrap();

        match update.subgoal_plan {
            Some(PlanUpdate::Revise(revisions)) => {
                assert!(revisions
                    .iter()
                    .any(|s| s.id == "s1" && s.status == SubgoalStatus::Failure));
            }
            other => panic!("expected Revise, got {:?}", other),
        }
        assert!(update
            .agent_thoughts
            .iter()
            .any(|t| t.contains("does not match")));
    }

    /// **Scenario**: A review failure on both models degrades to a failed
    /// running subgoal instead of an error.
    #[tokio::test]
    async fn review_failure_translates_to_failed_subgoal() {
        let state = plan_state(&[("s1", SubgoalStatus::Running)]);
        let node = node(MockReasoner::new().push_review_error("review model down"));

        let update = node.run(state).await.unwrap();

        assert_eq!(update.complete_subgoal_ids, Patch::Clear);
        match update.subgoal_plan {
            Some(PlanUpdate::Revise(revisions)) => {
                assert_eq!(revisions[0].id, "s1");
                assert_eq!(revisions[0].status, SubgoalStatus::Failure);
            }
            other => panic!("expected Revise, got {:?}", other),
        }
    }

    /// **Scenario**: With nothing reported and no review output, the first
    /// pending subgoal advances to running.
    #[tokio::test]
    async fn advances_first_pending_subgoal() {
        let state = plan_state(&[
            ("s1", SubgoalStatus::Pending),
            ("s2", SubgoalStatus::Pending),
        ]);

        let update = node(MockReasoner::new()).run(state).await.unwrap();

        match update.subgoal_plan {
            Some(PlanUpdate::Revise(revisions)) => {
                assert_eq!(revisions.len(), 1);
                assert_eq!(revisions[0].id, "s1");
                assert_eq!(revisions[0].status, SubgoalStatus::Running);
            }
            other => panic!("expected Revise, got {:?}", other),
        }
    }
}
