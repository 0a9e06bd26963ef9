//! The staged device-agent flow: nodes, routing gates, and the runner.
//!
//! # Main types
//!
//! - **[`PlanNode`]**: drafts (or revises) the subgoal plan.
//! - **[`OrchestrateNode`]**: reviews subgoal progress, confirms completions,
//!   advances the plan, flags replans.
//! - **[`PerceiveNode`]**: refreshes the device snapshot.
//! - **[`ReasonNode`]**: turns state into the next [`Decision`](crate::llm::Decision).
//! - **[`ActNode`]**: executes the decision's tool calls through the dispatcher.
//! - **[`SummarizeNode`]**: appends the cycle narrative.
//! - **[`ConvergeNode`]**: deferred barrier where the cycle's branches rejoin.
//! - **[`MonolithicNode`]**: single-reasoner baseline stage.
//! - **[`TaskRunner`]**: builds either graph from [`GraphConfig`](crate::config::GraphConfig)
//!   and runs one goal to completion.
//!
//! Routing gates live in [`gates`] as pure functions of state so the
//! control-flow table stays testable on its own.

mod act_node;
mod converge_node;
pub mod gates;
mod monolithic_node;
mod orchestrate_node;
mod perceive_node;
mod plan_node;
mod reason_node;
mod reasoning;
mod runner;
mod summarize_node;

pub use act_node::ActNode;
pub use converge_node::ConvergeNode;
pub use monolithic_node::{MonolithicNode, COMPLETION_PHRASES};
pub use orchestrate_node::OrchestrateNode;
pub use perceive_node::PerceiveNode;
pub use plan_node::PlanNode;
pub use reason_node::ReasonNode;
pub use reasoning::ResilientReasoner;
pub use runner::TaskRunner;
pub use summarize_node::SummarizeNode;

use crate::state::{running_subgoal, StateUpdate, Subgoal, SubgoalStatus, TaskState};

/// Marks the currently running subgoal as failed with the given reason and
/// records a thought — the replan policy for unrecoverable reasoning failures.
/// With nothing running, only the thought is recorded.
pub(crate) fn fail_running_subgoal(state: &TaskState, reason: String) -> StateUpdate {
    let mut update = StateUpdate::thought(reason.clone());
    if let Some(current) = running_subgoal(&state.subgoal_plan) {
        update.subgoal_plan = Some(crate::state::PlanUpdate::Revise(vec![Subgoal {
            id: current.id.clone(),
            description: current.description.clone(),
            status: SubgoalStatus::Failure,
            completion_reason: Some(reason),
        }]));
    }
    update
}
