//! Routing gates: pure functions of state → routing keys.
//!
//! Kept separate from node logic so the control-flow table can be inspected
//! and tested on its own. Gates are deterministic: identical state yields the
//! identical key sequence.

use crate::state::{all_succeeded, any_failed, running_subgoal, TaskState};

/// Routing key: review subgoal progress (→ orchestrate).
pub const REVIEW_SUBGOALS: &str = "review_subgoals";
/// Routing key: execute the decision's tool calls (→ act).
pub const INVOKE_TOOLS: &str = "invoke_tools";
/// Routing key: decision carries no tool calls (→ summarize).
pub const SKIP_TOOLS: &str = "skip_tools";
/// Routing key: start the next perception cycle (→ perceive).
pub const CONTINUE: &str = "continue";
/// Routing key: the plan no longer fits (→ plan).
pub const REPLAN: &str = "replan";
/// Routing key: the run is over (→ END).
pub const END_RUN: &str = "end";

/// Routing after the reasoning stage — may fan out.
///
/// Subgoals reported complete (or no decision at all) route to the review
/// branch; a decision also routes to the action branch — straight to the
/// summary when it carries no tool calls. Producing nothing actionable
/// defaults to the review branch so the graph never stalls.
pub fn post_reason_gate(state: &TaskState) -> Vec<String> {
    let mut next = Vec::new();
    if !state.complete_subgoal_ids.is_empty() || state.structured_decisions.is_none() {
        next.push(REVIEW_SUBGOALS.to_string());
    }
    if let Some(decision) = &state.structured_decisions {
        if decision.has_tool_calls() {
            next.push(INVOKE_TOOLS.to_string());
        } else {
            next.push(SKIP_TOOLS.to_string());
        }
    }
    next
}

/// Routing at the convergence barrier, after the cycle's branches rejoined.
///
/// A failed subgoal asks for a replan. A fully successful plan — or one with
/// nothing left running or pending — ends the run, as does the terminal flag.
/// Otherwise the loop continues with a fresh perception.
pub fn convergence_gate(state: &TaskState) -> Vec<String> {
    let key = if state.run_complete {
        END_RUN
    } else if any_failed(&state.subgoal_plan) {
        REPLAN
    } else if all_succeeded(&state.subgoal_plan) {
        END_RUN
    } else if running_subgoal(&state.subgoal_plan).is_none() {
        END_RUN
    } else {
        CONTINUE
    };
    vec![key.to_string()]
}

/// Routing for the monolithic configuration.
///
/// The terminal flag (textual completion with no tool calls) ends the run;
/// requested tools route to the action stage; anything else loops back to
/// perception.
pub fn monolithic_gate(state: &TaskState) -> Vec<String> {
    let key = if state.run_complete {
        END_RUN
    } else if state
        .structured_decisions
        .as_ref()
        .is_some_and(|d| d.has_tool_calls())
    {
        INVOKE_TOOLS
    } else {
        CONTINUE
    };
    vec![key.to_string()]
}
