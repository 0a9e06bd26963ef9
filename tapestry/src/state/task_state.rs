//! The task record, its partial update, and the per-field merge rules.

use crate::channels::{ChannelError, Patch, StateUpdater};
use crate::llm::Decision;

use super::device::DeviceSnapshot;
use super::subgoal::{merge_subgoal_plan, PlanUpdate, Subgoal};
use super::tool::ToolExchange;

/// The single mutable record threaded through one task run.
///
/// Created once per goal, discarded at completion; never shared across tasks.
/// Fields are written only through [`StateUpdate`]s folded in by
/// [`TaskStateUpdater`], with the field ownership partition enforced by the
/// graph: at most one writer per field per scheduling step.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TaskState {
    /// The user's goal; set at task start, never mutated.
    pub initial_goal: String,
    /// Current plan; mutated only by the planning/orchestration stages.
    pub subgoal_plan: Vec<Subgoal>,
    /// Latest reasoning output; cleared once the action stage consumes it.
    pub structured_decisions: Option<Decision>,
    /// Subgoal ids the current decision believes are finished; consumed and
    /// cleared by the orchestration stage each cycle.
    pub complete_subgoal_ids: Vec<String>,
    /// Ephemeral perception snapshot; replaced each cycle, cleared after use.
    pub device_context: Option<DeviceSnapshot>,
    /// Append-only log of every tool request/result pair; never truncated.
    pub tool_exchange_log: Vec<ToolExchange>,
    /// Append-only running narrative used for meta-reasoning context.
    pub agent_thoughts: Vec<String>,
    /// Terminal flag; once set it stays set.
    pub run_complete: bool,
}

impl TaskState {
    /// Fresh state for one goal: empty plan, empty logs.
    pub fn new(goal: impl Into<String>) -> Self {
        Self {
            initial_goal: goal.into(),
            subgoal_plan: Vec::new(),
            structured_decisions: None,
            complete_subgoal_ids: Vec::new(),
            device_context: None,
            tool_exchange_log: Vec::new(),
            agent_thoughts: Vec::new(),
            run_complete: false,
        }
    }

    /// Applies one partial update with this record's per-field merge rules.
    ///
    /// Keys absent from the update (Patch::Keep, empty vectors, `None` plan)
    /// leave their fields untouched, so an empty update is an identity.
    pub fn apply(&mut self, update: &StateUpdate) {
        if let Some(plan) = &update.subgoal_plan {
            merge_subgoal_plan(&mut self.subgoal_plan, plan);
        }
        update
            .structured_decisions
            .clone()
            .apply_to(&mut self.structured_decisions);
        update
            .complete_subgoal_ids
            .clone()
            .apply_to_value(&mut self.complete_subgoal_ids);
        update
            .device_context
            .clone()
            .apply_to(&mut self.device_context);
        self.tool_exchange_log
            .extend(update.tool_exchanges.iter().cloned());
        self.agent_thoughts
            .extend(update.agent_thoughts.iter().cloned());
        self.run_complete |= update.run_complete;
    }
}

/// Partial update of [`TaskState`], returned by every graph node.
///
/// Replace-rule fields use [`Patch`]; append-rule fields are plain vectors
/// (empty means no-op); the subgoal plan uses the custom [`PlanUpdate`]
/// reducer. `run_complete` folds with OR.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StateUpdate {
    pub subgoal_plan: Option<PlanUpdate>,
    pub structured_decisions: Patch<Decision>,
    pub complete_subgoal_ids: Patch<Vec<String>>,
    pub device_context: Patch<DeviceSnapshot>,
    pub tool_exchanges: Vec<ToolExchange>,
    pub agent_thoughts: Vec<String>,
    pub run_complete: bool,
}

impl StateUpdate {
    /// Update that only appends one narrative thought.
    pub fn thought(text: impl Into<String>) -> Self {
        Self {
            agent_thoughts: vec![text.into()],
            ..Self::default()
        }
    }

    /// Update that installs a revised subgoal list (forward transitions only).
    pub fn revise_plan(subgoals: Vec<Subgoal>) -> Self {
        Self {
            subgoal_plan: Some(PlanUpdate::Revise(subgoals)),
            ..Self::default()
        }
    }

    /// Update that replaces the plan wholesale (replan).
    pub fn replace_plan(subgoals: Vec<Subgoal>) -> Self {
        Self {
            subgoal_plan: Some(PlanUpdate::Replace(subgoals)),
            ..Self::default()
        }
    }
}

/// Merge rules for [`TaskState`]: per-field reducers plus the same-step
/// conflict scan on replace-rule fields.
#[derive(Debug, Clone, Default)]
pub struct TaskStateUpdater;

fn check_replace_conflict<T: PartialEq + Clone + std::fmt::Debug>(
    field: &str,
    updates: &[(String, StateUpdate)],
    extract: impl Fn(&StateUpdate) -> &Patch<T>,
) -> Result<(), ChannelError> {
    let writers: Vec<(&str, &Patch<T>)> = updates
        .iter()
        .map(|(id, u)| (id.as_str(), extract(u)))
        .filter(|(_, p)| p.writes())
        .collect();
    for pair in writers.windows(2) {
        if pair[0].1 != pair[1].1 {
            return Err(ChannelError::Conflict(format!(
                "{} (writers: {}, {})",
                field, pair[0].0, pair[1].0
            )));
        }
    }
    Ok(())
}

impl StateUpdater<TaskState, StateUpdate> for TaskStateUpdater {
    fn apply_update(
        &self,
        current: &mut TaskState,
        update: &StateUpdate,
    ) -> Result<(), ChannelError> {
        current.apply(update);
        Ok(())
    }

    /// Scans the step's updates for conflicting replace-field writes before
    /// folding anything in, so a conflicting step leaves the state untouched.
    fn apply_step(
        &self,
        current: &mut TaskState,
        updates: &[(String, StateUpdate)],
    ) -> Result<(), ChannelError> {
        check_replace_conflict("structured_decisions", updates, |u| {
            &u.structured_decisions
        })?;
        check_replace_conflict("complete_subgoal_ids", updates, |u| {
            &u.complete_subgoal_ids
        })?;
        check_replace_conflict("device_context", updates, |u| &u.device_context)?;

        for (_, update) in updates {
            current.apply(update);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{SubgoalStatus, ToolCall, ToolResult};

    fn state_with_plan() -> TaskState {
        let mut state = TaskState::new("order a pizza");
        state.subgoal_plan = vec![
            Subgoal {
                id: "s1".to_string(),
                description: "open the app".to_string(),
                status: SubgoalStatus::Running,
                completion_reason: None,
            },
            Subgoal {
                id: "s2".to_string(),
                description: "pick a pizza".to_string(),
                status: SubgoalStatus::Pending,
                completion_reason: None,
            },
        ];
        state
    }

    /// **Scenario**: Applying an empty update leaves the state field-for-field identical.
    #[test]
    fn empty_update_is_identity() {
        let mut state = state_with_plan();
        state.agent_thoughts.push("opened the app".to_string());
        let before = state.clone();

        state.apply(&StateUpdate::default());

        assert_eq!(state, before);
    }

    /// **Scenario**: Append fields concatenate; replace fields take the new value.
    #[test]
    fn apply_merges_per_field() {
        let mut state = state_with_plan();
        state.agent_thoughts.push("first".to_string());

        let call = ToolCall::new("tap", serde_json::json!({"x": 1}));
        let result = ToolResult::success(&call, "ok");
        let update = StateUpdate {
            device_context: Patch::Set(DeviceSnapshot::empty()),
            tool_exchanges: vec![ToolExchange {
                request: call,
                result,
            }],
            agent_thoughts: vec!["second".to_string()],
            ..StateUpdate::default()
        };

        state.apply(&update);

        assert!(state.device_context.is_some());
        assert_eq!(state.tool_exchange_log.len(), 1);
        assert_eq!(state.agent_thoughts, vec!["first", "second"]);
    }

    /// **Scenario**: run_complete folds with OR; a later false never unsets it.
    #[test]
    fn run_complete_is_sticky() {
        let mut state = TaskState::new("goal");
        state.apply(&StateUpdate {
            run_complete: true,
            ..StateUpdate::default()
        });
        state.apply(&StateUpdate::default());
        assert!(state.run_complete);
    }

    /// **Scenario**: Two same-step writers setting different values on a replace
    /// field fail with a conflict and leave the state untouched.
    #[test]
    fn step_with_conflicting_replace_writes_fails() {
        let updater = TaskStateUpdater;
        let mut state = state_with_plan();
        let before = state.clone();

        let updates = vec![
            (
                "reason".to_string(),
                StateUpdate {
                    device_context: Patch::Set(DeviceSnapshot::empty()),
                    ..StateUpdate::default()
                },
            ),
            (
                "perceive".to_string(),
                StateUpdate {
                    device_context: Patch::Clear,
                    ..StateUpdate::default()
                },
            ),
        ];

        let err = updater.apply_step(&mut state, &updates).unwrap_err();
        assert!(matches!(err, ChannelError::Conflict(_)));
        assert!(err.to_string().contains("device_context"), "{}", err);
        assert_eq!(state, before, "conflicting step must not partially apply");
    }

    /// **Scenario**: Two writers agreeing on the same value do not conflict.
    #[test]
    fn step_with_identical_writes_is_allowed() {
        let updater = TaskStateUpdater;
        let mut state = state_with_plan();

        let updates = vec![
            (
                "a".to_string(),
                StateUpdate {
                    complete_subgoal_ids: Patch::Clear,
                    ..StateUpdate::default()
                },
            ),
            (
                "b".to_string(),
                StateUpdate {
                    complete_subgoal_ids: Patch::Clear,
                    ..StateUpdate::default()
                },
            ),
        ];

        updater.apply_step(&mut state, &updates).unwrap();
        assert!(state.complete_subgoal_ids.is_empty());
    }

    /// **Scenario**: A fan-out step touching disjoint fields merges both updates.
    #[test]
    fn step_with_disjoint_writers_merges_both() {
        let updater = TaskStateUpdater;
        let mut state = state_with_plan();

        let updates = vec![
            (
                "orchestrate".to_string(),
                StateUpdate {
                    subgoal_plan: Some(PlanUpdate::Revise(vec![Subgoal {
                        id: "s1".to_string(),
                        description: "open the app".to_string(),
                        status: SubgoalStatus::Success,
                        completion_reason: Some("app visible".to_string()),
                    }])),
                    complete_subgoal_ids: Patch::Clear,
                    ..StateUpdate::default()
                },
            ),
            (
                "summarize".to_string(),
                StateUpdate::thought("cycle done"),
            ),
        ];

        updater.apply_step(&mut state, &updates).unwrap();
        assert_eq!(state.subgoal_plan[0].status, SubgoalStatus::Success);
        assert_eq!(state.agent_thoughts, vec!["cycle done"]);
    }
}
