//! Subgoals: one step of the plan, with a forward-only lifecycle status.

use uuid::Uuid;

/// Lifecycle status of a subgoal.
///
/// Transitions only move forward: Pending → Running → {Success, Failure}.
/// The only sanctioned reset is a full replan ([`PlanUpdate::Replace`]),
/// which installs a fresh plan with Pending subgoals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum SubgoalStatus {
    Pending,
    Running,
    Success,
    Failure,
}

impl SubgoalStatus {
    fn rank(self) -> u8 {
        match self {
            SubgoalStatus::Pending => 0,
            SubgoalStatus::Running => 1,
            SubgoalStatus::Success | SubgoalStatus::Failure => 2,
        }
    }

    /// Whether moving from `self` to `next` is a forward transition.
    pub fn can_advance_to(self, next: SubgoalStatus) -> bool {
        next.rank() > self.rank()
    }

    /// Terminal statuses need no further work.
    pub fn is_terminal(self) -> bool {
        matches!(self, SubgoalStatus::Success | SubgoalStatus::Failure)
    }
}

/// One step of the overall plan.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Subgoal {
    pub id: String,
    pub description: String,
    pub status: SubgoalStatus,
    pub completion_reason: Option<String>,
}

impl Subgoal {
    /// New pending subgoal with a fresh id.
    pub fn pending(description: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            description: description.into(),
            status: SubgoalStatus::Pending,
            completion_reason: None,
        }
    }
}

impl std::fmt::Display for Subgoal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.status, self.description)
    }
}

/// Update instruction for the subgoal plan.
///
/// `Revise` carries per-subgoal transitions (matched by id, forward-only);
/// `Replace` installs a whole new plan and is emitted only by the planning
/// stage when replanning.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum PlanUpdate {
    Revise(Vec<Subgoal>),
    Replace(Vec<Subgoal>),
}

/// Merge reducer for the subgoal plan.
///
/// `Replace` swaps the plan wholesale. `Revise` matches entries by id and
/// applies the new status only when it is a forward transition; a forward
/// transition also takes the new completion reason. Unknown ids are appended,
/// preserving the update's order.
pub fn merge_subgoal_plan(current: &mut Vec<Subgoal>, update: &PlanUpdate) {
    match update {
        PlanUpdate::Replace(plan) => {
            *current = plan.clone();
        }
        PlanUpdate::Revise(revisions) => {
            for revised in revisions {
                match current.iter_mut().find(|s| s.id == revised.id) {
                    Some(existing) => {
                        if existing.status.can_advance_to(revised.status) {
                            existing.status = revised.status;
                            if revised.completion_reason.is_some() {
                                existing.completion_reason = revised.completion_reason.clone();
                            }
                        }
                    }
                    None => current.push(revised.clone()),
                }
            }
        }
    }
}

/// True when every subgoal finished with Success.
pub fn all_succeeded(plan: &[Subgoal]) -> bool {
    !plan.is_empty() && plan.iter().all(|s| s.status == SubgoalStatus::Success)
}

/// True when at least one subgoal is in Failure.
pub fn any_failed(plan: &[Subgoal]) -> bool {
    plan.iter().any(|s| s.status == SubgoalStatus::Failure)
}

/// The subgoal currently being worked on, if any (first Running, else first Pending).
pub fn running_subgoal(plan: &[Subgoal]) -> Option<&Subgoal> {
    plan.iter()
        .find(|s| s.status == SubgoalStatus::Running)
        .or_else(|| plan.iter().find(|s| s.status == SubgoalStatus::Pending))
}
