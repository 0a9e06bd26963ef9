//! Task state for the device-agent graph.
//!
//! One [`TaskState`] record is created per goal and threaded through every node
//! of the orchestration graph. Nodes return partial [`StateUpdate`]s; the
//! [`TaskStateUpdater`] folds them in with per-field merge rules (replace,
//! append, custom subgoal reduce) and rejects same-step conflicting writes.
//!
//! # Main types
//!
//! - [`TaskState`] / [`StateUpdate`] / [`TaskStateUpdater`]: the record, its
//!   partial update, and the merge rules.
//! - [`Subgoal`] / [`SubgoalStatus`] / [`PlanUpdate`]: the plan with
//!   forward-only status transitions; replanning is the only reset path.
//! - [`ToolCall`] / [`ToolResult`] / [`ToolExchange`]: one side-effecting
//!   device action request/response pair, appended to the exchange log.
//! - [`DeviceSnapshot`]: the ephemeral perception snapshot.

mod device;
mod subgoal;
mod task_state;
mod tool;

pub use device::DeviceSnapshot;
pub use subgoal::{
    all_succeeded, any_failed, running_subgoal, PlanUpdate, Subgoal, SubgoalStatus,
};
pub use task_state::{StateUpdate, TaskState, TaskStateUpdater};
pub use tool::{ToolCall, ToolExchange, ToolResult, ToolStatus};
