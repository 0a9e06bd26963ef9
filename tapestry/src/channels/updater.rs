//! State updater: how node outputs merge into the shared state.
//!
//! Per-field update strategies (similar to `Annotated` reducers in graph
//! frameworks): some fields are replaced, some appended, some folded with a
//! custom reducer. In Rust this is a trait over `(state, update)` pairs: the
//! graph is generic over both the state type `S` and the update type `U`, and
//! a `StateUpdater<S, U>` folds each node's partial update into the state.
//!
//! When several nodes run in one scheduling step (fan-out), the graph hands the
//! whole step's updates to [`StateUpdater::apply_step`] so implementations can
//! check cross-update invariants (e.g. two writers on one replace field) before
//! folding anything in.

use std::fmt::Debug;
use std::sync::Arc;

use super::ChannelError;

/// Trait for merging node outputs into the current state.
///
/// Implementations define the merge rule per field. The graph calls
/// `apply_step` once per scheduling step with every `(node_id, update)` pair
/// that ran in that step, in execution order.
pub trait StateUpdater<S, U>: Send + Sync
where
    S: Clone + Send + Sync + Debug + 'static,
    U: Clone + Send + Sync + Debug + 'static,
{
    /// Applies one update to the current state.
    fn apply_update(&self, current: &mut S, update: &U) -> Result<(), ChannelError>;

    /// Applies all updates of one scheduling step, in order.
    ///
    /// The default implementation folds each update independently; overrides can
    /// scan the batch for conflicting writes first.
    fn apply_step(&self, current: &mut S, updates: &[(String, U)]) -> Result<(), ChannelError> {
        for (_, update) in updates {
            self.apply_update(current, update)?;
        }
        Ok(())
    }
}

/// Default state updater that replaces the entire state.
///
/// Usable when the update type is the state itself: the node's return value
/// completely replaces the previous state.
#[derive(Debug, Clone, Default)]
pub struct ReplaceUpdater;

impl<S> StateUpdater<S, S> for ReplaceUpdater
where
    S: Clone + Send + Sync + Debug + 'static,
{
    fn apply_update(&self, current: &mut S, update: &S) -> Result<(), ChannelError> {
        *current = update.clone();
        Ok(())
    }
}

/// Boxed state updater for type erasure.
pub type BoxedStateUpdater<S, U> = Arc<dyn StateUpdater<S, U>>;
