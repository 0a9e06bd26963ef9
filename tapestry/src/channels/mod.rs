//! Merge semantics for graph state: per-step updaters and field patches.
//!
//! Nodes return partial updates; how those updates fold into the shared state is
//! decided by a [`StateUpdater`]. The default [`ReplaceUpdater`] keeps the simple
//! whole-state-replace behavior for graphs whose update type is the state itself;
//! richer states implement field-level rules (replace / append / custom reduce)
//! and use [`Patch`] for clearable replace-fields.

mod error;
mod patch;
mod updater;

pub use error::ChannelError;
pub use patch::Patch;
pub use updater::{BoxedStateUpdater, ReplaceUpdater, StateUpdater};
