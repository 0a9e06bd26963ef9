//! Channel-related errors.

use thiserror::Error;

/// Errors that can occur when applying state updates.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// Invalid update operation.
    #[error("Invalid update: {0}")]
    InvalidUpdate(String),

    /// Two updates in the same scheduling step wrote different values to a
    /// replace-rule field. The graph surfaces this as a fatal merge conflict.
    #[error("Conflicting writes to replace field '{0}' in one step")]
    Conflict(String),
}
