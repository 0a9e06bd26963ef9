//! Device tools: the trait every action collaborator implements, the registry
//! they are looked up in, and the dispatch engine that executes batches.

mod dispatch;
mod registry;
mod r#trait;

pub use dispatch::{DispatchMode, DispatchOutcome, ToolDispatcher, ABORTED_MESSAGE};
pub use r#trait::{tool_error, tool_success, DeviceTool, ToolExecutionError, ToolSpec};
pub use registry::ToolRegistry;
