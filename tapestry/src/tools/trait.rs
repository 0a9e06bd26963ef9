//! Device tool trait: one named side-effecting action per implementation.

use async_trait::async_trait;
use thiserror::Error;

/// Execution error of one tool call. Never crosses the dispatch engine
/// boundary: the engine converts it into an error `ToolResult`.
#[derive(Debug, Error)]
pub enum ToolExecutionError {
    /// Arguments did not match the tool's schema.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// The action failed on the device (element not found, transport error...).
    #[error("{0}")]
    Failed(String),
}

/// Specification of one tool: name, description for the model, argument schema.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: Option<String>,
    pub input_schema: serde_json::Value,
}

/// Builds the conventional success payload `{"status": "success", "content": ...}`.
pub fn tool_success(content: impl Into<String>) -> serde_json::Value {
    serde_json::json!({ "status": "success", "content": content.into() })
}

/// Builds the conventional error payload `{"status": "error", "content": ...}`.
pub fn tool_error(content: impl Into<String>) -> serde_json::Value {
    serde_json::json!({ "status": "error", "content": content.into() })
}

/// A single named device action callable by the agent.
///
/// Implementations wrap whatever transport actually drives the device; the
/// dispatch engine treats them all uniformly. The returned JSON payload is
/// expected to follow the `{"status", "content"}` convention ([`tool_success`] /
/// [`tool_error`]); anything else is classified as an unrecognized output by
/// the engine.
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use serde_json::Value;
/// use tapestry::tools::{tool_success, DeviceTool, ToolExecutionError, ToolSpec};
///
/// struct TapTool;
///
/// #[async_trait]
/// impl DeviceTool for TapTool {
///     fn name(&self) -> &str {
///         "tap"
///     }
///
///     fn spec(&self) -> ToolSpec {
///         ToolSpec {
///             name: "tap".to_string(),
///             description: Some("Tap the screen at the given coordinates".to_string()),
///             input_schema: serde_json::json!({
///                 "type": "object",
///                 "properties": {
///                     "x": { "type": "integer" },
///                     "y": { "type": "integer" }
///                 },
///                 "required": ["x", "y"]
///             }),
///         }
///     }
///
///     async fn execute(&self, _args: Value) -> Result<Value, ToolExecutionError> {
///         Ok(tool_success("tapped"))
///     }
/// }
/// ```
#[async_trait]
pub trait DeviceTool: Send + Sync {
    /// Unique name of this tool within a registry.
    fn name(&self) -> &str;

    /// Specification used to advertise the tool to the reasoning collaborator.
    fn spec(&self) -> ToolSpec;

    /// Executes the action. The payload should follow the status/content
    /// convention; a raised error is recorded as an error result.
    async fn execute(
        &self,
        args: serde_json::Value,
    ) -> Result<serde_json::Value, ToolExecutionError>;
}
