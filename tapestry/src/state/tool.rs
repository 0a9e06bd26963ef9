//! Tool call / result types: one side-effecting device action per pair.

use uuid::Uuid;

/// A single tool invocation requested by a reasoning stage.
///
/// Immutable once produced; the dispatch engine never rewrites a call.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub arguments: serde_json::Value,
}

impl ToolCall {
    pub fn new(name: impl Into<String>, arguments: serde_json::Value) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            arguments,
        }
    }
}

/// Outcome status of one tool execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolStatus {
    Success,
    Error,
}

/// Result of one tool execution, paired to its call by `tool_call_id`.
///
/// Produced by the dispatch engine; one result per call, in request order,
/// in both dispatch modes.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ToolResult {
    pub tool_call_id: String,
    pub content: String,
    pub status: ToolStatus,
}

impl ToolResult {
    pub fn success(call: &ToolCall, content: impl Into<String>) -> Self {
        Self {
            tool_call_id: call.id.clone(),
            content: content.into(),
            status: ToolStatus::Success,
        }
    }

    pub fn error(call: &ToolCall, content: impl Into<String>) -> Self {
        Self {
            tool_call_id: call.id.clone(),
            content: content.into(),
            status: ToolStatus::Error,
        }
    }

    pub fn is_error(&self) -> bool {
        self.status == ToolStatus::Error
    }
}

/// One request/response pair in the append-only exchange log.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ToolExchange {
    pub request: ToolCall,
    pub result: ToolResult,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// **Scenario**: Results built from a call carry its id and the right status.
    #[test]
    fn result_constructors_pair_with_call() {
        let call = ToolCall::new("tap", json!({"x": 10, "y": 20}));
        let ok = ToolResult::success(&call, "tapped");
        assert_eq!(ok.tool_call_id, call.id);
        assert!(!ok.is_error());

        let err = ToolResult::error(&call, "element not found");
        assert_eq!(err.tool_call_id, call.id);
        assert!(err.is_error());
    }

    /// **Scenario**: ToolStatus serializes lowercase, matching the wire convention.
    #[test]
    fn tool_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&ToolStatus::Success).unwrap(),
            "\"success\""
        );
        assert_eq!(
            serde_json::to_string(&ToolStatus::Error).unwrap(),
            "\"error\""
        );
    }
}
