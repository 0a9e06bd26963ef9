//! Tool dispatch engine: run a batch of tool calls with one of two failure
//! disciplines.
//!
//! **Sequential** (production): calls run one after the other; once one fails,
//! the remaining calls are aborted — they are never executed and get a
//! synthesized error result. Later steps of a causal action sequence would
//! operate on an unknown device state.
//!
//! **Parallel** (baseline discipline): all calls are launched concurrently,
//! every failure is isolated to its own call, and results are recombined in
//! request order regardless of completion order.
//!
//! Per-call failures are data (`ToolResult` with error status), never raised
//! errors; a payload that does not follow the status/content convention
//! degrades to an error result as well.

use std::sync::Arc;

use tracing::{info, warn};

use crate::observability::{NoopObserver, Observer};
use crate::state::{ToolCall, ToolResult};

use super::registry::ToolRegistry;
use super::r#trait::ToolExecutionError;

/// Synthesized content for calls skipped after an earlier failure.
pub const ABORTED_MESSAGE: &str = "Aborted: a previous tool call failed!";

/// Batch execution discipline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchMode {
    /// In-order execution, abort remaining calls after the first failure.
    Sequential,
    /// Concurrent execution, per-call failure isolation, no abort.
    Parallel,
}

/// One executed (or aborted) call with its result.
#[derive(Debug, Clone)]
pub struct DispatchOutcome {
    pub call: ToolCall,
    pub result: ToolResult,
    pub failed: bool,
}

/// Executes tool call batches against a [`ToolRegistry`].
pub struct ToolDispatcher {
    registry: ToolRegistry,
    observer: Arc<dyn Observer>,
}

/// Extracts the conventional content field from a tool payload.
fn payload_content(value: &serde_json::Value) -> String {
    match value.get("content") {
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(v) => v.to_string(),
        None => String::new(),
    }
}

/// Classifies a completed payload by its status field. An unrecognized shape
/// is a failure signaling a contract violation; it degrades to an error
/// result and is handled like any other failure downstream.
fn classify_payload(call: &ToolCall, value: serde_json::Value) -> (ToolResult, bool) {
    match value.get("status").and_then(|s| s.as_str()) {
        Some("success") => (ToolResult::success(call, payload_content(&value)), false),
        Some("error") => (ToolResult::error(call, payload_content(&value)), true),
        _ => (
            ToolResult::error(call, format!("Unexpected tool output type: {}", value)),
            true,
        ),
    }
}

impl ToolDispatcher {
    pub fn new(registry: ToolRegistry) -> Self {
        Self {
            registry,
            observer: Arc::new(NoopObserver),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn Observer>) -> Self {
        self.observer = observer;
        self
    }

    /// Runs the batch under the given discipline.
    ///
    /// Always returns exactly one outcome per call, in request order.
    pub async fn dispatch(&self, calls: &[ToolCall], mode: DispatchMode) -> Vec<DispatchOutcome> {
        match mode {
            DispatchMode::Sequential => self.run_sequential(calls).await,
            DispatchMode::Parallel => self.run_parallel(calls).await,
        }
    }

    async fn execute_call(&self, call: &ToolCall) -> Result<serde_json::Value, ToolExecutionError> {
        match self.registry.get(&call.name) {
            Some(tool) => tool.execute(call.arguments.clone()).await,
            None => Err(ToolExecutionError::Failed(format!(
                "Unknown tool: {}",
                call.name
            ))),
        }
    }

    async fn run_sequential(&self, calls: &[ToolCall]) -> Vec<DispatchOutcome> {
        let mut outcomes = Vec::with_capacity(calls.len());
        let mut aborted = false;

        for call in calls {
            let (result, failed) = if aborted {
                (ToolResult::error(call, ABORTED_MESSAGE), true)
            } else {
                match self.execute_call(call).await {
                    Ok(value) => classify_payload(call, value),
                    Err(e) => (ToolResult::error(call, e.to_string()), true),
                }
            };
            if failed && !aborted {
                // The failing call keeps its own result; everything after is aborted.
                aborted = true;
            }
            self.log_and_notify(call, &result, failed);
            outcomes.push(DispatchOutcome {
                call: call.clone(),
                result,
                failed,
            });
        }

        outcomes
    }

    async fn run_parallel(&self, calls: &[ToolCall]) -> Vec<DispatchOutcome> {
        warn!("running tools in parallel mode (no abort on failure)");

        let mut handles = Vec::with_capacity(calls.len());
        for call in calls {
            let tool = self.registry.get(&call.name).cloned();
            let args = call.arguments.clone();
            let name = call.name.clone();
            handles.push(tokio::spawn(async move {
                match tool {
                    Some(t) => t.execute(args).await,
                    None => Err(ToolExecutionError::Failed(format!("Unknown tool: {}", name))),
                }
            }));
        }

        // Gather everything, then recombine in request order.
        let joined = futures::future::join_all(handles).await;
        let mut outcomes = Vec::with_capacity(calls.len());
        for (call, joined) in calls.iter().zip(joined) {
            let (result, failed) = match joined {
                Ok(Ok(value)) => classify_payload(call, value),
                Ok(Err(e)) => (
                    ToolResult::error(call, format!("Exception during parallel execution: {}", e)),
                    true,
                ),
                Err(join_error) => (
                    ToolResult::error(
                        call,
                        format!("Exception during parallel execution: {}", join_error),
                    ),
                    true,
                ),
            };
            self.log_and_notify(call, &result, failed);
            outcomes.push(DispatchOutcome {
                call: call.clone(),
                result,
                failed,
            });
        }

        outcomes
    }

    fn log_and_notify(&self, call: &ToolCall, result: &ToolResult, failed: bool) {
        if failed {
            info!(tool = %call.name, error = %result.content, "tool call failed");
            self.observer
                .on_tool_result(&call.name, false, Some(&result.content));
        } else {
            info!(tool = %call.name, "tool call succeeded");
            self.observer.on_tool_result(&call.name, true, None);
        }
    }
}
