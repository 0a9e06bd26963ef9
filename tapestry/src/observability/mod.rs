//! Observability collaborator: fire-and-forget notifications.
//!
//! The dispatcher reports per-tool outcomes and the graph middleware reports
//! per-node durations. Observers must never affect control flow — they take
//! `&self`, return nothing, and are free to drop events.

mod middleware;

pub use middleware::NodeTimingMiddleware;

use std::time::Duration;

/// Sink for execution telemetry. All methods are fire-and-forget.
pub trait Observer: Send + Sync {
    /// One tool call finished; `error` carries the message for failures.
    fn on_tool_result(&self, name: &str, success: bool, error: Option<&str>);

    /// One graph node finished; `error` carries the message for failed runs.
    fn on_node_duration(&self, node: &str, elapsed: Duration, error: Option<&str>);
}

/// Observer that drops every event.
#[derive(Debug, Clone, Default)]
pub struct NoopObserver;

impl Observer for NoopObserver {
    fn on_tool_result(&self, _name: &str, _success: bool, _error: Option<&str>) {}
    fn on_node_duration(&self, _node: &str, _elapsed: Duration, _error: Option<&str>) {}
}

/// Observer that forwards events to `tracing`.
#[derive(Debug, Clone, Default)]
pub struct TracingObserver;

impl Observer for TracingObserver {
    fn on_tool_result(&self, name: &str, success: bool, error: Option<&str>) {
        if success {
            tracing::info!(tool = %name, "tool call succeeded");
        } else {
            tracing::info!(tool = %name, error = error.unwrap_or(""), "tool call failed");
        }
    }

    fn on_node_duration(&self, node: &str, elapsed: Duration, error: Option<&str>) {
        match error {
            None => tracing::debug!(node = %node, ms = elapsed.as_millis() as u64, "node finished"),
            Some(e) => {
                tracing::debug!(node = %node, ms = elapsed.as_millis() as u64, error = %e, "node failed")
            }
        }
    }
}

/// Observer recording every event, for tests and debugging harnesses.
#[derive(Default)]
pub struct RecordingObserver {
    pub tool_events: std::sync::Mutex<Vec<(String, bool, Option<String>)>>,
    pub node_events: std::sync::Mutex<Vec<(String, Option<String>)>>,
}

impl Observer for RecordingObserver {
    fn on_tool_result(&self, name: &str, success: bool, error: Option<&str>) {
        self.tool_events.lock().unwrap().push((
            name.to_string(),
            success,
            error.map(String::from),
        ));
    }

    fn on_node_duration(&self, node: &str, _elapsed: Duration, error: Option<&str>) {
        self.node_events
            .lock()
            .unwrap()
            .push((node.to_string(), error.map(String::from)));
    }
}
