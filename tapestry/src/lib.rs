//! # Tapestry
//!
//! The orchestration core of an autonomous mobile-device agent: a staged
//! reasoning graph with a **state-in, update-out** design. One shared
//! [`TaskState`] flows through named nodes; each node returns a partial
//! [`StateUpdate`] folded in with per-field merge rules, and pure routing
//! gates pick the next node(s) from the updated state.
//!
//! ## Design principles
//!
//! - **Single task record**: One [`TaskState`] per goal, created at task start
//!   and discarded at completion. Fields declare their merge rule (replace,
//!   append, custom subgoal reduce); same-step conflicting writes are fatal.
//! - **Table-driven control flow**: Nodes never choose successors. The graph's
//!   edge table and [`gates`](agent::flow::gates) — pure functions of state —
//!   own routing, so the control flow is inspectable and testable on its own.
//! - **Fan-out with a barrier**: The reasoning stage may route to the review
//!   and action branches in the same cycle; a deferred converge node runs once
//!   both have finished and decides replan / continue / end.
//! - **Failures as data**: Per-tool failures become error results (sequential
//!   dispatch aborts the rest of the batch; parallel dispatch isolates them).
//!   Model calls get one fallback attempt; a wait notice is observability
//!   only and never cancels the underlying call.
//!
//! ## Main modules
//!
//! - [`graph`]: [`StateGraph`], [`CompiledStateGraph`], [`Node`] — build and
//!   run state graphs with conditional fan-out routing and deferred barriers.
//! - [`state`]: [`TaskState`], [`StateUpdate`], [`Subgoal`], [`ToolCall`],
//!   [`ToolResult`] — the record and its merge rules.
//! - [`channels`]: [`StateUpdater`], [`Patch`] — merge semantics.
//! - [`agent`]: [`agent::flow`] — the staged nodes, routing gates,
//!   [`TaskRunner`].
//! - [`llm`]: [`Reasoner`] collaborator, [`Decision`], resilient invocation
//!   ([`invoke_with_fallback`], [`invoke_with_wait_notice`]).
//! - [`tools`]: [`DeviceTool`], [`ToolRegistry`], [`ToolDispatcher`] with
//!   sequential/parallel disciplines.
//! - [`perception`]: [`DeviceSensor`] collaborator.
//! - [`observability`]: [`Observer`] sink, node-timing middleware.
//! - [`config`]: [`GraphConfig`] construction-time flags.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tapestry::agent::flow::{ResilientReasoner, TaskRunner};
//! use tapestry::config::GraphConfig;
//! use tapestry::llm::MockReasoner;
//! use tapestry::observability::NoopObserver;
//! use tapestry::perception::MockSensor;
//! use tapestry::tools::ToolRegistry;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let reasoner = ResilientReasoner::new(Arc::new(
//!     MockReasoner::new().push_plan(vec!["open the app", "send the message"]),
//! ));
//! let runner = TaskRunner::new(
//!     GraphConfig::default(),
//!     reasoner,
//!     Arc::new(MockSensor::new()),
//!     ToolRegistry::new(),
//!     Arc::new(NoopObserver),
//! )
//! .expect("graph compiles");
//!
//! match runner.run("message Bob that I'm running late").await {
//!     Ok(state) => println!("{} thoughts", state.agent_thoughts.len()),
//!     Err(e) => eprintln!("error: {}", e),
//! }
//! # }
//! ```

pub mod agent;
pub mod channels;
pub mod config;
pub mod error;
pub mod graph;
pub mod llm;
pub mod observability;
pub mod perception;
pub mod state;
pub mod tools;

pub use agent::flow::{ResilientReasoner, TaskRunner};
pub use channels::{ChannelError, Patch, ReplaceUpdater, StateUpdater};
pub use config::GraphConfig;
pub use error::AgentError;
pub use graph::{
    CompilationError, CompiledStateGraph, ConditionalRouter, Node, NodeMiddleware, StateGraph,
    END, START,
};
pub use llm::resilient::{invoke_with_fallback, invoke_with_wait_notice, DEFAULT_WAIT_NOTICE};
pub use llm::{Decision, MockReasoner, PlanOutcome, ReasonContext, Reasoner, SubgoalReview};
pub use observability::{
    NodeTimingMiddleware, NoopObserver, Observer, RecordingObserver, TracingObserver,
};
pub use perception::{DeviceSensor, MockSensor};
pub use state::{
    DeviceSnapshot, PlanUpdate, StateUpdate, Subgoal, SubgoalStatus, TaskState, TaskStateUpdater,
    ToolCall, ToolExchange, ToolResult, ToolStatus,
};
pub use tools::{
    DeviceTool, DispatchMode, DispatchOutcome, ToolDispatcher, ToolExecutionError, ToolRegistry,
    ToolSpec,
};
