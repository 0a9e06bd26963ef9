//! Task runner: build the configured graph once, run goals through it.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;

use crate::config::GraphConfig;
use crate::error::AgentError;
use crate::graph::{CompilationError, CompiledStateGraph, StateGraph, END, START};
use crate::observability::{NodeTimingMiddleware, Observer};
use crate::perception::DeviceSensor;
use crate::state::{StateUpdate, TaskState, TaskStateUpdater};
use crate::tools::{DispatchMode, ToolDispatcher, ToolRegistry};

use super::act_node::ActNode;
use super::converge_node::ConvergeNode;
use super::gates::{
    convergence_gate, monolithic_gate, post_reason_gate, CONTINUE, END_RUN, INVOKE_TOOLS, REPLAN,
    REVIEW_SUBGOALS, SKIP_TOOLS,
};
use super::monolithic_node::MonolithicNode;
use super::orchestrate_node::OrchestrateNode;
use super::perceive_node::PerceiveNode;
use super::plan_node::PlanNode;
use super::reason_node::ReasonNode;
use super::reasoning::ResilientReasoner;
use super::summarize_node::SummarizeNode;

/// Holds the compiled graph for one configuration; runs one goal per invoke.
///
/// Flags are consumed here, at construction time. Each [`run`](Self::run)
/// creates a fresh [`TaskState`] — nothing is shared between tasks.
pub struct TaskRunner {
    compiled: CompiledStateGraph<TaskState, StateUpdate>,
}

impl TaskRunner {
    pub fn new(
        config: GraphConfig,
        reasoner: ResilientReasoner,
        sensor: Arc<dyn DeviceSensor>,
        tools: ToolRegistry,
        observer: Arc<dyn Observer>,
    ) -> Result<Self, CompilationError> {
        let mode = if config.sequential_tool_execution {
            DispatchMode::Sequential
        } else {
            DispatchMode::Parallel
        };
        let dispatcher = ToolDispatcher::new(tools).with_observer(observer.clone());
        let act = ActNode::new(dispatcher, mode);
        let perceive = PerceiveNode::new(sensor, config.use_vision_context);
        let timing = Arc::new(NodeTimingMiddleware::new(observer));

        let compiled = if config.use_multi_stage_graph {
            Self::build_staged_graph(config, reasoner, perceive, act, timing)?
        } else {
            Self::build_monolithic_graph(reasoner, perceive, act, timing)?
        };
        info!(
            multi_stage = config.use_multi_stage_graph,
            sequential = config.sequential_tool_execution,
            "task graph compiled"
        );
        Ok(Self { compiled })
    }

    fn build_staged_graph(
        config: GraphConfig,
        reasoner: ResilientReasoner,
        perceive: PerceiveNode,
        act: ActNode,
        timing: Arc<NodeTimingMiddleware<TaskState, StateUpdate>>,
    ) -> Result<CompiledStateGraph<TaskState, StateUpdate>, CompilationError> {
        let mut graph: StateGraph<TaskState, StateUpdate> =
            StateGraph::with_updater(Arc::new(TaskStateUpdater)).with_middleware(timing);

        graph
            .add_node("plan", Arc::new(PlanNode::new(reasoner.clone())))
            .add_node(
                "orchestrate",
                Arc::new(OrchestrateNode::new(reasoner.clone())),
            )
            .add_node("perceive", Arc::new(perceive))
            .add_node("reason", Arc::new(ReasonNode::new(reasoner.clone())))
            .add_node("act", Arc::new(act))
            .add_node(
                "summarize",
                Arc::new(SummarizeNode::new(
                    reasoner,
                    config.use_post_action_validation,
                )),
            )
            .add_deferred_node("converge", Arc::new(ConvergeNode));

        let post_reason_map: HashMap<String, String> = [
            (REVIEW_SUBGOALS.to_string(), "orchestrate".to_string()),
            (INVOKE_TOOLS.to_string(), "act".to_string()),
            (SKIP_TOOLS.to_string(), "summarize".to_string()),
        ]
        .into_iter()
        .collect();
        let convergence_map: HashMap<String, String> = [
            (REPLAN.to_string(), "plan".to_string()),
            (CONTINUE.to_string(), "perceive".to_string()),
            (END_RUN.to_string(), END.to_string()),
        ]
        .into_iter()
        .collect();

        graph
            .add_edge(START, "plan")
            .add_edge("plan", "orchestrate")
            .add_edge("orchestrate", "converge")
            .add_edge("perceive", "reason")
            .add_edge("act", "summarize")
            .add_edge("summarize", "converge")
            .add_conditional_edges("reason", Arc::new(post_reason_gate), Some(post_reason_map))
            .add_conditional_edges(
                "converge",
                Arc::new(convergence_gate),
                Some(convergence_map),
            );

        graph.compile()
    }

    fn build_monolithic_graph(
        reasoner: ResilientReasoner,
        perceive: PerceiveNode,
        act: ActNode,
        timing: Arc<NodeTimingMiddleware<TaskState, StateUpdate>>,
    ) -> Result<CompiledStateGraph<TaskState, StateUpdate>, CompilationError> {
        let mut graph: StateGraph<TaskState, StateUpdate> =
            StateGraph::with_updater(Arc::new(TaskStateUpdater)).with_middleware(timing);

        graph
            .add_node("perceive", Arc::new(perceive))
            .add_node("reason", Arc::new(MonolithicNode::new(reasoner)))
            .add_node("act", Arc::new(act));

        let monolithic_map: HashMap<String, String> = [
            (INVOKE_TOOLS.to_string(), "act".to_string()),
            (CONTINUE.to_string(), "perceive".to_string()),
            (END_RUN.to_string(), END.to_string()),
        ]
        .into_iter()
        .collect();

        graph
            .add_edge(START, "perceive")
            .add_edge("perceive", "reason")
            .add_edge("act", "perceive")
            .add_conditional_edges("reason", Arc::new(monolithic_gate), Some(monolithic_map));

        graph.compile()
    }

    /// Runs one goal to completion and returns the final state.
    pub async fn run(&self, goal: &str) -> Result<TaskState, AgentError> {
        info!(goal, "starting task");
        let final_state = self.compiled.invoke(TaskState::new(goal)).await?;
        info!(
            complete = final_state.run_complete,
            thoughts = final_state.agent_thoughts.len(),
            exchanges = final_state.tool_exchange_log.len(),
            "task finished"
        );
        Ok(final_state)
    }
}
