//! Graph construction flags.
//!
//! Flags are resolved once, before the graph is built; changing them mid-run
//! is undefined behavior by contract, which the API enforces by consuming the
//! config at construction time only.

/// Boolean feature flags consumed by [`TaskRunner`](crate::agent::flow::TaskRunner)
/// at graph-construction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphConfig {
    /// Full staged graph (true) vs the monolithic baseline (false).
    pub use_multi_stage_graph: bool,
    /// Sequential abort-on-failure dispatch (true) vs parallel no-abort (false).
    pub sequential_tool_execution: bool,
    /// Feed the latest tool outcomes to the cycle summary for validation.
    pub use_post_action_validation: bool,
    /// Keep screenshots in the perception snapshot.
    pub use_vision_context: bool,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            use_multi_stage_graph: true,
            sequential_tool_execution: true,
            use_post_action_validation: true,
            use_vision_context: true,
        }
    }
}

fn env_flag(key: &str, default: bool) -> bool {
    match std::env::var(key) {
        Ok(value) => matches!(
            value.trim().to_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        ),
        Err(_) => default,
    }
}

impl GraphConfig {
    /// Reads flags from `TAPESTRY_*` environment variables; unset flags keep
    /// their defaults (everything on).
    pub fn from_env() -> Self {
        Self {
            use_multi_stage_graph: env_flag("TAPESTRY_MULTI_STAGE_GRAPH", true),
            sequential_tool_execution: env_flag("TAPESTRY_SEQUENTIAL_TOOL_EXECUTION", true),
            use_post_action_validation: env_flag("TAPESTRY_POST_ACTION_VALIDATION", true),
            use_vision_context: env_flag("TAPESTRY_VISION_CONTEXT", true),
        }
    }

    /// Populates the environment from `.env` / XDG config, then reads the flags.
    pub fn load() -> Self {
        if let Err(e) = env_config::load_and_apply("tapestry", None) {
            tracing::warn!(error = %e, "config load failed, using environment as-is");
        }
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Scenario**: Unset flags default to the full production configuration.
    #[test]
    fn defaults_are_all_on() {
        let config = GraphConfig::default();
        assert!(config.use_multi_stage_graph);
        assert!(config.sequential_tool_execution);
        assert!(config.use_post_action_validation);
        assert!(config.use_vision_context);
    }

    /// **Scenario**: Env values toggle individual flags; unknown strings are off.
    #[test]
    fn env_flags_parse_truthy_values() {
        std::env::set_var("TAPESTRY_FLAG_PARSE_TEST", "false");
        assert!(!env_flag("TAPESTRY_FLAG_PARSE_TEST", true));

        std::env::set_var("TAPESTRY_FLAG_PARSE_TEST", "on");
        assert!(env_flag("TAPESTRY_FLAG_PARSE_TEST", false));

        std::env::set_var("TAPESTRY_FLAG_PARSE_TEST", "garbage");
        assert!(!env_flag("TAPESTRY_FLAG_PARSE_TEST", true));

        std::env::remove_var("TAPESTRY_FLAG_PARSE_TEST");
        assert!(env_flag("TAPESTRY_FLAG_PARSE_TEST", true));
        assert!(!env_flag("TAPESTRY_FLAG_PARSE_TEST", false));
    }
}
