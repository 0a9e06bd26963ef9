//! Tool registry: name → tool lookup shared by the dispatcher.

use std::collections::HashMap;
use std::sync::Arc;

use super::r#trait::{DeviceTool, ToolSpec};

/// Stores tools by name. Unknown names are reported by the dispatcher as error
/// results, never as panics.
#[derive(Default, Clone)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn DeviceTool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a tool under its own name; replaces an existing entry.
    pub fn register(&mut self, tool: Arc<dyn DeviceTool>) -> &mut Self {
        self.tools.insert(tool.name().to_string(), tool);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn DeviceTool>> {
        self.tools.get(name)
    }

    /// Specs of all registered tools, sorted by name for stable prompts.
    pub fn specs(&self) -> Vec<ToolSpec> {
        let mut specs: Vec<ToolSpec> = self.tools.values().map(|t| t.spec()).collect();
        specs.sort_by(|a, b| a.name.cmp(&b.name));
        specs
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
