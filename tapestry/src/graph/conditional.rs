//! Conditional edges: route to the next node(s) based on state.
//!
//! A source node's routing function takes the current state and returns one or
//! more keys; each key is either used as a next node id directly or looked up
//! in an optional path map. Returning more than one key fans execution out to
//! several successors in the same cycle (they later rejoin at a deferred
//! barrier node).
//!
//! Routing functions must be pure functions of state: given identical state
//! they return the identical key sequence.

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

/// Router function: takes a reference to state and returns routing keys.
pub type ConditionalRouterFn<S> = Arc<dyn Fn(&S) -> Vec<String> + Send + Sync>;

/// Conditional edge definition: routing function plus optional path map.
///
/// - When `path_map` is `None`, each returned key is the next node id.
/// - When `path_map` is `Some(map)`, each key resolves to `map[key]` if
///   present, otherwise the key itself.
#[derive(Clone)]
pub struct ConditionalRouter<S> {
    pub(super) path: ConditionalRouterFn<S>,
    pub(super) path_map: Option<HashMap<String, String>>,
}

impl<S> ConditionalRouter<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    pub fn new(path: ConditionalRouterFn<S>, path_map: Option<HashMap<String, String>>) -> Self {
        Self { path, path_map }
    }

    /// Resolves the next node ids from the current state, deduplicated with
    /// the first occurrence's position kept.
    pub fn resolve_next(&self, state: &S) -> Vec<String> {
        let mut targets: Vec<String> = Vec::new();
        for key in (self.path)(state) {
            let target = self
                .path_map
                .as_ref()
                .and_then(|m| m.get(&key))
                .cloned()
                .unwrap_or(key);
            if !targets.contains(&target) {
                targets.push(target);
            }
        }
        targets
    }
}

/// How to determine the next node(s) after a given node runs.
#[derive(Clone)]
pub enum NextEntry<S> {
    /// Single fixed next node (or END).
    Unconditional(String),
    /// Next node(s) decided by the router from state.
    Conditional(ConditionalRouter<S>),
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Scenario**: Keys map through the path map; unmapped keys pass through.
    #[test]
    fn resolve_next_maps_keys() {
        let path_map: HashMap<String, String> =
            [("tools".to_string(), "act".to_string())].into_iter().collect();
        let router: ConditionalRouter<i32> = ConditionalRouter::new(
            Arc::new(|_| vec!["tools".to_string(), "summarize".to_string()]),
            Some(path_map),
        );
        assert_eq!(router.resolve_next(&0), vec!["act", "summarize"]);
    }

    /// **Scenario**: Duplicate keys resolve to one target, first position kept.
    #[test]
    fn resolve_next_dedups_targets() {
        let router: ConditionalRouter<i32> = ConditionalRouter::new(
            Arc::new(|_| vec!["a".to_string(), "b".to_string(), "a".to_string()]),
            None,
        );
        assert_eq!(router.resolve_next(&0), vec!["a", "b"]);
    }

    /// **Scenario**: Routing is deterministic — identical state, identical targets.
    #[test]
    fn resolve_next_is_deterministic() {
        let router: ConditionalRouter<i32> = ConditionalRouter::new(
            Arc::new(|s| {
                if *s > 0 {
                    vec!["positive".to_string()]
                } else {
                    vec!["rest".to_string()]
                }
            }),
            None,
        );
        let first = router.resolve_next(&7);
        for _ in 0..5 {
            assert_eq!(router.resolve_next(&7), first);
        }
    }
}
