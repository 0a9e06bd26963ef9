//! Agent configurations built on the state graph.
//!
//! [`flow`] wires the staged mobile-agent graph (plan → orchestrate → perceive
//! → reason → act → summarize → converge) and its monolithic single-reasoner
//! variant.

pub mod flow;
