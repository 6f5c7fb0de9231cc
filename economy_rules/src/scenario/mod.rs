//! Scenario module - the authored decision graph.
//!
//! A scenario is a directed graph of decision nodes. Each node carries
//! narrative context and an ordered list of choices; each choice applies
//! indicator effects and names its successor (another node or the END
//! sentinel). Scenarios are authored in TOML, parsed once, validated
//! eagerly, and never mutated afterwards.

mod graph;
mod node;

pub use graph::*;
pub use node::*;
