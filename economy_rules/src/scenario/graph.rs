//! The decision graph - parsing, validation, and lookup.

use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, OnceLock};
use thiserror::Error;
use tracing::debug;

use super::{Choice, Node, NodeKey, Successor};

/// Errors raised while loading or querying a decision graph.
///
/// Every variant is an authoring defect. The graph is fixed and fully known
/// ahead of time, so all of these surface during the load-time validation
/// pass and none are recoverable at runtime.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("TOML error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("start node {0} is not defined")]
    UnknownStart(NodeKey),

    #[error("node {0} offers no choices")]
    NoChoices(NodeKey),

    #[error("node {node} references undefined successor {target}")]
    UnknownSuccessor { node: NodeKey, target: NodeKey },

    #[error("node {0} is unreachable from the start node")]
    UnreachableNode(NodeKey),

    #[error("no path from node {0} reaches END")]
    EndUnreachable(NodeKey),

    #[error("node not found: {0}")]
    NodeNotFound(NodeKey),
}

/// On-disk shape of an authored scenario document.
#[derive(Debug, Deserialize)]
struct ScenarioDoc {
    start: NodeKey,
    nodes: HashMap<String, NodeDoc>,
}

/// On-disk shape of a node. The key lives on the enclosing table.
#[derive(Debug, Deserialize)]
struct NodeDoc {
    title: String,
    narrative: String,
    #[serde(default)]
    concepts: Vec<String>,
    #[serde(default)]
    choices: Vec<Choice>,
}

/// An immutable, validated decision graph: a flat mapping from node key to
/// node, plus the designated start key.
#[derive(Debug, Clone)]
pub struct DecisionGraph {
    nodes: HashMap<NodeKey, Node>,
    start: NodeKey,
}

/// The built-in Prosperitia crisis scenario.
const STANDARD_SCENARIO: &str = include_str!("standard.toml");

static STANDARD: OnceLock<Arc<DecisionGraph>> = OnceLock::new();

impl DecisionGraph {
    /// Parse an authored scenario document and run the validation pass.
    pub fn from_toml_str(source: &str) -> Result<Self, GraphError> {
        let doc: ScenarioDoc = toml::from_str(source)?;

        let nodes: HashMap<NodeKey, Node> = doc
            .nodes
            .into_iter()
            .map(|(raw_key, node)| {
                let key = NodeKey(raw_key);
                let node = Node {
                    key: key.clone(),
                    title: node.title,
                    narrative: node.narrative,
                    concepts: node.concepts,
                    choices: node.choices,
                };
                (key, node)
            })
            .collect();

        let graph = Self {
            nodes,
            start: doc.start,
        };
        graph.validate()?;

        debug!(
            nodes = graph.nodes.len(),
            start = %graph.start,
            "decision graph loaded"
        );
        Ok(graph)
    }

    /// The standard scenario, built once at first use and shared.
    ///
    /// The embedded document is validated like any other; a failure here is
    /// a build defect caught by this crate's own tests.
    pub fn standard() -> Arc<DecisionGraph> {
        STANDARD
            .get_or_init(|| {
                Arc::new(
                    Self::from_toml_str(STANDARD_SCENARIO)
                        .expect("embedded standard scenario must be valid"),
                )
            })
            .clone()
    }

    /// The designated start key.
    pub fn start(&self) -> &NodeKey {
        &self.start
    }

    /// Look up a node, failing if the key is absent.
    ///
    /// Absence cannot occur once validation has passed; callers treat the
    /// error as fatal rather than recoverable.
    pub fn node(&self, key: &NodeKey) -> Result<&Node, GraphError> {
        self.nodes
            .get(key)
            .ok_or_else(|| GraphError::NodeNotFound(key.clone()))
    }

    /// Look up a node.
    pub fn get(&self, key: &NodeKey) -> Option<&Node> {
        self.nodes.get(key)
    }

    /// Number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// All node keys, in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &NodeKey> {
        self.nodes.keys()
    }

    /// Enforce the structural invariants of an authored graph: the start
    /// key resolves, every node offers at least one choice, every successor
    /// resolves, every node is reachable from the start, and END is
    /// reachable from every node.
    fn validate(&self) -> Result<(), GraphError> {
        if !self.nodes.contains_key(&self.start) {
            return Err(GraphError::UnknownStart(self.start.clone()));
        }

        for node in self.nodes.values() {
            if node.choices.is_empty() {
                return Err(GraphError::NoChoices(node.key.clone()));
            }
            for choice in &node.choices {
                if let Successor::Node(target) = &choice.next {
                    if !self.nodes.contains_key(target) {
                        return Err(GraphError::UnknownSuccessor {
                            node: node.key.clone(),
                            target: target.clone(),
                        });
                    }
                }
            }
        }

        // Forward reachability from the start key.
        let mut visited: HashSet<&NodeKey> = HashSet::new();
        let mut pending = vec![&self.start];
        while let Some(key) = pending.pop() {
            if !visited.insert(key) {
                continue;
            }
            for choice in &self.nodes[key].choices {
                if let Successor::Node(target) = &choice.next {
                    pending.push(target);
                }
            }
        }
        for key in self.nodes.keys() {
            if !visited.contains(key) {
                return Err(GraphError::UnreachableNode(key.clone()));
            }
        }

        // Fixpoint over the set of nodes with some path to END.
        let mut reaches_end: HashSet<&NodeKey> = HashSet::new();
        loop {
            let mut grew = false;
            for node in self.nodes.values() {
                if reaches_end.contains(&node.key) {
                    continue;
                }
                let reaches = node.choices.iter().any(|choice| match &choice.next {
                    Successor::End => true,
                    Successor::Node(target) => reaches_end.contains(target),
                });
                if reaches {
                    reaches_end.insert(&node.key);
                    grew = true;
                }
            }
            if !grew {
                break;
            }
        }
        for key in self.nodes.keys() {
            if !reaches_end.contains(key) {
                return Err(GraphError::EndUnreachable(key.clone()));
            }
        }

        Ok(())
    }
}
