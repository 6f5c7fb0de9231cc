//! Node and choice definitions - the vertices of the decision graph.

use serde::{Deserialize, Serialize};

use crate::indicators::Effects;

/// Unique key identifying a node within a scenario.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeKey(pub String);

impl NodeKey {
    /// Create a key from any string-like value.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NodeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for NodeKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

/// Sentinel spelling used in authored content for the end of a scenario.
pub const END_KEY: &str = "END";

/// Where a choice leads: another node, or the end of the simulation.
///
/// Authored as a plain string; `"END"` is reserved, everything else is a
/// node key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Successor {
    Node(NodeKey),
    End,
}

impl Successor {
    /// The node this successor points at, unless it is END.
    pub fn node_key(&self) -> Option<&NodeKey> {
        match self {
            Successor::Node(key) => Some(key),
            Successor::End => None,
        }
    }

    pub fn is_end(&self) -> bool {
        matches!(self, Successor::End)
    }
}

impl From<String> for Successor {
    fn from(raw: String) -> Self {
        if raw == END_KEY {
            Successor::End
        } else {
            Successor::Node(NodeKey(raw))
        }
    }
}

impl From<Successor> for String {
    fn from(successor: Successor) -> Self {
        match successor {
            Successor::Node(key) => key.0,
            Successor::End => END_KEY.to_string(),
        }
    }
}

/// A selectable option at a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    /// Label shown to the player.
    pub label: String,

    /// Signed deltas applied to the indicators on selection.
    #[serde(default)]
    pub effects: Effects,

    /// Node reached after this choice, or END.
    pub next: Successor,

    /// Message appended to the decision log on selection.
    pub log: String,
}

/// A decision point with narrative context and a fixed set of choices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub key: NodeKey,
    pub title: String,
    pub narrative: String,

    /// Concept tags surfaced alongside the narrative. Display-only; never
    /// consulted by traversal or classification.
    #[serde(default)]
    pub concepts: Vec<String>,

    /// Choices in offer order. Selection is by index into this list.
    pub choices: Vec<Choice>,
}

impl Node {
    /// The choice at `index`, if the node offers one.
    pub fn choice(&self, index: usize) -> Option<&Choice> {
        self.choices.get(index)
    }

    /// Number of choices offered at this node.
    pub fn choice_count(&self) -> usize {
        self.choices.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_successor_from_string() {
        assert_eq!(Successor::from("END".to_string()), Successor::End);
        assert_eq!(
            Successor::from("N2A".to_string()),
            Successor::Node(NodeKey::new("N2A"))
        );
    }

    #[test]
    fn test_successor_round_trip() {
        let end: String = Successor::End.into();
        assert_eq!(end, "END");

        let key: String = Successor::Node(NodeKey::new("N5D")).into();
        assert_eq!(key, "N5D");
    }

    #[test]
    fn test_successor_node_key() {
        let successor = Successor::Node(NodeKey::new("N1"));
        assert_eq!(successor.node_key(), Some(&NodeKey::new("N1")));
        assert!(!successor.is_end());

        assert_eq!(Successor::End.node_key(), None);
        assert!(Successor::End.is_end());
    }

    #[test]
    fn test_node_choice_lookup() {
        let node = Node {
            key: NodeKey::new("N1"),
            title: "Test".to_string(),
            narrative: "A test node".to_string(),
            concepts: vec![],
            choices: vec![Choice {
                label: "Only option".to_string(),
                effects: Effects::new(),
                next: Successor::End,
                log: "Chose the only option.".to_string(),
            }],
        };

        assert_eq!(node.choice_count(), 1);
        assert!(node.choice(0).is_some());
        assert!(node.choice(1).is_none());
    }

    #[test]
    fn test_node_key_display() {
        let key = NodeKey::new("N3B");
        assert_eq!(key.to_string(), "N3B");
        assert_eq!(key.as_str(), "N3B");
    }
}
