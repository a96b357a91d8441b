//! Per-node evaluation context handed to a `Control` (`spec.md` §4.4).

use ikg_core::{Node, RelationshipType};
use std::collections::HashSet;

/// Everything a control needs to evaluate one node: the node itself, its
/// one-hop neighborhood (either direction), and the relationship types
/// incident on it.
pub struct ControlContext<'a> {
    pub node: &'a Node,
    pub neighbors: Vec<Node>,
    pub incident_relationship_types: HashSet<RelationshipType>,
}

impl<'a> ControlContext<'a> {
    #[must_use]
    pub fn new(node: &'a Node, neighbors: Vec<Node>, incident_relationship_types: HashSet<RelationshipType>) -> Self {
        Self {
            node,
            neighbors,
            incident_relationship_types,
        }
    }

    #[must_use]
    pub fn has_edge(&self, relationship_type: RelationshipType) -> bool {
        self.incident_relationship_types.contains(&relationship_type)
    }

    #[must_use]
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.node.tags.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn has_tag_value(&self, key: &str, value: &str) -> bool {
        self.tag(key).is_some_and(|v| v == value)
    }
}
