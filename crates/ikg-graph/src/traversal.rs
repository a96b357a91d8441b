//! Shared bounded-BFS machinery behind blast radius and dependency chain.

use crate::error::Result;
use ikg_core::{Direction, Edge, Node, RelationshipType, Storage};
use std::collections::{HashMap, HashSet, VecDeque};

/// Output of a bounded breadth-first expansion from a root node.
#[derive(Debug, Clone, Default)]
pub struct HopResult {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    /// Hop distance (0 = root) to the list of node ids at that distance.
    pub hop_buckets: HashMap<u32, Vec<String>>,
}

impl HopResult {
    #[must_use]
    pub fn total_cost_monthly(&self) -> f64 {
        self.nodes.iter().filter_map(|n| n.cost_monthly).sum()
    }
}

/// Expands outward from `root_id` up to `depth` hops. `direction` controls
/// whether traversal follows inbound edges (`Upstream`), outbound edges
/// (`Downstream`), or both. Returns `Ok(None)` when the root does not exist.
pub async fn bounded_bfs(
    storage: &dyn Storage,
    root_id: &str,
    depth: u32,
    direction: Direction,
    edge_types: Option<&[RelationshipType]>,
) -> Result<Option<HopResult>> {
    let Some(root) = storage.get_node(root_id).await? else {
        return Ok(None);
    };

    let mut result = HopResult::default();
    let mut visited_nodes: HashMap<String, u32> = HashMap::new();
    let mut visited_edges: HashSet<String> = HashSet::new();

    visited_nodes.insert(root.id.clone(), 0);
    result.hop_buckets.entry(0).or_default().push(root.id.clone());
    result.nodes.push(root.clone());

    let mut queue: VecDeque<(String, u32)> = VecDeque::new();
    queue.push_back((root.id, 0));

    while let Some((current_id, hop)) = queue.pop_front() {
        if hop >= depth {
            continue;
        }

        let edges = storage.get_edges_for_node(&current_id, direction).await?;
        for edge in edges {
            if let Some(types) = edge_types {
                if !types.contains(&edge.relationship_type) {
                    continue;
                }
            }

            let neighbor_id = match direction {
                Direction::Upstream => edge.source_node_id.clone(),
                Direction::Downstream => edge.target_node_id.clone(),
                Direction::Both => {
                    if edge.source_node_id == current_id {
                        edge.target_node_id.clone()
                    } else {
                        edge.source_node_id.clone()
                    }
                }
            };

            let Some(neighbor) = storage.get_node(&neighbor_id).await? else {
                continue;
            };

            if !visited_nodes.contains_key(&neighbor_id) {
                visited_nodes.insert(neighbor_id.clone(), hop + 1);
                result.hop_buckets.entry(hop + 1).or_default().push(neighbor_id.clone());
                result.nodes.push(neighbor);
                queue.push_back((neighbor_id, hop + 1));
            }

            if visited_edges.insert(edge.id.clone()) {
                result.edges.push(edge);
            }
        }
    }

    Ok(Some(result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ikg_core::{MemoryStorage, NodeInput, NodeStatus, Provider, ResourceType, EdgeInput, DiscoveredVia};
    use std::collections::HashMap as Map;

    fn node(id: &str) -> NodeInput {
        NodeInput {
            id: id.into(),
            provider: Provider::Aws,
            resource_type: ResourceType::Compute,
            native_id: id.into(),
            name: id.into(),
            region: "us-east-1".into(),
            account: "acct".into(),
            owner: None,
            created_at: None,
            status: NodeStatus::Running,
            tags: Map::new(),
            metadata: Map::new(),
            cost_monthly: Some(1.0),
        }
    }

    fn edge(id: &str, src: &str, dst: &str, rel: RelationshipType) -> EdgeInput {
        EdgeInput {
            id: id.into(),
            source_node_id: src.into(),
            target_node_id: dst.into(),
            relationship_type: rel,
            confidence: 1.0,
            discovered_via: DiscoveredVia::ApiField,
            metadata: Map::new(),
        }
    }

    /// A -> B -> C, B -> D, D -> E (single direction), matching `spec.md` S4.
    async fn build_s4_graph() -> MemoryStorage {
        let storage = MemoryStorage::new();
        storage
            .upsert_nodes(vec![node("A"), node("B"), node("C"), node("D"), node("E")])
            .await
            .unwrap();
        storage
            .upsert_edges(vec![
                edge("A-B", "A", "B", RelationshipType::DependsOn),
                edge("B-C", "B", "C", RelationshipType::DependsOn),
                edge("B-D", "B", "D", RelationshipType::DependsOn),
                edge("D-E", "D", "E", RelationshipType::DependsOn),
            ])
            .await
            .unwrap();
        storage
    }

    #[tokio::test]
    async fn blast_radius_depth_1_matches_spec_s4() {
        let storage = build_s4_graph().await;
        let result = bounded_bfs(&storage, "B", 1, Direction::Both, None).await.unwrap().unwrap();
        let ids: HashSet<_> = result.nodes.iter().map(|n| n.id.clone()).collect();
        assert_eq!(ids, HashSet::from(["A".to_string(), "B".to_string(), "C".to_string(), "D".to_string()]));
    }

    #[tokio::test]
    async fn blast_radius_depth_2_matches_spec_s4() {
        let storage = build_s4_graph().await;
        let result = bounded_bfs(&storage, "B", 2, Direction::Both, None).await.unwrap().unwrap();
        let ids: HashSet<_> = result.nodes.iter().map(|n| n.id.clone()).collect();
        assert_eq!(
            ids,
            HashSet::from(["A".to_string(), "B".to_string(), "C".to_string(), "D".to_string(), "E".to_string()])
        );
        assert_eq!(result.hop_buckets.get(&0), Some(&vec!["B".to_string()]));
        let mut hop1 = result.hop_buckets.get(&1).cloned().unwrap_or_default();
        hop1.sort();
        assert_eq!(hop1, vec!["A".to_string(), "C".to_string(), "D".to_string()]);
        assert_eq!(result.hop_buckets.get(&2), Some(&vec!["E".to_string()]));
    }

    #[tokio::test]
    async fn depth_is_monotone() {
        let storage = build_s4_graph().await;
        let shallow = bounded_bfs(&storage, "B", 1, Direction::Both, None).await.unwrap().unwrap();
        let deeper = bounded_bfs(&storage, "B", 2, Direction::Both, None).await.unwrap().unwrap();
        let shallow_ids: HashSet<_> = shallow.nodes.iter().map(|n| n.id.clone()).collect();
        let deeper_ids: HashSet<_> = deeper.nodes.iter().map(|n| n.id.clone()).collect();
        assert!(shallow_ids.is_subset(&deeper_ids));
    }

    #[tokio::test]
    async fn missing_root_returns_none() {
        let storage = MemoryStorage::new();
        assert!(bounded_bfs(&storage, "missing", 3, Direction::Both, None).await.unwrap().is_none());
    }
}
