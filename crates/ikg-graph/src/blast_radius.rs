//! Blast radius: the subgraph reachable from a root within a hop bound,
//! treating edges as undirected (`spec.md` §4.3).

use crate::error::Result;
use crate::traversal::bounded_bfs;
use ikg_core::{Direction, Edge, Node, RelationshipType, Storage};
use std::collections::HashMap;

/// Result of a blast-radius query. Empty when the root node does not exist.
#[derive(Debug, Clone, Default)]
pub struct BlastRadiusResult {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    /// Hop distance (0 = root) to node ids at that distance.
    pub hop_buckets: HashMap<u32, Vec<String>>,
    pub total_cost_monthly: f64,
}

pub async fn get_blast_radius(
    storage: &dyn Storage,
    root_id: &str,
    depth: u32,
    edge_types: Option<&[RelationshipType]>,
) -> Result<BlastRadiusResult> {
    let Some(hop_result) = bounded_bfs(storage, root_id, depth, Direction::Both, edge_types).await? else {
        return Ok(BlastRadiusResult::default());
    };

    Ok(BlastRadiusResult {
        total_cost_monthly: hop_result.total_cost_monthly(),
        nodes: hop_result.nodes,
        edges: hop_result.edges,
        hop_buckets: hop_result.hop_buckets,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ikg_core::MemoryStorage;

    #[tokio::test]
    async fn missing_root_returns_empty_result() {
        let storage = MemoryStorage::new();
        let result = get_blast_radius(&storage, "missing", 3, None).await.unwrap();
        assert!(result.nodes.is_empty());
        assert_eq!(result.total_cost_monthly, 0.0);
    }
}

/// Invariant #4: `getBlastRadius(id, d)` is monotone in `d`.
#[cfg(test)]
mod proptest_invariants {
    use super::*;
    use ikg_core::{DiscoveredVia, EdgeInput, MemoryStorage, NodeInput, NodeStatus, Provider, ResourceType};
    use proptest::prelude::*;
    use std::collections::{HashMap as Map, HashSet};

    const NODE_IDS: [&str; 6] = ["n0", "n1", "n2", "n3", "n4", "n5"];

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

    fn build_graph(edges: &[(usize, usize)]) -> MemoryStorage {
        tokio_test::block_on(async {
            let storage = MemoryStorage::new();
            storage.upsert_nodes(NODE_IDS.iter().map(|id| node(id)).collect()).await.unwrap();
            let edge_inputs: Vec<EdgeInput> = edges
                .iter()
                .enumerate()
                .map(|(i, &(a, b))| EdgeInput {
                    id: format!("e{i}"),
                    source_node_id: NODE_IDS[a].to_string(),
                    target_node_id: NODE_IDS[b].to_string(),
                    relationship_type: RelationshipType::ConnectedTo,
                    confidence: 1.0,
                    discovered_via: DiscoveredVia::ApiField,
                    metadata: Map::new(),
                })
                .collect();
            storage.upsert_edges(edge_inputs).await.unwrap();
            storage
        })
    }

    proptest! {
        #[test]
        fn blast_radius_is_monotone_in_depth(
            edges in proptest::collection::vec((0usize..6, 0usize..6), 0..12),
            root in 0usize..6,
            depth in 0u32..4,
        ) {
            let storage = build_graph(&edges);
            let shallow = tokio_test::block_on(get_blast_radius(&storage, NODE_IDS[root], depth, None)).unwrap();
            let deeper = tokio_test::block_on(get_blast_radius(&storage, NODE_IDS[root], depth + 1, None)).unwrap();

            let shallow_ids: HashSet<_> = shallow.nodes.iter().map(|n| n.id.clone()).collect();
            let deeper_ids: HashSet<_> = deeper.nodes.iter().map(|n| n.id.clone()).collect();
            prop_assert!(shallow_ids.is_subset(&deeper_ids));
        }
    }
}
