//! Connected-component clustering over the undirected graph (§4.3).

use crate::error::Result;
use crate::subgraph::{adjacency, induced_subgraph};
use ikg_core::{Node, NodeFilter, Storage};
use std::collections::{HashMap, HashSet, VecDeque};

#[derive(Debug, Clone, Default)]
pub struct ClusterResult {
    /// Connected components with at least one edge, sorted by size desc.
    pub clusters: Vec<Vec<Node>>,
    /// Nodes with degree zero, reported separately from `clusters`.
    pub isolated: Vec<Node>,
}

pub async fn find_clusters(storage: &dyn Storage, filter: &NodeFilter) -> Result<ClusterResult> {
    let nodes = storage.query_nodes(filter).await?;
    let subgraph = induced_subgraph(storage, nodes).await?;
    let adj = adjacency(&subgraph);

    let by_id: HashMap<String, Node> = subgraph.nodes.into_iter().map(|n| (n.id.clone(), n)).collect();
    let mut visited: HashSet<String> = HashSet::new();
    let mut clusters: Vec<Vec<Node>> = Vec::new();
    let mut isolated: Vec<Node> = Vec::new();

    for id in by_id.keys() {
        if visited.contains(id) {
            continue;
        }
        let neighbors = adj.get(id).map(Vec::len).unwrap_or(0);
        if neighbors == 0 {
            visited.insert(id.clone());
            isolated.push(by_id[id].clone());
            continue;
        }

        let mut component = Vec::new();
        let mut queue = VecDeque::new();
        queue.push_back(id.clone());
        visited.insert(id.clone());

        while let Some(current) = queue.pop_front() {
            component.push(by_id[&current].clone());
            if let Some(neighbors) = adj.get(&current) {
                for next in neighbors {
                    if visited.insert(next.clone()) {
                        queue.push_back(next.clone());
                    }
                }
            }
        }
        clusters.push(component);
    }

    clusters.sort_by(|a, b| b.len().cmp(&a.len()));
    Ok(ClusterResult { clusters, isolated })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ikg_core::{DiscoveredVia, EdgeInput, MemoryStorage, NodeInput, NodeStatus, Provider, RelationshipType, ResourceType};
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
            cost_monthly: None,
        }
    }

    fn edge(id: &str, src: &str, dst: &str) -> EdgeInput {
        EdgeInput {
            id: id.into(),
            source_node_id: src.into(),
            target_node_id: dst.into(),
            relationship_type: RelationshipType::ConnectedTo,
            confidence: 1.0,
            discovered_via: DiscoveredVia::ApiField,
            metadata: Map::new(),
        }
    }

    #[tokio::test]
    async fn partitions_filtered_set_into_clusters_and_isolated() {
        let storage = MemoryStorage::new();
        storage
            .upsert_nodes(vec![node("a"), node("b"), node("c"), node("d"), node("isolated")])
            .await
            .unwrap();
        storage
            .upsert_edges(vec![edge("a-b", "a", "b"), edge("c-d", "c", "d")])
            .await
            .unwrap();

        let result = find_clusters(&storage, &NodeFilter::new()).await.unwrap();
        assert_eq!(result.clusters.len(), 2);
        assert_eq!(result.isolated.len(), 1);
        assert_eq!(result.isolated[0].id, "isolated");

        let total: usize = result.clusters.iter().map(Vec::len).sum::<usize>() + result.isolated.len();
        assert_eq!(total, 5);
    }
}

/// Invariant #6: `findClusters`'s output partitions the filtered node set —
/// isolated + clustered account for every node, and clusters are pairwise
/// disjoint.
#[cfg(test)]
mod proptest_invariants {
    use super::*;
    use ikg_core::{DiscoveredVia, EdgeInput, MemoryStorage, NodeInput, NodeStatus, Provider, RelationshipType, ResourceType};
    use proptest::prelude::*;
    use std::collections::HashMap as Map;

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
            cost_monthly: None,
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
        fn clusters_partition_the_filtered_node_set(edges in proptest::collection::vec((0usize..6, 0usize..6), 0..12)) {
            let storage = build_graph(&edges);
            let result = tokio_test::block_on(find_clusters(&storage, &NodeFilter::new())).unwrap();

            let mut seen: HashSet<String> = HashSet::new();
            for cluster in &result.clusters {
                for n in cluster {
                    prop_assert!(seen.insert(n.id.clone()), "clusters are not pairwise disjoint");
                }
            }
            for n in &result.isolated {
                prop_assert!(seen.insert(n.id.clone()), "isolated node also appears in a cluster");
            }

            prop_assert_eq!(seen.len(), NODE_IDS.len());
        }
    }
}
