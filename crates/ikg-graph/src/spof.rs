//! Single-point-of-failure (articulation point) detection via iterative
//! Tarjan's algorithm over the undirected graph (§4.3).

use crate::error::Result;
use crate::subgraph::{adjacency, induced_subgraph};
use ikg_core::{Node, NodeFilter, Storage};
use std::collections::HashMap;

pub async fn find_spofs(storage: &dyn Storage, filter: &NodeFilter) -> Result<Vec<Node>> {
    let nodes = storage.query_nodes(filter).await?;
    let subgraph = induced_subgraph(storage, nodes).await?;

    if subgraph.nodes.len() < 3 {
        return Ok(Vec::new());
    }

    let adj = adjacency(&subgraph);
    let articulation_ids = articulation_points(&adj);

    Ok(subgraph.nodes.into_iter().filter(|n| articulation_ids.contains(&n.id)).collect())
}

struct Frame {
    node: usize,
    parent: usize,
    iter_idx: usize,
    skipped_parent_edge: bool,
}

const NO_PARENT: usize = usize::MAX;

/// Iterative Tarjan articulation-point detection. A node `u` is an
/// articulation point iff it is a DFS root with ≥2 DFS children, or it is
/// non-root and some child `v` has `low[v] >= disc[u]`.
fn articulation_points(adj: &HashMap<String, Vec<String>>) -> std::collections::HashSet<String> {
    let ids: Vec<String> = adj.keys().cloned().collect();
    let index_of: HashMap<&str, usize> = ids.iter().enumerate().map(|(i, id)| (id.as_str(), i)).collect();
    let n = ids.len();

    let mut disc: Vec<Option<u32>> = vec![None; n];
    let mut low: Vec<u32> = vec![0; n];
    let mut is_ap = vec![false; n];
    let mut timer: u32 = 0;

    for start in 0..n {
        if disc[start].is_some() {
            continue;
        }

        disc[start] = Some(timer);
        low[start] = timer;
        timer += 1;
        let mut root_children = 0u32;

        let mut stack = vec![Frame {
            node: start,
            parent: NO_PARENT,
            iter_idx: 0,
            skipped_parent_edge: false,
        }];

        while let Some(frame) = stack.last_mut() {
            let u = frame.node;
            let neighbors = &adj[ids[u].as_str()];

            if frame.iter_idx < neighbors.len() {
                let v_id = neighbors[frame.iter_idx].as_str();
                frame.iter_idx += 1;
                let v = index_of[v_id];

                if v == u {
                    continue; // self-loop
                }
                if v == frame.parent && !frame.skipped_parent_edge {
                    frame.skipped_parent_edge = true;
                    continue;
                }

                if let Some(v_disc) = disc[v] {
                    low[u] = low[u].min(v_disc);
                } else {
                    disc[v] = Some(timer);
                    low[v] = timer;
                    timer += 1;
                    if u == start {
                        root_children += 1;
                    }
                    stack.push(Frame {
                        node: v,
                        parent: u,
                        iter_idx: 0,
                        skipped_parent_edge: false,
                    });
                }
            } else {
                let finished = stack.pop().expect("frame exists");
                if let Some(parent_frame) = stack.last_mut() {
                    let parent = parent_frame.node;
                    low[parent] = low[parent].min(low[finished.node]);
                    if parent != start && low[finished.node] >= disc[parent].expect("parent discovered") {
                        is_ap[parent] = true;
                    }
                }
            }
        }

        if root_children >= 2 {
            is_ap[start] = true;
        }
    }

    ids.into_iter()
        .enumerate()
        .filter(|(i, _)| is_ap[*i])
        .map(|(_, id)| id)
        .collect()
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

    /// Path graph A-B-C-D (`spec.md` S5): articulation points are {B, C}.
    #[tokio::test]
    async fn path_graph_spofs_match_spec_s5() {
        let storage = MemoryStorage::new();
        storage.upsert_nodes(vec![node("A"), node("B"), node("C"), node("D")]).await.unwrap();
        storage
            .upsert_edges(vec![edge("A-B", "A", "B"), edge("B-C", "B", "C"), edge("C-D", "C", "D")])
            .await
            .unwrap();

        let spofs = find_spofs(&storage, &NodeFilter::new()).await.unwrap();
        let ids: std::collections::HashSet<_> = spofs.iter().map(|n| n.id.clone()).collect();
        assert_eq!(ids, std::collections::HashSet::from(["B".to_string(), "C".to_string()]));
    }

    /// 4-cycle A-B-C-D-A (`spec.md` S5): no articulation points.
    #[tokio::test]
    async fn four_cycle_has_no_spofs() {
        let storage = MemoryStorage::new();
        storage.upsert_nodes(vec![node("A"), node("B"), node("C"), node("D")]).await.unwrap();
        storage
            .upsert_edges(vec![
                edge("A-B", "A", "B"),
                edge("B-C", "B", "C"),
                edge("C-D", "C", "D"),
                edge("D-A", "D", "A"),
            ])
            .await
            .unwrap();

        let spofs = find_spofs(&storage, &NodeFilter::new()).await.unwrap();
        assert!(spofs.is_empty());
    }

    #[tokio::test]
    async fn fewer_than_three_nodes_yields_no_spofs() {
        let storage = MemoryStorage::new();
        storage.upsert_nodes(vec![node("A"), node("B")]).await.unwrap();
        storage.upsert_edges(vec![edge("A-B", "A", "B")]).await.unwrap();

        let spofs = find_spofs(&storage, &NodeFilter::new()).await.unwrap();
        assert!(spofs.is_empty());
    }
}
