//! Critical-node ranking: degree centrality weighted by downstream reach
//! (§4.3).

use crate::error::Result;
use crate::subgraph::induced_subgraph;
use ikg_core::{Node, NodeFilter, Storage};
use std::collections::{HashMap, HashSet, VecDeque};

#[derive(Debug, Clone)]
pub struct CriticalNode {
    pub node: Node,
    pub in_degree: u32,
    pub out_degree: u32,
    pub degree: u32,
    pub reachability_ratio: f64,
    pub score: f64,
}

pub async fn find_critical_nodes(storage: &dyn Storage, filter: &NodeFilter, top_n: usize) -> Result<Vec<CriticalNode>> {
    let nodes = storage.query_nodes(filter).await?;
    let subgraph = induced_subgraph(storage, nodes).await?;
    let total = subgraph.nodes.len().max(1) as f64;

    let mut downstream: HashMap<String, Vec<String>> = HashMap::new();
    let mut in_degree: HashMap<String, u32> = HashMap::new();
    let mut out_degree: HashMap<String, u32> = HashMap::new();
    for node in &subgraph.nodes {
        downstream.entry(node.id.clone()).or_default();
        in_degree.entry(node.id.clone()).or_insert(0);
        out_degree.entry(node.id.clone()).or_insert(0);
    }
    for edge in &subgraph.edges {
        downstream.entry(edge.source_node_id.clone()).or_default().push(edge.target_node_id.clone());
        *out_degree.entry(edge.source_node_id.clone()).or_insert(0) += 1;
        *in_degree.entry(edge.target_node_id.clone()).or_insert(0) += 1;
    }

    let mut ranked = Vec::with_capacity(subgraph.nodes.len());
    for node in subgraph.nodes {
        let reachable = downstream_reachable_count(&downstream, &node.id);
        let reachability_ratio = reachable as f64 / total;
        let in_d = *in_degree.get(&node.id).unwrap_or(&0);
        let out_d = *out_degree.get(&node.id).unwrap_or(&0);
        let degree = in_d + out_d;
        let score = f64::from(degree) * reachability_ratio;
        ranked.push(CriticalNode {
            node,
            in_degree: in_d,
            out_degree: out_d,
            degree,
            reachability_ratio,
            score,
        });
    }

    ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    ranked.truncate(top_n);
    Ok(ranked)
}

fn downstream_reachable_count(downstream: &HashMap<String, Vec<String>>, root: &str) -> usize {
    let mut visited: HashSet<String> = HashSet::new();
    let mut queue: VecDeque<String> = VecDeque::new();
    queue.push_back(root.to_string());
    visited.insert(root.to_string());

    let mut count = 0;
    while let Some(current) = queue.pop_front() {
        if let Some(children) = downstream.get(&current) {
            for child in children {
                if visited.insert(child.clone()) {
                    count += 1;
                    queue.push_back(child.clone());
                }
            }
        }
    }
    count
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
            relationship_type: RelationshipType::DependsOn,
            confidence: 1.0,
            discovered_via: DiscoveredVia::ApiField,
            metadata: Map::new(),
        }
    }

    #[tokio::test]
    async fn hub_node_ranks_above_leaf() {
        let storage = MemoryStorage::new();
        storage.upsert_nodes(vec![node("hub"), node("a"), node("b"), node("c")]).await.unwrap();
        storage
            .upsert_edges(vec![
                edge("hub-a", "hub", "a"),
                edge("hub-b", "hub", "b"),
                edge("hub-c", "hub", "c"),
            ])
            .await
            .unwrap();

        let ranked = find_critical_nodes(&storage, &NodeFilter::new(), 4).await.unwrap();
        assert_eq!(ranked[0].node.id, "hub");
        assert_eq!(ranked[0].out_degree, 3);
    }
}
