//! Orphan detection: nodes with zero incident edges after filtering (§4.3).

use crate::error::Result;
use crate::subgraph::induced_subgraph;
use ikg_core::{Node, NodeFilter, Storage};
use std::collections::HashSet;

pub async fn find_orphans(storage: &dyn Storage, filter: &NodeFilter) -> Result<Vec<Node>> {
    let nodes = storage.query_nodes(filter).await?;
    let subgraph = induced_subgraph(storage, nodes).await?;

    let connected: HashSet<String> = subgraph
        .edges
        .iter()
        .flat_map(|e| [e.source_node_id.clone(), e.target_node_id.clone()])
        .collect();

    Ok(subgraph.nodes.into_iter().filter(|n| !connected.contains(&n.id)).collect())
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

    #[tokio::test]
    async fn isolated_node_is_an_orphan() {
        let storage = MemoryStorage::new();
        storage.upsert_nodes(vec![node("A"), node("B"), node("C")]).await.unwrap();
        storage
            .upsert_edges(vec![EdgeInput {
                id: "A-B".into(),
                source_node_id: "A".into(),
                target_node_id: "B".into(),
                relationship_type: RelationshipType::ConnectedTo,
                confidence: 1.0,
                discovered_via: DiscoveredVia::ApiField,
                metadata: Map::new(),
            }])
            .await
            .unwrap();

        let orphans = find_orphans(&storage, &NodeFilter::new()).await.unwrap();
        assert_eq!(orphans.len(), 1);
        assert_eq!(orphans[0].id, "C");
    }
}
