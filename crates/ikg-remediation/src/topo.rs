//! Dependency-aware patch ordering via Kahn's algorithm
//! (`spec.md` §4.6, testable property #11, scenario S8).

use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};

use ikg_core::Edge;

/// Orders `node_ids` so that an edge's source (the dependency) comes
/// before its target whenever both endpoints are in the patch set.
/// Falls back to the original order if no edges are supplied or a cycle
/// is detected, since a best-effort ordering beats refusing to patch.
#[must_use]
pub fn order_patches(node_ids: &[String], edges: Option<&[Edge]>) -> Vec<String> {
    let Some(edges) = edges else { return node_ids.to_vec() };
    if edges.is_empty() {
        return node_ids.to_vec();
    }

    let mut graph = DiGraph::<String, ()>::new();
    let mut indices = std::collections::HashMap::new();
    for id in node_ids {
        let idx = graph.add_node(id.clone());
        indices.insert(id.clone(), idx);
    }

    for edge in edges {
        if let (Some(&src), Some(&dst)) = (indices.get(&edge.source_node_id), indices.get(&edge.target_node_id)) {
            graph.add_edge(src, dst, ());
        }
    }

    match toposort(&graph, None) {
        Ok(order) => order.into_iter().map(|idx: NodeIndex| graph[idx].clone()).collect(),
        Err(_) => node_ids.to_vec(),
    }
}
