//! Helper for building the filtered node set plus its induced edge set,
//! shared by orphans, critical-node ranking, clustering, and SPOF detection.

use crate::error::Result;
use ikg_core::{Direction, Edge, Node, Storage};
use std::collections::{HashMap, HashSet};

/// A filtered node set plus every edge whose endpoints are both in it.
pub struct FilteredSubgraph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

pub async fn induced_subgraph(storage: &dyn Storage, nodes: Vec<Node>) -> Result<FilteredSubgraph> {
    let ids: HashSet<String> = nodes.iter().map(|n| n.id.clone()).collect();
    let mut seen_edges: HashMap<String, Edge> = HashMap::new();

    for node in &nodes {
        for edge in storage.get_edges_for_node(&node.id, Direction::Both).await? {
            if ids.contains(&edge.source_node_id) && ids.contains(&edge.target_node_id) {
                seen_edges.entry(edge.id.clone()).or_insert(edge);
            }
        }
    }

    Ok(FilteredSubgraph {
        nodes,
        edges: seen_edges.into_values().collect(),
    })
}

/// Undirected adjacency list over a filtered subgraph, keyed by node id.
#[must_use]
pub fn adjacency(subgraph: &FilteredSubgraph) -> HashMap<String, Vec<String>> {
    let mut adj: HashMap<String, Vec<String>> = subgraph.nodes.iter().map(|n| (n.id.clone(), Vec::new())).collect();
    for edge in &subgraph.edges {
        adj.entry(edge.source_node_id.clone()).or_default().push(edge.target_node_id.clone());
        adj.entry(edge.target_node_id.clone()).or_default().push(edge.source_node_id.clone());
    }
    adj
}
