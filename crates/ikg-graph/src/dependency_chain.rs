//! Dependency chain: blast radius restricted to one traversal direction
//! (`spec.md` §4.3).

use crate::error::Result;
use crate::traversal::bounded_bfs;
use ikg_core::{Direction, Edge, Node, RelationshipType, Storage};
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct DependencyChainResult {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub hop_buckets: HashMap<u32, Vec<String>>,
    pub total_cost_monthly: f64,
}

/// `direction = Upstream` follows inbound edges only (what this node depends
/// on); `Downstream` follows outbound edges only (what depends on this
/// node). `Both` is accepted and behaves like blast radius.
pub async fn get_dependency_chain(
    storage: &dyn Storage,
    root_id: &str,
    direction: Direction,
    depth: u32,
    edge_types: Option<&[RelationshipType]>,
) -> Result<DependencyChainResult> {
    let Some(hop_result) = bounded_bfs(storage, root_id, depth, direction, edge_types).await? else {
        return Ok(DependencyChainResult::default());
    };

    Ok(DependencyChainResult {
        total_cost_monthly: hop_result.total_cost_monthly(),
        nodes: hop_result.nodes,
        edges: hop_result.edges,
        hop_buckets: hop_result.hop_buckets,
    })
}
