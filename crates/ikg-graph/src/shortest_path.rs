//! Shortest path: undirected BFS with parent-and-edge tracking (§4.3).

use crate::error::Result;
use ikg_core::{Direction, Edge, RelationshipType, Storage};
use std::collections::{HashMap, VecDeque};

#[derive(Debug, Clone, Default)]
pub struct ShortestPathResult {
    pub path: Vec<String>,
    pub edges: Vec<Edge>,
    pub hops: u32,
    pub found: bool,
}

pub async fn shortest_path(
    storage: &dyn Storage,
    from_id: &str,
    to_id: &str,
    edge_types: Option<&[RelationshipType]>,
) -> Result<ShortestPathResult> {
    if from_id == to_id {
        if storage.get_node(from_id).await?.is_some() {
            return Ok(ShortestPathResult {
                path: vec![from_id.to_string()],
                edges: Vec::new(),
                hops: 0,
                found: true,
            });
        }
        return Ok(ShortestPathResult::default());
    }

    if storage.get_node(from_id).await?.is_none() || storage.get_node(to_id).await?.is_none() {
        return Ok(ShortestPathResult::default());
    }

    let mut parents: HashMap<String, (String, Edge)> = HashMap::new();
    let mut visited = std::collections::HashSet::new();
    let mut queue = VecDeque::new();

    visited.insert(from_id.to_string());
    queue.push_back(from_id.to_string());

    while let Some(current) = queue.pop_front() {
        if current == to_id {
            break;
        }
        let edges = storage.get_edges_for_node(&current, Direction::Both).await?;
        for edge in edges {
            if let Some(types) = edge_types {
                if !types.contains(&edge.relationship_type) {
                    continue;
                }
            }
            let neighbor = if edge.source_node_id == current {
                edge.target_node_id.clone()
            } else {
                edge.source_node_id.clone()
            };
            if visited.insert(neighbor.clone()) {
                parents.insert(neighbor.clone(), (current.clone(), edge));
                queue.push_back(neighbor);
            }
        }
    }

    if !visited.contains(to_id) {
        return Ok(ShortestPathResult::default());
    }

    let mut path = vec![to_id.to_string()];
    let mut edges = Vec::new();
    let mut cursor = to_id.to_string();
    while let Some((parent, edge)) = parents.get(&cursor) {
        path.push(parent.clone());
        edges.push(edge.clone());
        cursor = parent.clone();
    }
    path.reverse();
    edges.reverse();

    Ok(ShortestPathResult {
        hops: edges.len() as u32,
        found: true,
        path,
        edges,
    })
}
