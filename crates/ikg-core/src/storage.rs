//! The storage contract (§4.1): the only stateful collaborator the rest of
//! the core depends on, plus an in-memory reference implementation used by
//! every other crate's tests.

use crate::error::Result;
use crate::filter::NodeFilter;
use crate::model::{Change, Direction, Edge, EdgeInput, Node, NodeInput, Provider, RelationshipType, Snapshot, SyncRecord};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::RwLock;

/// Result of a bounded neighbor expansion: the nodes and edges traversed,
/// deduplicated, root included.
#[derive(Debug, Clone, Default)]
pub struct NeighborResult {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

/// Options narrowing `list_snapshots`.
#[derive(Debug, Clone, Default)]
pub struct SnapshotQuery {
    pub since: Option<DateTime<Utc>>,
    pub provider: Option<Provider>,
    pub limit: Option<usize>,
}

/// The narrow storage contract described in `spec.md` §4.1.
///
/// Implementations must uphold the guarantees listed there: `upsert_node`
/// preserves `discovered_at` on existing ids; `get_neighbors` is equivalent
/// to bounded BFS; `append_changes` is atomic and order-preserving per call;
/// `mark_nodes_disappeared` never emits change records itself.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn upsert_node(&self, input: NodeInput) -> Result<Node>;

    async fn upsert_nodes(&self, inputs: Vec<NodeInput>) -> Result<Vec<Node>>;

    async fn get_node(&self, id: &str) -> Result<Option<Node>>;

    async fn query_nodes(&self, filter: &NodeFilter) -> Result<Vec<Node>>;

    /// Marks nodes not seen since `stale_before` as disappeared and returns
    /// their ids. Does not emit change records.
    async fn mark_nodes_disappeared(&self, stale_before: DateTime<Utc>, provider: Option<Provider>) -> Result<Vec<String>>;

    async fn upsert_edge(&self, input: EdgeInput) -> Result<Edge>;

    async fn upsert_edges(&self, inputs: Vec<EdgeInput>) -> Result<Vec<Edge>>;

    async fn get_edge(&self, id: &str) -> Result<Option<Edge>>;

    async fn get_edges_for_node(&self, id: &str, direction: Direction) -> Result<Vec<Edge>>;

    /// Deletes edges whose `last_seen_at` is before `stale_before`, returning
    /// the number removed.
    async fn delete_stale_edges(&self, stale_before: DateTime<Utc>) -> Result<u64>;

    /// Bounded BFS from `root_id`, restricted to `edge_types` if provided.
    /// The root is always included in `nodes` when it exists; an absent
    /// root yields an empty result.
    async fn get_neighbors(
        &self,
        root_id: &str,
        depth: u32,
        direction: Direction,
        edge_types: Option<&[RelationshipType]>,
    ) -> Result<NeighborResult>;

    /// Appends `changes` atomically, preserving call order.
    async fn append_changes(&self, changes: Vec<Change>) -> Result<()>;

    /// Returns the most recent `limit` changes targeting `id`, newest first.
    async fn get_node_timeline(&self, id: &str, limit: usize) -> Result<Vec<Change>>;

    /// Returns snapshots newest-first matching the query.
    async fn list_snapshots(&self, query: SnapshotQuery) -> Result<Vec<Snapshot>>;

    async fn save_sync_record(&self, record: SyncRecord) -> Result<()>;
}

#[derive(Default)]
struct Inner {
    nodes: HashMap<String, Node>,
    edges: HashMap<String, Edge>,
    changes: Vec<Change>,
    snapshots: Vec<Snapshot>,
    sync_records: Vec<SyncRecord>,
}

/// An in-memory reference implementation of [`Storage`]. Not meant for
/// production persistence (§1 names concrete persistence out of scope);
/// this exists so the rest of the workspace has something concrete to run
/// its tests against.
#[derive(Default)]
pub struct MemoryStorage {
    inner: RwLock<Inner>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn upsert_node(&self, input: NodeInput) -> Result<Node> {
        let now = Utc::now();
        let mut inner = self.write();
        let node = match inner.nodes.get(&input.id) {
            Some(existing) => Node {
                id: input.id.clone(),
                provider: input.provider,
                resource_type: input.resource_type,
                native_id: input.native_id,
                name: input.name,
                region: input.region,
                account: input.account,
                owner: input.owner,
                created_at: input.created_at,
                status: input.status,
                tags: input.tags,
                metadata: input.metadata,
                cost_monthly: input.cost_monthly,
                discovered_at: existing.discovered_at,
                updated_at: now,
                last_seen_at: now,
            },
            None => Node {
                id: input.id.clone(),
                provider: input.provider,
                resource_type: input.resource_type,
                native_id: input.native_id,
                name: input.name,
                region: input.region,
                account: input.account,
                owner: input.owner,
                created_at: input.created_at,
                status: input.status,
                tags: input.tags,
                metadata: input.metadata,
                cost_monthly: input.cost_monthly,
                discovered_at: now,
                updated_at: now,
                last_seen_at: now,
            },
        };
        inner.nodes.insert(input.id, node.clone());
        Ok(node)
    }

    async fn upsert_nodes(&self, inputs: Vec<NodeInput>) -> Result<Vec<Node>> {
        let mut out = Vec::with_capacity(inputs.len());
        for input in inputs {
            out.push(self.upsert_node(input).await?);
        }
        Ok(out)
    }

    async fn get_node(&self, id: &str) -> Result<Option<Node>> {
        Ok(self.read().nodes.get(id).cloned())
    }

    async fn query_nodes(&self, filter: &NodeFilter) -> Result<Vec<Node>> {
        Ok(self.read().nodes.values().filter(|n| filter.matches(n)).cloned().collect())
    }

    async fn mark_nodes_disappeared(&self, stale_before: DateTime<Utc>, provider: Option<Provider>) -> Result<Vec<String>> {
        let mut inner = self.write();
        let mut ids = Vec::new();
        for node in inner.nodes.values_mut() {
            if let Some(p) = provider {
                if node.provider != p {
                    continue;
                }
            }
            if node.status == crate::model::NodeStatus::Disappeared {
                continue;
            }
            if node.last_seen_at < stale_before {
                node.status = crate::model::NodeStatus::Disappeared;
                ids.push(node.id.clone());
            }
        }
        Ok(ids)
    }

    async fn upsert_edge(&self, input: EdgeInput) -> Result<Edge> {
        let now = Utc::now();
        let mut inner = self.write();
        let edge = Edge {
            id: input.id.clone(),
            source_node_id: input.source_node_id,
            target_node_id: input.target_node_id,
            relationship_type: input.relationship_type,
            confidence: input.confidence,
            discovered_via: input.discovered_via,
            metadata: input.metadata,
            last_seen_at: now,
        };
        inner.edges.insert(input.id, edge.clone());
        Ok(edge)
    }

    async fn upsert_edges(&self, inputs: Vec<EdgeInput>) -> Result<Vec<Edge>> {
        let mut out = Vec::with_capacity(inputs.len());
        for input in inputs {
            out.push(self.upsert_edge(input).await?);
        }
        Ok(out)
    }

    async fn get_edge(&self, id: &str) -> Result<Option<Edge>> {
        Ok(self.read().edges.get(id).cloned())
    }

    async fn get_edges_for_node(&self, id: &str, direction: Direction) -> Result<Vec<Edge>> {
        let inner = self.read();
        Ok(inner
            .edges
            .values()
            .filter(|e| match direction {
                Direction::Upstream => e.target_node_id == id,
                Direction::Downstream => e.source_node_id == id,
                Direction::Both => e.source_node_id == id || e.target_node_id == id,
            })
            .cloned()
            .collect())
    }

    async fn delete_stale_edges(&self, stale_before: DateTime<Utc>) -> Result<u64> {
        let mut inner = self.write();
        let before = inner.edges.len();
        inner.edges.retain(|_, e| e.last_seen_at >= stale_before);
        Ok((before - inner.edges.len()) as u64)
    }

    async fn get_neighbors(
        &self,
        root_id: &str,
        depth: u32,
        direction: Direction,
        edge_types: Option<&[RelationshipType]>,
    ) -> Result<NeighborResult> {
        let inner = self.read();
        let Some(root) = inner.nodes.get(root_id) else {
            return Ok(NeighborResult::default());
        };

        let mut visited_nodes = HashSet::new();
        let mut visited_edges = HashSet::new();
        let mut result = NeighborResult::default();

        visited_nodes.insert(root.id.clone());
        result.nodes.push(root.clone());

        let mut queue: VecDeque<(String, u32)> = VecDeque::new();
        queue.push_back((root.id.clone(), 0));

        while let Some((current_id, hop)) = queue.pop_front() {
            if hop >= depth {
                continue;
            }
            for edge in inner.edges.values() {
                if let Some(types) = edge_types {
                    if !types.contains(&edge.relationship_type) {
                        continue;
                    }
                }
                let next_id = match direction {
                    Direction::Downstream if edge.source_node_id == current_id => Some(edge.target_node_id.clone()),
                    Direction::Upstream if edge.target_node_id == current_id => Some(edge.source_node_id.clone()),
                    Direction::Both if edge.source_node_id == current_id => Some(edge.target_node_id.clone()),
                    Direction::Both if edge.target_node_id == current_id => Some(edge.source_node_id.clone()),
                    _ => None,
                };
                let Some(next_id) = next_id else { continue };
                let Some(next_node) = inner.nodes.get(&next_id) else { continue };

                if visited_edges.insert(edge.id.clone()) {
                    result.edges.push(edge.clone());
                }
                if visited_nodes.insert(next_id.clone()) {
                    result.nodes.push(next_node.clone());
                    queue.push_back((next_id, hop + 1));
                }
            }
        }

        Ok(result)
    }

    async fn append_changes(&self, changes: Vec<Change>) -> Result<()> {
        let mut inner = self.write();
        inner.changes.extend(changes);
        Ok(())
    }

    async fn get_node_timeline(&self, id: &str, limit: usize) -> Result<Vec<Change>> {
        let inner = self.read();
        let mut matching: Vec<Change> = inner.changes.iter().filter(|c| c.target_id == id).cloned().collect();
        matching.sort_by(|a, b| b.detected_at.cmp(&a.detected_at));
        matching.truncate(limit);
        Ok(matching)
    }

    async fn list_snapshots(&self, query: SnapshotQuery) -> Result<Vec<Snapshot>> {
        let inner = self.read();
        let mut matching: Vec<Snapshot> = inner
            .snapshots
            .iter()
            .filter(|s| query.since.map_or(true, |since| s.created_at >= since))
            .filter(|s| query.provider.map_or(true, |p| s.provider == Some(p)))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        if let Some(limit) = query.limit {
            matching.truncate(limit);
        }
        Ok(matching)
    }

    async fn save_sync_record(&self, record: SyncRecord) -> Result<()> {
        self.write().sync_records.push(record);
        Ok(())
    }
}

impl MemoryStorage {
    /// Test/seed helper: push a snapshot directly without going through a
    /// sync cycle.
    pub fn seed_snapshot(&self, snapshot: Snapshot) {
        self.write().snapshots.push(snapshot);
    }

    /// Test helper: returns every persisted sync record, oldest first.
    #[must_use]
    pub fn sync_records(&self) -> Vec<SyncRecord> {
        self.read().sync_records.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NodeStatus, Provider, ResourceType};
    use std::collections::HashMap;

    fn node_input(id: &str) -> NodeInput {
        NodeInput {
            id: id.to_string(),
            provider: Provider::Aws,
            resource_type: ResourceType::Compute,
            native_id: id.to_string(),
            name: id.to_string(),
            region: "us-east-1".into(),
            account: "acct".into(),
            owner: None,
            created_at: None,
            status: NodeStatus::Running,
            tags: HashMap::new(),
            metadata: HashMap::new(),
            cost_monthly: Some(10.0),
        }
    }

    #[tokio::test]
    async fn upsert_preserves_discovered_at() {
        let storage = MemoryStorage::new();
        let n1 = storage.upsert_node(node_input("a")).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let mut second = node_input("a");
        second.status = NodeStatus::Stopped;
        let n2 = storage.upsert_node(second).await.unwrap();

        assert_eq!(n1.discovered_at, n2.discovered_at);
        assert!(n2.updated_at >= n1.updated_at);
        assert_eq!(n2.status, NodeStatus::Stopped);
    }

    #[tokio::test]
    async fn get_neighbors_includes_root_and_terminates_on_cycles() {
        let storage = MemoryStorage::new();
        storage.upsert_nodes(vec![node_input("a"), node_input("b"), node_input("c")]).await.unwrap();
        storage
            .upsert_edges(vec![
                EdgeInput {
                    id: "a--depends-on--b".into(),
                    source_node_id: "a".into(),
                    target_node_id: "b".into(),
                    relationship_type: RelationshipType::DependsOn,
                    confidence: 1.0,
                    discovered_via: crate::model::DiscoveredVia::ApiField,
                    metadata: HashMap::new(),
                },
                EdgeInput {
                    id: "b--depends-on--a".into(),
                    source_node_id: "b".into(),
                    target_node_id: "a".into(),
                    relationship_type: RelationshipType::DependsOn,
                    confidence: 1.0,
                    discovered_via: crate::model::DiscoveredVia::ApiField,
                    metadata: HashMap::new(),
                },
            ])
            .await
            .unwrap();

        let result = storage.get_neighbors("a", 5, Direction::Both, None).await.unwrap();
        let ids: HashSet<_> = result.nodes.iter().map(|n| n.id.clone()).collect();
        assert!(ids.contains("a"));
        assert!(ids.contains("b"));
        assert!(!ids.contains("c"));
    }

    #[tokio::test]
    async fn missing_root_yields_empty_result() {
        let storage = MemoryStorage::new();
        let result = storage.get_neighbors("missing", 3, Direction::Both, None).await.unwrap();
        assert!(result.nodes.is_empty());
        assert!(result.edges.is_empty());
    }
}
