//! The graph data model: nodes, edges, changes, snapshots, and sync records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::HashMap;

/// Cloud or infrastructure provider a node was discovered from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Aws,
    Azure,
    Gcp,
    Terraform,
    Hybrid,
    Custom,
}

/// Closed enumeration of resource kinds the graph understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceType {
    Compute,
    Database,
    Storage,
    Vpc,
    Subnet,
    LoadBalancer,
    SecurityGroup,
    IamRole,
    Function,
    ApiGateway,
    Cache,
    Queue,
    Topic,
    Cluster,
    Container,
    Cdn,
    Dns,
    Certificate,
    Secret,
    Stream,
    NetworkInterface,
    Volume,
    Bucket,
    Table,
    Repository,
    Pipeline,
    Gateway,
    Firewall,
    KmsKey,
    ServiceAccount,
}

/// Lifecycle state of a discovered resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    Running,
    Stopped,
    Pending,
    Creating,
    Terminated,
    Error,
    Disappeared,
    Unknown,
}

/// Closed enumeration of relationship kinds an edge can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RelationshipType {
    RunsIn,
    DependsOn,
    SecuredBy,
    ConnectedTo,
    MemberOf,
    Monitors,
    LogsTo,
    EncryptsWith,
    BacksUp,
    MemberOfFleet,
    AuthenticatedBy,
    DeployedAt,
    Routes,
    Peers,
    Mounts,
    Caches,
    Queues,
    Publishes,
    Subscribes,
    Triggers,
    Invokes,
    Reads,
    Writes,
    Owns,
    ManagedBy,
    AttachedTo,
    ForwardsTo,
    Proxies,
    Replicates,
    Fronts,
    Resolves,
    Scales,
    Contains,
    Hosts,
    Exposes,
    Restricts,
    AuditsTo,
    AlertsTo,
    BackupOf,
    Federates,
    Bridges,
}

/// Provenance tag describing how an edge was discovered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiscoveredVia {
    ApiField,
    ConfigScan,
    RuntimeTrace,
    Manual,
    /// Provenance not covered by the built-in tags.
    Other(String),
}

/// How a change was detected, per the data-model invariants in `spec.md` §3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DetectedVia {
    Sync,
    DriftScan,
    Manual,
    External,
}

/// Kind of change recorded in the append-only change log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChangeType {
    NodeCreated,
    NodeUpdated,
    NodeDrifted,
    NodeDisappeared,
    EdgeCreated,
    EdgeRemoved,
    CostChanged,
}

/// Direction of traversal relative to a root node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Upstream,
    Downstream,
    Both,
}

/// One infrastructure resource as discovered by an adapter, before
/// Storage has assigned its maintained timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeInput {
    pub id: String,
    pub provider: Provider,
    pub resource_type: ResourceType,
    pub native_id: String,
    pub name: String,
    pub region: String,
    pub account: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    pub status: NodeStatus,
    #[serde(default)]
    pub tags: HashMap<String, String>,
    #[serde(default)]
    pub metadata: HashMap<String, JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_monthly: Option<f64>,
}

/// A fully persisted node, carrying the timestamps Storage maintains.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub provider: Provider,
    pub resource_type: ResourceType,
    pub native_id: String,
    pub name: String,
    pub region: String,
    pub account: String,
    pub owner: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub status: NodeStatus,
    pub tags: HashMap<String, String>,
    pub metadata: HashMap<String, JsonValue>,
    pub cost_monthly: Option<f64>,
    pub discovered_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_seen_at: DateTime<Utc>,
}

impl Node {
    /// Canonical node id form: `provider::region:resourceType:nativeId`.
    #[must_use]
    pub fn canonical_id(provider: Provider, region: &str, resource_type: ResourceType, native_id: &str) -> String {
        format!(
            "{}::{}:{}:{}",
            serde_json::to_value(provider).expect("Provider serializes").as_str().unwrap_or_default(),
            region,
            serde_json::to_value(resource_type).expect("ResourceType serializes").as_str().unwrap_or_default(),
            native_id
        )
    }
}

/// A relationship between two resources, as discovered by an adapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeInput {
    pub id: String,
    pub source_node_id: String,
    pub target_node_id: String,
    pub relationship_type: RelationshipType,
    pub confidence: f64,
    pub discovered_via: DiscoveredVia,
    #[serde(default)]
    pub metadata: HashMap<String, JsonValue>,
}

/// A fully persisted directed edge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    pub id: String,
    pub source_node_id: String,
    pub target_node_id: String,
    pub relationship_type: RelationshipType,
    pub confidence: f64,
    pub discovered_via: DiscoveredVia,
    pub metadata: HashMap<String, JsonValue>,
    /// Tracks the most recent moment either endpoint was seen alive.
    /// Edges do not expose this in the wire-level model of `spec.md` §3;
    /// it is required internally to make stale-edge pruning possible
    /// (see `spec.md` §9, Open Questions).
    pub last_seen_at: DateTime<Utc>,
}

impl Edge {
    /// Canonical edge id form: `"{src}--{rel}--{dst}"`.
    #[must_use]
    pub fn canonical_id(source_node_id: &str, relationship_type: RelationshipType, target_node_id: &str) -> String {
        let rel = serde_json::to_value(relationship_type)
            .expect("RelationshipType serializes")
            .as_str()
            .unwrap_or_default()
            .to_string();
        format!("{source_node_id}--{rel}--{target_node_id}")
    }
}

/// One entry in the append-only change log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Change {
    pub id: String,
    pub target_id: String,
    pub detected_at: DateTime<Utc>,
    pub correlation_id: Option<String>,
    pub initiator: Option<String>,
    pub initiator_type: Option<String>,
    pub detected_via: DetectedVia,
    pub change_type: ChangeType,
    pub field: Option<String>,
    pub previous_value: Option<String>,
    pub new_value: Option<String>,
    pub metadata: HashMap<String, JsonValue>,
}

/// A coarse periodic aggregate used by the forecast engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub created_at: DateTime<Utc>,
    pub total_cost_monthly: f64,
    pub node_count: u64,
    pub provider: Option<Provider>,
}

/// Lifecycle status of one sync cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    Running,
    Completed,
    Partial,
    Failed,
}

/// Record of one reconciliation cycle for a single provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncRecord {
    pub id: String,
    pub provider: Provider,
    pub status: SyncStatus,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub nodes_discovered: u64,
    pub nodes_created: u64,
    pub nodes_updated: u64,
    pub nodes_disappeared: u64,
    pub edges_discovered: u64,
    pub edges_created: u64,
    pub edges_removed: u64,
    pub changes_recorded: u64,
    pub errors: Vec<String>,
    pub duration_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_node_id_matches_spec_form() {
        let id = Node::canonical_id(Provider::Aws, "us-east-1", ResourceType::Compute, "i-123");
        assert_eq!(id, "aws::us-east-1:compute:i-123");
    }

    #[test]
    fn canonical_edge_id_matches_spec_form() {
        let id = Edge::canonical_id("a:1:c:x", RelationshipType::DependsOn, "a:1:c:y");
        assert_eq!(id, "a:1:c:x--depends-on--a:1:c:y");
    }
}
