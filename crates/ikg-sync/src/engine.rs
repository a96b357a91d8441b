//! The sync engine: reconciliation algorithm for one provider (`spec.md`
//! §4.2), driven by an `Adapter` and writing through `Storage`.

use chrono::{Duration, Utc};
use ikg_core::{EngineConfig, Storage, SyncRecord, SyncStatus};
use uuid::Uuid;

use crate::adapter::{Adapter, DiscoverOptions};
use crate::changes;
use crate::diff::diff_node;
use crate::error::Result;
use crate::registry::AdapterRegistry;

/// Drives reconciliation and drift scans across a set of registered
/// adapters. Holds no storage of its own; every method is handed the
/// `Storage` it should read from and write to, matching the teacher's
/// pattern of stateless service objects wired at the call site.
#[derive(Default, Clone)]
pub struct SyncEngine {
    registry: AdapterRegistry,
}

impl SyncEngine {
    #[must_use]
    pub fn new(registry: AdapterRegistry) -> Self {
        Self { registry }
    }

    #[must_use]
    pub fn registry(&self) -> &AdapterRegistry {
        &self.registry
    }

    /// Runs one reconciliation cycle for `provider`, if an adapter is
    /// registered for it.
    pub async fn sync(
        &self,
        storage: &dyn Storage,
        provider: ikg_core::Provider,
        config: &EngineConfig,
        options: Option<&DiscoverOptions>,
    ) -> Result<Option<SyncRecord>> {
        let Some(adapter) = self.registry.get(provider) else {
            return Ok(None);
        };
        sync_provider(storage, adapter.as_ref(), config, options).await.map(Some)
    }

    /// Runs one reconciliation cycle per registered provider, in
    /// registration order. No ordering is guaranteed between cycles for
    /// different providers beyond the order this method chooses to invoke
    /// them (`spec.md` §5).
    pub async fn sync_all(&self, storage: &dyn Storage, config: &EngineConfig) -> Result<Vec<SyncRecord>> {
        let mut records = Vec::new();
        for provider in self.registry.providers() {
            if let Some(adapter) = self.registry.get(provider) {
                records.push(sync_provider(storage, adapter.as_ref(), config, None).await?);
            }
        }
        Ok(records)
    }
}

/// The reconciliation algorithm, steps 1-9 of `spec.md` §4.2.
pub async fn sync_provider(
    storage: &dyn Storage,
    adapter: &dyn Adapter,
    config: &EngineConfig,
    options: Option<&DiscoverOptions>,
) -> Result<SyncRecord> {
    let provider = adapter.provider();
    let correlation_id = Uuid::new_v4().to_string();
    let started_at = Utc::now();

    tracing::info!(?provider, correlation_id = %correlation_id, "starting sync cycle");

    let mut record = SyncRecord {
        id: correlation_id.clone(),
        provider,
        status: SyncStatus::Running,
        started_at,
        completed_at: None,
        nodes_discovered: 0,
        nodes_created: 0,
        nodes_updated: 0,
        nodes_disappeared: 0,
        edges_discovered: 0,
        edges_created: 0,
        edges_removed: 0,
        changes_recorded: 0,
        errors: Vec::new(),
        duration_ms: 0,
    };

    let discovery = match adapter.discover(options).await {
        Ok(discovery) => discovery,
        Err(message) => {
            tracing::error!(?provider, %message, "adapter discover raised an exception");
            record.status = SyncStatus::Failed;
            record.errors.push(message);
            finalize(&mut record, started_at);
            storage.save_sync_record(record.clone()).await?;
            return Ok(record);
        }
    };

    record.nodes_discovered = discovery.nodes.len() as u64;
    record.edges_discovered = discovery.edges.len() as u64;
    for resource_error in &discovery.errors {
        tracing::warn!(
            ?provider,
            resource_type = ?resource_error.resource_type,
            region = ?resource_error.region,
            message = %resource_error.message,
            "adapter reported a per-resource error"
        );
        record.errors.push(resource_error.message.clone());
    }

    let mut recorded_changes = Vec::new();

    // Step 3: diff each discovered node against the persisted view.
    for input in &discovery.nodes {
        match storage.get_node(&input.id).await? {
            None => {
                recorded_changes.push(changes::node_created(&correlation_id, input));
                record.nodes_created += 1;
            }
            Some(existing) => {
                let diffs = diff_node(&existing, input);
                if !diffs.is_empty() {
                    record.nodes_updated += 1;
                }
                for diff in &diffs {
                    recorded_changes.push(changes::node_updated(&correlation_id, &input.id, diff));
                    if diff.field == "cost_monthly" {
                        recorded_changes.push(changes::cost_changed(&correlation_id, &input.id, diff));
                    }
                }
            }
        }
    }

    // Step 4: batch upsert nodes.
    storage.upsert_nodes(discovery.nodes.clone()).await?;

    // Step 5: edges - creates, then batch upsert.
    for input in &discovery.edges {
        if storage.get_edge(&input.id).await?.is_none() {
            recorded_changes.push(changes::edge_created(&correlation_id, input));
            record.edges_created += 1;
        }
    }
    storage.upsert_edges(discovery.edges.clone()).await?;

    // Step 6: mark stale, if drift detection is enabled.
    let stale_before = Utc::now() - Duration::milliseconds(config.stale_threshold_ms);
    if config.enable_drift_detection {
        let disappeared_ids = storage.mark_nodes_disappeared(stale_before, Some(provider)).await?;
        record.nodes_disappeared = disappeared_ids.len() as u64;
        for id in &disappeared_ids {
            recorded_changes.push(changes::node_disappeared(&correlation_id, id));
        }
    }

    // Step 7: prune stale edges, if enabled.
    if config.prune_orphaned_edges {
        record.edges_removed = storage.delete_stale_edges(stale_before).await?;
    }

    // Step 8: append all accumulated changes atomically, in production order.
    record.changes_recorded = recorded_changes.len() as u64;
    storage.append_changes(recorded_changes).await?;

    // Step 9: finalize.
    record.status = if record.errors.is_empty() { SyncStatus::Completed } else { SyncStatus::Partial };
    finalize(&mut record, started_at);

    tracing::info!(
        ?provider,
        status = ?record.status,
        nodes_created = record.nodes_created,
        nodes_updated = record.nodes_updated,
        nodes_disappeared = record.nodes_disappeared,
        "sync cycle finished"
    );

    storage.save_sync_record(record.clone()).await?;
    Ok(record)
}

fn finalize(record: &mut SyncRecord, started_at: chrono::DateTime<Utc>) {
    let completed_at = Utc::now();
    record.completed_at = Some(completed_at);
    record.duration_ms = (completed_at - started_at).num_milliseconds().max(0) as u64;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::{DiscoverResult, ResourceError};
    use async_trait::async_trait;
    use ikg_core::{ChangeType, DiscoveredVia, EdgeInput, MemoryStorage, NodeInput, NodeStatus, Provider, RelationshipType, ResourceType};
    use std::collections::HashMap;
    use std::sync::Mutex;

    fn node_input(id: &str, cost: f64) -> NodeInput {
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
            tags: HashMap::new(),
            metadata: HashMap::new(),
            cost_monthly: Some(cost),
        }
    }

    struct ScriptedAdapter {
        provider: Provider,
        responses: Mutex<Vec<Result<DiscoverResult, String>>>,
    }

    #[async_trait]
    impl Adapter for ScriptedAdapter {
        fn provider(&self) -> Provider {
            self.provider
        }

        async fn health_check(&self) -> bool {
            true
        }

        async fn discover(&self, _options: Option<&DiscoverOptions>) -> Result<DiscoverResult, String> {
            self.responses.lock().unwrap().remove(0)
        }
    }

    /// S1: cold start.
    #[tokio::test]
    async fn cold_start_emits_created_changes_s1() {
        let storage = MemoryStorage::new();
        let adapter = ScriptedAdapter {
            provider: Provider::Aws,
            responses: Mutex::new(vec![Ok(DiscoverResult {
                nodes: vec![node_input("a:1:c:x", 100.0), node_input("a:1:c:y", 200.0)],
                edges: vec![EdgeInput {
                    id: "a:1:c:x--depends-on--a:1:c:y".into(),
                    source_node_id: "a:1:c:x".into(),
                    target_node_id: "a:1:c:y".into(),
                    relationship_type: RelationshipType::DependsOn,
                    confidence: 1.0,
                    discovered_via: DiscoveredVia::ApiField,
                    metadata: HashMap::new(),
                }],
                errors: Vec::new(),
            })]),
        };

        let record = sync_provider(&storage, &adapter, &EngineConfig::default(), None).await.unwrap();

        assert_eq!(record.status, SyncStatus::Completed);
        assert_eq!(record.nodes_created, 2);
        assert_eq!(record.edges_created, 1);
        assert_eq!(record.changes_recorded, 3);

        let timeline_x = storage.get_node_timeline("a:1:c:x", 10).await.unwrap();
        assert_eq!(timeline_x.len(), 1);
        assert_eq!(timeline_x[0].change_type, ChangeType::NodeCreated);
        assert_eq!(timeline_x[0].correlation_id.as_deref(), Some(record.id.as_str()));
    }

    /// S2: drifted field, no spurious cost-changed.
    #[tokio::test]
    async fn status_drift_emits_single_update_s2() {
        let storage = MemoryStorage::new();
        storage.upsert_node(node_input("n1", 100.0)).await.unwrap();

        let mut second = node_input("n1", 100.0);
        second.status = NodeStatus::Stopped;

        let adapter = ScriptedAdapter {
            provider: Provider::Aws,
            responses: Mutex::new(vec![Ok(DiscoverResult {
                nodes: vec![second],
                edges: Vec::new(),
                errors: Vec::new(),
            })]),
        };

        let record = sync_provider(&storage, &adapter, &EngineConfig::default(), None).await.unwrap();
        assert_eq!(record.nodes_updated, 1);

        let timeline = storage.get_node_timeline("n1", 10).await.unwrap();
        let updates: Vec<_> = timeline.iter().filter(|c| c.change_type == ChangeType::NodeUpdated).collect();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].field.as_deref(), Some("status"));
        assert_eq!(updates[0].previous_value.as_deref(), Some("running"));
        assert_eq!(updates[0].new_value.as_deref(), Some("stopped"));
        assert!(timeline.iter().all(|c| c.change_type != ChangeType::CostChanged));
    }

    /// An adapter exception fails the cycle and records the message.
    #[tokio::test]
    async fn adapter_exception_fails_the_cycle() {
        let storage = MemoryStorage::new();
        let adapter = ScriptedAdapter {
            provider: Provider::Aws,
            responses: Mutex::new(vec![Err("provider API unreachable".to_string())]),
        };

        let record = sync_provider(&storage, &adapter, &EngineConfig::default(), None).await.unwrap();
        assert_eq!(record.status, SyncStatus::Failed);
        assert_eq!(record.errors, vec!["provider API unreachable".to_string()]);
    }

    /// S3: a node absent for longer than the stale threshold is marked
    /// disappeared, then reinstated on return without a new `node-created`.
    #[tokio::test]
    async fn disappearance_then_return_s3() {
        let storage = MemoryStorage::new();
        let mut config = EngineConfig::default();
        config.stale_threshold_ms = 5;

        storage.upsert_node(node_input("n1", 100.0)).await.unwrap();

        // Cycle 1: adapter no longer reports n1. Not yet stale.
        let adapter = ScriptedAdapter {
            provider: Provider::Aws,
            responses: Mutex::new(vec![Ok(DiscoverResult::default())]),
        };
        sync_provider(&storage, &adapter, &config, None).await.unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(10)).await;

        // Cycle 2: still absent, now past the stale threshold.
        let adapter = ScriptedAdapter {
            provider: Provider::Aws,
            responses: Mutex::new(vec![Ok(DiscoverResult::default())]),
        };
        let record = sync_provider(&storage, &adapter, &config, None).await.unwrap();
        assert_eq!(record.nodes_disappeared, 1);

        let n1 = storage.get_node("n1").await.unwrap().unwrap();
        assert_eq!(n1.status, NodeStatus::Disappeared);

        // Cycle 3: n1 reappears. Reinstated via node-updated, not node-created.
        let adapter = ScriptedAdapter {
            provider: Provider::Aws,
            responses: Mutex::new(vec![Ok(DiscoverResult {
                nodes: vec![node_input("n1", 100.0)],
                edges: Vec::new(),
                errors: Vec::new(),
            })]),
        };
        let record = sync_provider(&storage, &adapter, &config, None).await.unwrap();
        assert_eq!(record.nodes_created, 0);
        assert_eq!(record.nodes_updated, 1);

        let n1 = storage.get_node("n1").await.unwrap().unwrap();
        assert_eq!(n1.status, NodeStatus::Running);
    }
}
