//! Read-only drift scan: runs discovery and diffing without mutating
//! `Storage` (`spec.md` §4.2).

use chrono::{DateTime, Duration, Utc};
use ikg_core::{Change, EngineConfig, Node, NodeFilter, NodeInput, Provider, Storage};

use crate::adapter::{Adapter, DiscoverOptions};
use crate::changes;
use crate::diff::diff_node;
use crate::error::Result;

/// One drifted node: the persisted node as last seen by Storage, plus the
/// `node-drifted` changes the scan would emit if it were a real sync.
#[derive(Debug, Clone)]
pub struct DriftedNode {
    pub node: Node,
    pub changes: Vec<Change>,
}

#[derive(Debug, Clone, Default)]
pub struct DriftScanResult {
    pub drifted_nodes: Vec<DriftedNode>,
    pub disappeared_nodes: Vec<Node>,
    pub new_nodes: Vec<NodeInput>,
    pub scanned_at: DateTime<Utc>,
}

/// Runs steps 2-3 and 6 of the reconciliation algorithm read-only: no
/// upserts, no `mark_nodes_disappeared`, no appended changes.
pub async fn drift_scan(storage: &dyn Storage, adapter: &dyn Adapter, config: &EngineConfig, options: Option<&DiscoverOptions>) -> Result<DriftScanResult> {
    let provider = adapter.provider();
    let scanned_at = Utc::now();
    tracing::debug!(?provider, "starting drift scan");

    let discovery = match adapter.discover(options).await {
        Ok(discovery) => discovery,
        Err(message) => {
            tracing::error!(?provider, %message, "adapter discover raised an exception during drift scan");
            return Err(crate::error::Error::Adapter { provider: format!("{provider:?}"), message });
        }
    };

    let mut result = DriftScanResult {
        scanned_at,
        ..DriftScanResult::default()
    };

    for input in discovery.nodes {
        match storage.get_node(&input.id).await? {
            None => result.new_nodes.push(input),
            Some(existing) => {
                let diffs = diff_node(&existing, &input);
                if !diffs.is_empty() {
                    let drift_changes = diffs.iter().map(|d| changes::node_drifted(&input.id, d)).collect();
                    result.drifted_nodes.push(DriftedNode {
                        node: existing,
                        changes: drift_changes,
                    });
                }
            }
        }
    }

    let stale_before = scanned_at - Duration::milliseconds(config.stale_threshold_ms);
    result.disappeared_nodes = disappeared_candidates(storage, provider, stale_before).await?;

    Ok(result)
}

async fn disappeared_candidates(storage: &dyn Storage, provider: Provider, stale_before: DateTime<Utc>) -> Result<Vec<Node>> {
    let filter = NodeFilter::new().provider(provider);
    let nodes = storage.query_nodes(&filter).await?;
    Ok(nodes
        .into_iter()
        .filter(|n| n.status != ikg_core::NodeStatus::Disappeared && n.last_seen_at < stale_before)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::DiscoverResult;
    use async_trait::async_trait;
    use ikg_core::{MemoryStorage, NodeInput, NodeStatus, ResourceType};
    use std::collections::HashMap;
    use std::sync::Mutex;

    fn node_input(id: &str) -> NodeInput {
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
            cost_monthly: None,
        }
    }

    struct ScriptedAdapter {
        responses: Mutex<Vec<Result<DiscoverResult, String>>>,
    }

    #[async_trait]
    impl Adapter for ScriptedAdapter {
        fn provider(&self) -> Provider {
            Provider::Aws
        }

        async fn health_check(&self) -> bool {
            true
        }

        async fn discover(&self, _options: Option<&DiscoverOptions>) -> Result<DiscoverResult, String> {
            self.responses.lock().unwrap().remove(0)
        }
    }

    /// Invariant #3: a drift scan never mutates storage.
    #[tokio::test]
    async fn drift_scan_does_not_mutate_storage() {
        let storage = MemoryStorage::new();
        storage.upsert_node(node_input("n1")).await.unwrap();

        let mut drifted = node_input("n1");
        drifted.status = NodeStatus::Stopped;
        let adapter = ScriptedAdapter {
            responses: Mutex::new(vec![Ok(DiscoverResult {
                nodes: vec![drifted],
                edges: Vec::new(),
                errors: Vec::new(),
            })]),
        };

        let before = storage.query_nodes(&NodeFilter::new()).await.unwrap();
        let result = drift_scan(&storage, &adapter, &EngineConfig::default(), None).await.unwrap();
        let after = storage.query_nodes(&NodeFilter::new()).await.unwrap();

        assert_eq!(result.drifted_nodes.len(), 1);
        assert_eq!(result.drifted_nodes[0].changes[0].field.as_deref(), Some("status"));
        assert_eq!(before.len(), after.len());
        assert_eq!(before[0].status, after[0].status);
        assert_eq!(storage.get_node_timeline("n1", 10).await.unwrap().len(), 0);
    }
}
