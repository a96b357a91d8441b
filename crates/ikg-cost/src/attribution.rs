//! Cost aggregation across a subgraph, a filter, or a provider/resource-type
//! group. `spec.md` §2 lists cost attribution as a top-level component but
//! gives it no dedicated `[MODULE]` block; grounded here on the same
//! group-by-key aggregation pattern used for the forecast engine's
//! per-provider/per-resource-type summary enrichment (§4.5).

use ikg_core::{Node, NodeFilter, Provider, ResourceType, Storage};
use std::collections::BTreeMap;

use crate::error::Result;

/// Aggregate cost over a set of nodes. `total_monthly` is the sum of every
/// known `cost_monthly`; nodes with `cost_monthly == None` contribute zero
/// to the total and are counted in `unknown_cost_count`.
#[derive(Debug, Clone, Default)]
pub struct CostAttribution {
    pub total_monthly: f64,
    pub node_count: usize,
    pub unknown_cost_count: usize,
    pub by_provider: BTreeMap<String, f64>,
    pub by_resource_type: BTreeMap<String, f64>,
}

fn provider_key(provider: Provider) -> String {
    serde_json::to_value(provider)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_else(|| "unknown".to_string())
}

fn resource_type_key(resource_type: ResourceType) -> String {
    serde_json::to_value(resource_type)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_else(|| "unknown".to_string())
}

/// Attribute cost across an already-materialized node set (e.g. a blast
/// radius or filtered subgraph result).
#[must_use]
pub fn attribute_cost(nodes: &[Node]) -> CostAttribution {
    let mut attribution = CostAttribution {
        node_count: nodes.len(),
        ..CostAttribution::default()
    };

    for node in nodes {
        match node.cost_monthly {
            Some(cost) => {
                attribution.total_monthly += cost;
                *attribution.by_provider.entry(provider_key(node.provider)).or_insert(0.0) += cost;
                *attribution.by_resource_type.entry(resource_type_key(node.resource_type)).or_insert(0.0) += cost;
            }
            None => attribution.unknown_cost_count += 1,
        }
    }

    attribution
}

/// Attribute cost across every node matching `filter`.
pub async fn attribute_cost_for_filter(storage: &dyn Storage, filter: &NodeFilter) -> Result<CostAttribution> {
    let nodes = storage.query_nodes(filter).await?;
    tracing::debug!(matched = nodes.len(), "attributing cost across filtered node set");
    Ok(attribute_cost(&nodes))
}
