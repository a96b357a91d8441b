//! Mutable-field diffing between a persisted node and a freshly discovered
//! one (`spec.md` §4.2 step 3).

use ikg_core::{Node, NodeInput};

/// One differing field, stringified for the change log.
#[derive(Debug, Clone)]
pub struct FieldDiff {
    pub field: &'static str,
    pub previous_value: Option<String>,
    pub new_value: Option<String>,
}

fn status_str(status: ikg_core::NodeStatus) -> String {
    serde_json::to_value(status).ok().and_then(|v| v.as_str().map(str::to_string)).unwrap_or_default()
}

fn cost_str(cost: Option<f64>) -> Option<String> {
    cost.map(|c| c.to_string())
}

/// Diffs the mutable field set `{name, status, region, owner, cost_monthly}`
/// plus `tags` and `metadata` (deep structural equality). Field order is the
/// order the spec lists them in.
#[must_use]
pub fn diff_node(existing: &Node, discovered: &NodeInput) -> Vec<FieldDiff> {
    let mut diffs = Vec::new();

    if existing.name != discovered.name {
        diffs.push(FieldDiff {
            field: "name",
            previous_value: Some(existing.name.clone()),
            new_value: Some(discovered.name.clone()),
        });
    }
    if existing.status != discovered.status {
        diffs.push(FieldDiff {
            field: "status",
            previous_value: Some(status_str(existing.status)),
            new_value: Some(status_str(discovered.status)),
        });
    }
    if existing.region != discovered.region {
        diffs.push(FieldDiff {
            field: "region",
            previous_value: Some(existing.region.clone()),
            new_value: Some(discovered.region.clone()),
        });
    }
    if existing.owner != discovered.owner {
        diffs.push(FieldDiff {
            field: "owner",
            previous_value: existing.owner.clone(),
            new_value: discovered.owner.clone(),
        });
    }
    if existing.cost_monthly != discovered.cost_monthly {
        diffs.push(FieldDiff {
            field: "cost_monthly",
            previous_value: cost_str(existing.cost_monthly),
            new_value: cost_str(discovered.cost_monthly),
        });
    }
    if existing.tags != discovered.tags {
        diffs.push(FieldDiff {
            field: "tags",
            previous_value: serde_json::to_string(&existing.tags).ok(),
            new_value: serde_json::to_string(&discovered.tags).ok(),
        });
    }
    if existing.metadata != discovered.metadata {
        diffs.push(FieldDiff {
            field: "metadata",
            previous_value: serde_json::to_string(&existing.metadata).ok(),
            new_value: serde_json::to_string(&discovered.metadata).ok(),
        });
    }

    diffs
}
