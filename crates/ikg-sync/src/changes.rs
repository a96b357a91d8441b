//! Change-record construction shared by the sync engine and the drift scan.

use chrono::Utc;
use ikg_core::{Change, ChangeType, DetectedVia, EdgeInput, NodeInput};
use std::collections::HashMap;
use uuid::Uuid;

use crate::diff::FieldDiff;

fn base_change(
    correlation_id: Option<&str>,
    target_id: &str,
    detected_via: DetectedVia,
    change_type: ChangeType,
    field: Option<String>,
    previous_value: Option<String>,
    new_value: Option<String>,
) -> Change {
    Change {
        id: Uuid::new_v4().to_string(),
        target_id: target_id.to_string(),
        detected_at: Utc::now(),
        correlation_id: correlation_id.map(str::to_string),
        initiator: None,
        initiator_type: None,
        detected_via,
        change_type,
        field,
        previous_value,
        new_value,
        metadata: HashMap::new(),
    }
}

#[must_use]
pub fn node_created(correlation_id: &str, input: &NodeInput) -> Change {
    base_change(Some(correlation_id), &input.id, DetectedVia::Sync, ChangeType::NodeCreated, None, None, None)
}

#[must_use]
pub fn node_updated(correlation_id: &str, node_id: &str, diff: &FieldDiff) -> Change {
    base_change(
        Some(correlation_id),
        node_id,
        DetectedVia::Sync,
        ChangeType::NodeUpdated,
        Some(diff.field.to_string()),
        diff.previous_value.clone(),
        diff.new_value.clone(),
    )
}

#[must_use]
pub fn cost_changed(correlation_id: &str, node_id: &str, diff: &FieldDiff) -> Change {
    base_change(
        Some(correlation_id),
        node_id,
        DetectedVia::Sync,
        ChangeType::CostChanged,
        Some(diff.field.to_string()),
        diff.previous_value.clone(),
        diff.new_value.clone(),
    )
}

#[must_use]
pub fn node_disappeared(correlation_id: &str, node_id: &str) -> Change {
    base_change(
        Some(correlation_id),
        node_id,
        DetectedVia::Sync,
        ChangeType::NodeDisappeared,
        Some("status".to_string()),
        None,
        Some("disappeared".to_string()),
    )
}

#[must_use]
pub fn edge_created(correlation_id: &str, input: &EdgeInput) -> Change {
    base_change(Some(correlation_id), &input.id, DetectedVia::Sync, ChangeType::EdgeCreated, None, None, None)
}

/// Drift-scan variant of `node_updated`: `change_type = node-drifted`,
/// `detected_via = drift-scan`, no `correlation_id` (the scan is not a sync
/// cycle).
#[must_use]
pub fn node_drifted(node_id: &str, diff: &FieldDiff) -> Change {
    base_change(
        None,
        node_id,
        DetectedVia::DriftScan,
        ChangeType::NodeDrifted,
        Some(diff.field.to_string()),
        diff.previous_value.clone(),
        diff.new_value.clone(),
    )
}
