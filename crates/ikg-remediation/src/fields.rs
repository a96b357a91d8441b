//! `DriftedField` extraction from the change log and risk assessment
//! (`spec.md` §4.6 steps 1 and 5).

use std::collections::{BTreeSet, HashMap};

use ikg_core::{Change, ChangeType, Node};

/// One drifted attribute, ready to render into a patch. Tag changes are
/// expanded one-per-key (field `"tag:<key>"`) so the generator can both
/// build a dialect's tags block and evaluate per-tag security relevance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriftedField {
    pub field: String,
    pub previous_value: Option<String>,
    pub new_value: Option<String>,
}

impl DriftedField {
    #[must_use]
    pub fn tag_key(&self) -> Option<&str> {
        self.field.strip_prefix("tag:")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

/// Builds `DriftedField[]` from changes of type `node-drifted` or
/// `node-updated` whose `field` is non-empty (`spec.md` §4.6 step 1).
#[must_use]
pub fn drifted_fields_from_changes(changes: &[Change]) -> Vec<DriftedField> {
    let mut fields = Vec::new();
    for change in changes {
        if !matches!(change.change_type, ChangeType::NodeDrifted | ChangeType::NodeUpdated) {
            continue;
        }
        let Some(field) = &change.field else { continue };
        if field.is_empty() {
            continue;
        }
        if field == "tags" {
            fields.extend(expand_tag_diff(change.previous_value.as_deref(), change.new_value.as_deref()));
        } else {
            fields.push(DriftedField { field: field.clone(), previous_value: change.previous_value.clone(), new_value: change.new_value.clone() });
        }
    }
    fields
}

fn expand_tag_diff(previous: Option<&str>, next: Option<&str>) -> Vec<DriftedField> {
    let prev_tags: HashMap<String, String> = previous.and_then(|s| serde_json::from_str(s).ok()).unwrap_or_default();
    let next_tags: HashMap<String, String> = next.and_then(|s| serde_json::from_str(s).ok()).unwrap_or_default();

    let mut keys: BTreeSet<&String> = prev_tags.keys().collect();
    keys.extend(next_tags.keys());

    keys.into_iter()
        .filter_map(|key| {
            let previous_value = prev_tags.get(key).cloned();
            let new_value = next_tags.get(key).cloned();
            if previous_value == new_value {
                return None;
            }
            Some(DriftedField { field: format!("tag:{key}"), previous_value, new_value })
        })
        .collect()
}

/// Dependency-warning sensitivity list (`spec.md` §4.6, "Dependency
/// warnings").
const SENSITIVE_FIELDS: [&str; 8] =
    ["status", "region", "name", "publicly-accessible", "encrypted", "vpc-id", "subnet-id", "security-group-id"];

fn normalized_field(field: &str) -> String {
    field.strip_prefix("tag:").unwrap_or(field).replace('_', "-").to_lowercase()
}

/// Risk-assessment security relevance: `*security*`, `publiclyAccessible`,
/// `*encrypted*` (`spec.md` §4.6 step 5).
#[must_use]
pub fn is_security_related(field: &str) -> bool {
    let normalized = normalized_field(field);
    normalized.contains("security") || normalized.contains("encrypted") || normalized.contains("publicly")
}

#[must_use]
pub fn is_sensitive_field(field: &str) -> bool {
    SENSITIVE_FIELDS.contains(&normalized_field(field).as_str())
}

fn is_production(node: &Node) -> bool {
    node.tags.get("environment").is_some_and(|v| v == "production") || node.tags.get("env").is_some_and(|v| v == "production")
}

/// `spec.md` §4.6 step 5: high if status drifted, or production-tagged
/// and security-related; medium if exactly one of those two holds; low
/// otherwise.
#[must_use]
pub fn assess_risk(node: &Node, fields: &[DriftedField]) -> RiskLevel {
    let touches_status = fields.iter().any(|f| f.field == "status");
    let production = is_production(node);
    let security_related = fields.iter().any(|f| is_security_related(&f.field));

    if touches_status || (production && security_related) {
        RiskLevel::High
    } else if production || security_related {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use ikg_core::{DetectedVia, Provider, ResourceType};
    use std::collections::HashMap as Map;

    fn node(tags: &[(&str, &str)]) -> Node {
        let now = Utc::now();
        Node {
            id: "n1".into(),
            provider: Provider::Aws,
            resource_type: ResourceType::Compute,
            native_id: "n1".into(),
            name: "web-1".into(),
            region: "us-east-1".into(),
            account: "acct".into(),
            owner: None,
            created_at: None,
            status: ikg_core::NodeStatus::Running,
            tags: tags.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
            metadata: Map::new(),
            cost_monthly: None,
            discovered_at: now,
            updated_at: now,
            last_seen_at: now,
        }
    }

    fn change(field: &str, previous: Option<&str>, new: Option<&str>) -> Change {
        Change {
            id: "c1".into(),
            target_id: "n1".into(),
            detected_at: Utc::now(),
            correlation_id: None,
            initiator: None,
            initiator_type: None,
            detected_via: DetectedVia::DriftScan,
            change_type: ChangeType::NodeDrifted,
            field: Some(field.to_string()),
            previous_value: previous.map(str::to_string),
            new_value: new.map(str::to_string),
            metadata: Map::new(),
        }
    }

    #[test]
    fn tag_diff_expands_to_one_field_per_changed_key() {
        let changes = vec![change("tags", Some(r#"{"encrypted":"false"}"#), Some(r#"{"encrypted":"true"}"#))];
        let fields = drifted_fields_from_changes(&changes);
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].field, "tag:encrypted");
    }

    #[test]
    fn status_drift_is_always_high_risk() {
        let fields = vec![DriftedField { field: "status".into(), previous_value: Some("running".into()), new_value: Some("stopped".into()) }];
        assert_eq!(assess_risk(&node(&[]), &fields), RiskLevel::High);
    }

    #[test]
    fn production_and_security_together_is_high_risk() {
        let fields = vec![DriftedField { field: "tag:encrypted".into(), previous_value: Some("true".into()), new_value: Some("false".into()) }];
        assert_eq!(assess_risk(&node(&[("environment", "production")]), &fields), RiskLevel::High);
    }

    #[test]
    fn production_alone_is_medium_risk() {
        let fields = vec![DriftedField { field: "region".into(), previous_value: Some("us-east-1".into()), new_value: Some("us-west-2".into()) }];
        assert_eq!(assess_risk(&node(&[("environment", "production")]), &fields), RiskLevel::Medium);
    }

    #[test]
    fn unrelated_field_on_non_production_node_is_low_risk() {
        let fields = vec![DriftedField { field: "name".into(), previous_value: Some("a".into()), new_value: Some("b".into()) }];
        assert_eq!(assess_risk(&node(&[]), &fields), RiskLevel::Low);
    }
}
