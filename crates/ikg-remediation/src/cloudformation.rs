//! CloudFormation (YAML) patch text (`spec.md` §4.6 step 3). AWS-only per
//! the dialect support matrix in [`crate::dialect`].

use ikg_core::Node;

use crate::escape::yaml_value;
use crate::fields::DriftedField;
use crate::naming::{cloudformation_resource_type, pascal_case};

/// `<LogicalId>:\n  Type: ...\n  Properties:\n    ...`
#[must_use]
pub fn generate(node: &Node, fields: &[DriftedField]) -> String {
    let cfn_type = cloudformation_resource_type(node.resource_type);
    let logical_id = pascal_case(&node.name);

    let mut tags = Vec::new();
    let mut properties = String::new();
    for field in fields {
        if let Some(key) = field.tag_key() {
            tags.push((key.to_string(), field.new_value.clone()));
            continue;
        }
        let value = field.new_value.clone().unwrap_or_default();
        properties.push_str(&format!("    {}: {}\n", pascal_case(&field.field), yaml_value(&value)));
    }

    if !tags.is_empty() {
        properties.push_str("    Tags:\n");
        for (key, value) in &tags {
            properties.push_str(&format!("      - Key: {}\n        Value: {}\n", yaml_value(key), yaml_value(value.as_deref().unwrap_or_default())));
        }
    }

    format!("{logical_id}:\n  Type: {cfn_type}\n  Properties:\n{properties}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use ikg_core::{NodeStatus, Provider, ResourceType};
    use std::collections::HashMap;

    fn node() -> Node {
        let now = Utc::now();
        Node {
            id: "n1".into(),
            provider: Provider::Aws,
            resource_type: ResourceType::Compute,
            native_id: "i-1".into(),
            name: "web-1".into(),
            region: "us-east-1".into(),
            account: "acct".into(),
            owner: None,
            created_at: None,
            status: NodeStatus::Running,
            tags: HashMap::new(),
            metadata: HashMap::new(),
            cost_monthly: None,
            discovered_at: now,
            updated_at: now,
            last_seen_at: now,
        }
    }

    #[test]
    fn generates_a_logical_resource_block() {
        let fields = vec![DriftedField { field: "status".into(), previous_value: Some("running".into()), new_value: Some("stopped".into()) }];
        let text = generate(&node(), &fields);
        assert!(text.starts_with("Web1:\n  Type: AWS::EC2::Instance\n  Properties:\n"));
        assert!(text.contains("Status: \"stopped\""));
    }

    #[test]
    fn tag_fields_render_as_key_value_list() {
        let fields = vec![DriftedField { field: "tag:owner".into(), previous_value: None, new_value: Some("platform".into()) }];
        let text = generate(&node(), &fields);
        assert!(text.contains("Tags:"));
        assert!(text.contains("- Key: \"owner\""));
        assert!(text.contains("Value: \"platform\""));
    }
}
