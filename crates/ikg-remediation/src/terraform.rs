//! Terraform / OpenTofu patch text (`spec.md` §4.6 step 3).

use ikg_core::Node;

use crate::escape::hcl_value;
use crate::fields::DriftedField;
use crate::naming::{sanitize_identifier, tf_resource_type};

/// The `(type, name)` address identifying the generated resource block,
/// e.g. `aws_instance.web_1`.
#[must_use]
pub fn resource_address(node: &Node) -> (String, String) {
    (tf_resource_type(node.provider, node.resource_type), sanitize_identifier(&node.name))
}

fn attribute_block(fields: &[DriftedField]) -> (String, Vec<(String, Option<String>)>) {
    let mut attrs = String::new();
    let mut tag_pairs = Vec::new();
    for field in fields {
        if let Some(key) = field.tag_key() {
            tag_pairs.push((key.to_string(), field.new_value.clone()));
            continue;
        }
        let value = field.new_value.clone().unwrap_or_default();
        attrs.push_str(&format!("  {} = {}\n", field.field, hcl_value(&value)));
    }
    (attrs, tag_pairs)
}

/// A standalone `resource` block with one assignment per drifted field;
/// tag fields collect into a `tags { … }` block.
#[must_use]
pub fn generate(node: &Node, fields: &[DriftedField]) -> String {
    let (tf_type, tf_name) = resource_address(node);
    let (mut attrs, tags) = attribute_block(fields);

    if !tags.is_empty() {
        attrs.push_str("  tags = {\n");
        for (key, value) in &tags {
            attrs.push_str(&format!("    {} = {}\n", key, hcl_value(value.as_deref().unwrap_or_default())));
        }
        attrs.push_str("  }\n");
    }

    format!("resource \"{tf_type}\" \"{tf_name}\" {{\n{attrs}}}\n")
}

/// Emits the base resource block followed by a `module` block that wraps
/// it, exposing the same drifted values as module variables (`spec.md`
/// §4.6 step 3, "Module-aware Terraform").
#[must_use]
pub fn generate_module_aware(node: &Node, fields: &[DriftedField], module_name: &str) -> String {
    let (_, tf_name) = resource_address(node);
    let base = generate(node, fields);

    let mut variables = String::new();
    for field in fields {
        let key = field.tag_key().map_or(field.field.clone(), |tag| format!("tag_{tag}"));
        let value = field.new_value.clone().unwrap_or_default();
        variables.push_str(&format!("  {key} = {}\n", hcl_value(&value)));
    }

    let module = format!(
        "# module wrapping the resource block above, exposing the same\n\
         # drifted values as module variables for review\n\
         module \"{tf_name}\" {{\n  source = \"./modules/{module_name}\"\n{variables}}}\n"
    );

    format!("{base}\n{module}")
}

/// `import { to = <tf-type>.<tf-name>; id = "<nodeId>" }` (Terraform/
/// OpenTofu only).
#[must_use]
pub fn import_block(node: &Node) -> String {
    let (tf_type, tf_name) = resource_address(node);
    format!("import {{\n  to = {tf_type}.{tf_name}\n  id = \"{}\"\n}}\n", node.id)
}
