//! Pulumi (TypeScript) patch text (`spec.md` §4.6 step 3).

use ikg_core::Node;

use crate::escape::ts_value;
use crate::fields::DriftedField;
use crate::naming::{camel_case, pulumi_resource_type, sanitize_identifier};

/// `const <var> = new <pulumi.Type>("<var>", { ...properties... });`
#[must_use]
pub fn generate(node: &Node, fields: &[DriftedField]) -> String {
    let pulumi_type = pulumi_resource_type(node.provider, node.resource_type);
    let var_name = sanitize_identifier(&node.name);

    let mut tags = Vec::new();
    let mut properties = String::new();
    for field in fields {
        if let Some(key) = field.tag_key() {
            tags.push((key.to_string(), field.new_value.clone()));
            continue;
        }
        let value = field.new_value.clone().unwrap_or_default();
        properties.push_str(&format!("    {}: {},\n", camel_case(&field.field), ts_value(&value)));
    }

    if !tags.is_empty() {
        properties.push_str("    tags: {\n");
        for (key, value) in &tags {
            properties.push_str(&format!("      {}: {},\n", camel_case(key), ts_value(value.as_deref().unwrap_or_default())));
        }
        properties.push_str("    },\n");
    }

    format!("const {var_name} = new {pulumi_type}(\"{var_name}\", {{\n{properties}}});\n")
}
