//! Topology export to JSON, DOT, and Mermaid (`spec.md` §6).

use ikg_core::{Edge, Node, ResourceType};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write as _;

/// Edges with confidence below this are rendered dashed in DOT and Mermaid.
const LOW_CONFIDENCE_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Dot,
    Mermaid,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ExportOptions {
    /// Include `cost_monthly` in node labels (DOT/Mermaid only).
    pub include_cost: bool,
}

#[derive(Serialize)]
struct JsonExport<'a> {
    nodes: &'a [Node],
    edges: &'a [Edge],
}

#[must_use]
pub fn export_topology(nodes: &[Node], edges: &[Edge], format: ExportFormat, options: ExportOptions) -> String {
    match format {
        ExportFormat::Json => export_json(nodes, edges),
        ExportFormat::Dot => export_dot(nodes, edges, options),
        ExportFormat::Mermaid => export_mermaid(nodes, edges, options),
    }
}

fn export_json(nodes: &[Node], edges: &[Edge]) -> String {
    serde_json::to_string_pretty(&JsonExport { nodes, edges }).unwrap_or_else(|_| "{}".to_string())
}

fn sanitize_id(id: &str) -> String {
    id.chars().map(|c| if c.is_ascii_alphanumeric() { c } else { '_' }).collect()
}

fn group_by_provider(nodes: &[Node]) -> BTreeMap<String, Vec<&Node>> {
    let mut grouped: BTreeMap<String, Vec<&Node>> = BTreeMap::new();
    for node in nodes {
        let key = serde_json::to_value(node.provider)
            .ok()
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_else(|| "unknown".to_string());
        grouped.entry(key).or_default().push(node);
    }
    grouped
}

fn relationship_label(relationship_type: ikg_core::RelationshipType) -> String {
    serde_json::to_value(relationship_type)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_else(|| "related-to".to_string())
}

fn node_label(node: &Node, include_cost: bool) -> String {
    match (include_cost, node.cost_monthly) {
        (true, Some(cost)) => format!("{} (${cost:.2}/mo)", node.name),
        _ => node.name.clone(),
    }
}

fn export_dot(nodes: &[Node], edges: &[Edge], options: ExportOptions) -> String {
    let mut out = String::new();
    out.push_str("digraph infrastructure {\n");

    for (provider, provider_nodes) in group_by_provider(nodes) {
        let _ = writeln!(out, "  subgraph cluster_{} {{", sanitize_id(&provider));
        let _ = writeln!(out, "    label = \"{provider}\";");
        for node in provider_nodes {
            let label = node_label(node, options.include_cost);
            let _ = writeln!(out, "    \"{}\" [label=\"{}\"];", sanitize_id(&node.id), label.replace('"', "\\\""));
        }
        out.push_str("  }\n");
    }

    for edge in edges {
        let style = if edge.confidence < LOW_CONFIDENCE_THRESHOLD { ", style=dashed" } else { "" };
        let _ = writeln!(
            out,
            "  \"{}\" -> \"{}\" [label=\"{}\"{}];",
            sanitize_id(&edge.source_node_id),
            sanitize_id(&edge.target_node_id),
            relationship_label(edge.relationship_type),
            style
        );
    }

    out.push_str("}\n");
    out
}

fn mermaid_shape(node: &Node, label: &str) -> String {
    let id = sanitize_id(&node.id);
    match node.resource_type {
        ResourceType::Database => format!("{id}[({label})]"),
        ResourceType::Vpc => format!("{id}{{{{{label}}}}}"),
        _ => format!("{id}[{label}]"),
    }
}

fn export_mermaid(nodes: &[Node], edges: &[Edge], options: ExportOptions) -> String {
    let mut out = String::new();
    out.push_str("flowchart LR\n");

    for (provider, provider_nodes) in group_by_provider(nodes) {
        let _ = writeln!(out, "  subgraph {}[\"{}\"]", sanitize_id(&provider), provider);
        for node in provider_nodes {
            let label = node_label(node, options.include_cost);
            let _ = writeln!(out, "    {}", mermaid_shape(node, &label));
        }
        out.push_str("  end\n");
    }

    for edge in edges {
        let arrow = if edge.confidence < LOW_CONFIDENCE_THRESHOLD { "-.->" } else { "-->" };
        let _ = writeln!(
            out,
            "  {} {}|{}| {}",
            sanitize_id(&edge.source_node_id),
            arrow,
            relationship_label(edge.relationship_type),
            sanitize_id(&edge.target_node_id)
        );
    }

    out
}
