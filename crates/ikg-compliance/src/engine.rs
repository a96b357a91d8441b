//! Per-framework evaluation and multi-framework roll-up (`spec.md` §4.4).

use std::collections::HashMap;
use std::sync::Arc;

use ikg_core::{Direction, Node, NodeFilter, Storage};

use crate::context::ControlContext;
use crate::control::{Control, ControlStatus, Severity};
use crate::error::Result;

/// One control's outcome against one node, or a synthetic not-applicable
/// entry when zero nodes matched the control's resource types.
#[derive(Debug, Clone)]
pub struct ControlResult {
    pub control_id: String,
    pub framework: String,
    pub section: String,
    pub title: String,
    pub severity: Severity,
    pub node_id: Option<String>,
    pub status: ControlStatus,
    pub reason: String,
}

/// Aggregate outcome for one framework. `total` is the number of entries in
/// `results`, so `passed + failed + warnings + not_applicable == total`
/// holds by construction (testable property #8).
#[derive(Debug, Clone, Default)]
pub struct FrameworkResult {
    pub framework: String,
    pub results: Vec<ControlResult>,
    pub passed: u32,
    pub failed: u32,
    pub warnings: u32,
    pub not_applicable: u32,
    pub total: u32,
    pub score: f64,
    pub severity_histogram: HashMap<Severity, u32>,
}

/// A node with at least one failing critical/high-severity control,
/// surfaced by a multi-framework assessment.
#[derive(Debug, Clone)]
pub struct CriticalResource {
    pub node_id: String,
    pub failing_control_count: u32,
}

#[derive(Default)]
pub struct ComplianceEngine;

impl ComplianceEngine {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    pub async fn evaluate_framework(
        &self,
        storage: &dyn Storage,
        controls: &[Arc<dyn Control>],
        framework: &str,
        filter: Option<&NodeFilter>,
    ) -> Result<FrameworkResult> {
        let default_filter = NodeFilter::new();
        let filter = filter.unwrap_or(&default_filter);
        let nodes = storage.query_nodes(filter).await?;

        let mut results = Vec::new();

        for control in controls {
            let applicable: Vec<&Node> = nodes.iter().filter(|n| control.applicable_resource_types().contains(&n.resource_type)).collect();

            if applicable.is_empty() {
                tracing::debug!(control_id = control.id(), "control has no applicable nodes");
                results.push(ControlResult {
                    control_id: control.id().to_string(),
                    framework: control.framework().to_string(),
                    section: control.section().to_string(),
                    title: control.title().to_string(),
                    severity: control.severity(),
                    node_id: None,
                    status: ControlStatus::NotApplicable,
                    reason: String::new(),
                });
                continue;
            }

            for node in applicable {
                let ctx = build_context(storage, node).await?;
                let (status, reason) = match control.evaluate(&ctx) {
                    Ok(status) => {
                        let reason = control.reason(&ctx, status);
                        (status, reason)
                    }
                    Err(message) => {
                        tracing::warn!(control_id = control.id(), node_id = %node.id, %message, "control evaluation failed");
                        (ControlStatus::Fail, message)
                    }
                };
                results.push(ControlResult {
                    control_id: control.id().to_string(),
                    framework: control.framework().to_string(),
                    section: control.section().to_string(),
                    title: control.title().to_string(),
                    severity: control.severity(),
                    node_id: Some(node.id.clone()),
                    status,
                    reason,
                });
            }
        }

        Ok(aggregate(framework, results))
    }

    /// Evaluates every supplied framework and derives the critical-resources
    /// roll-up across all of them.
    pub async fn assess(
        &self,
        storage: &dyn Storage,
        frameworks: &[(String, Vec<Arc<dyn Control>>)],
        filter: Option<&NodeFilter>,
    ) -> Result<(Vec<FrameworkResult>, Vec<CriticalResource>)> {
        let mut framework_results = Vec::with_capacity(frameworks.len());
        for (name, controls) in frameworks {
            framework_results.push(self.evaluate_framework(storage, controls, name, filter).await?);
        }
        let critical = critical_resources(&framework_results);
        Ok((framework_results, critical))
    }
}

async fn build_context<'a>(storage: &dyn Storage, node: &'a Node) -> Result<ControlContext<'a>> {
    let edges = storage.get_edges_for_node(&node.id, Direction::Both).await?;
    let mut incident = std::collections::HashSet::new();
    let mut neighbor_ids = Vec::new();
    for edge in &edges {
        incident.insert(edge.relationship_type);
        let neighbor_id = if edge.source_node_id == node.id { &edge.target_node_id } else { &edge.source_node_id };
        neighbor_ids.push(neighbor_id.clone());
    }

    let mut neighbors = Vec::with_capacity(neighbor_ids.len());
    for id in neighbor_ids {
        if let Some(n) = storage.get_node(&id).await? {
            neighbors.push(n);
        }
    }

    Ok(ControlContext::new(node, neighbors, incident))
}

fn aggregate(framework: &str, results: Vec<ControlResult>) -> FrameworkResult {
    let mut passed = 0u32;
    let mut failed = 0u32;
    let mut warnings = 0u32;
    let mut not_applicable = 0u32;
    let mut severity_histogram = HashMap::new();

    for result in &results {
        match result.status {
            ControlStatus::Pass => passed += 1,
            ControlStatus::Fail => {
                failed += 1;
                *severity_histogram.entry(result.severity).or_insert(0) += 1;
            }
            ControlStatus::Warning => warnings += 1,
            ControlStatus::NotApplicable => not_applicable += 1,
        }
    }

    let applicable_total = passed + failed + warnings;
    let score = if applicable_total == 0 {
        100.0
    } else {
        ((f64::from(passed) / f64::from(applicable_total)) * 1000.0).round() / 10.0
    };

    FrameworkResult {
        framework: framework.to_string(),
        total: results.len() as u32,
        passed,
        failed,
        warnings,
        not_applicable,
        score,
        severity_histogram,
        results,
    }
}

fn critical_resources(framework_results: &[FrameworkResult]) -> Vec<CriticalResource> {
    let mut counts: HashMap<String, u32> = HashMap::new();
    for framework in framework_results {
        for result in &framework.results {
            if result.status != ControlStatus::Fail {
                continue;
            }
            if !matches!(result.severity, Severity::Critical | Severity::High) {
                continue;
            }
            if let Some(node_id) = &result.node_id {
                *counts.entry(node_id.clone()).or_insert(0) += 1;
            }
        }
    }

    let mut resources: Vec<CriticalResource> = counts
        .into_iter()
        .map(|(node_id, failing_control_count)| CriticalResource { node_id, failing_control_count })
        .collect();
    resources.sort_by(|a, b| b.failing_control_count.cmp(&a.failing_control_count));
    resources
}
