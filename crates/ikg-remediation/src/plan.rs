//! Orchestrates drift scan results into dialect-specific patches
//! (`spec.md` §4.6).

use std::collections::HashMap;

use ikg_core::{Edge, Node, RelationshipType};
use ikg_sync::DriftScanResult;

use crate::dialect::Dialect;
use crate::fields::{assess_risk, drifted_fields_from_changes, is_sensitive_field, DriftedField, RiskLevel};
use crate::naming::{pascal_case, sanitize_identifier};
use crate::topo::order_patches;
use crate::{cloudformation, pulumi, terraform};

#[derive(Debug, Clone, Default)]
pub struct RemediationOptions {
    /// Edges among the drifted nodes, used to order patches and to
    /// surface dependency warnings. `None` disables both.
    pub edges: Option<Vec<Edge>>,
    /// Emit `import` blocks for HCL dialects (`spec.md` §4.6).
    pub generate_imports: bool,
    pub module_aware: bool,
    pub module_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UnremediableNode {
    pub node_id: String,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub struct DependencyWarning {
    pub source_node_id: String,
    pub target_node_id: String,
    pub relationship: RelationshipType,
    pub affected_fields: Vec<String>,
}

/// One generated patch against a single drifted node.
#[derive(Debug, Clone)]
pub struct Patch {
    pub node_id: String,
    pub dialect: Dialect,
    pub risk: RiskLevel,
    pub drifted_fields: Vec<DriftedField>,
    pub text: String,
    /// The dialect-specific resource address (`type.name`, a Pulumi
    /// variable name, or a CloudFormation logical id) used to cross-
    /// reference imports and dependency ordering.
    pub resource_address: String,
}

#[derive(Debug, Clone)]
pub struct RemediationPlan {
    pub dialect: Dialect,
    pub patches: Vec<Patch>,
    pub auto_remediable: Vec<String>,
    pub manual_review: Vec<String>,
    pub unremediable: Vec<UnremediableNode>,
    pub imports: Vec<String>,
    pub dependency_warnings: Vec<DependencyWarning>,
}

pub struct RemediationGenerator;

impl RemediationGenerator {
    /// Builds a full remediation plan from a drift scan result. Pure and
    /// synchronous: patch generation has no operational failure mode, so
    /// unsupported dialects and disappeared resources are encoded in the
    /// plan's shape rather than as an `Err`.
    #[must_use]
    pub fn generate(drift: &DriftScanResult, dialect: Dialect, options: &RemediationOptions) -> RemediationPlan {
        tracing::debug!(?dialect, drifted = drift.drifted_nodes.len(), disappeared = drift.disappeared_nodes.len(), "generating remediation plan");
        let mut patches = Vec::new();
        let mut unremediable = Vec::new();
        let mut nodes_by_id: HashMap<String, Node> = HashMap::new();

        for drifted in &drift.drifted_nodes {
            let node = &drifted.node;
            nodes_by_id.insert(node.id.clone(), node.clone());

            let fields = drifted_fields_from_changes(&drifted.changes);
            if fields.is_empty() {
                continue;
            }

            if !dialect.supports(node.provider) {
                unremediable.push(UnremediableNode {
                    node_id: node.id.clone(),
                    reason: format!("{dialect:?} does not support provider {:?}", node.provider),
                });
                continue;
            }

            let risk = assess_risk(node, &fields);
            tracing::debug!(node_id = %node.id, ?risk, fields = fields.len(), "classified patch risk");
            let (text, resource_address) = render(node, &fields, dialect, options);

            patches.push(Patch {
                node_id: node.id.clone(),
                dialect,
                risk,
                drifted_fields: fields,
                text,
                resource_address,
            });
        }

        for node in &drift.disappeared_nodes {
            unremediable.push(UnremediableNode {
                node_id: node.id.clone(),
                reason: "resource has disappeared; there is no live target to patch".to_string(),
            });
        }

        let patch_ids: Vec<String> = patches.iter().map(|p| p.node_id.clone()).collect();
        let ordered_ids = order_patches(&patch_ids, options.edges.as_deref());
        let order_index: HashMap<&str, usize> = ordered_ids.iter().enumerate().map(|(i, id)| (id.as_str(), i)).collect();
        patches.sort_by_key(|p| order_index.get(p.node_id.as_str()).copied().unwrap_or(usize::MAX));

        let mut auto_remediable = Vec::new();
        let mut manual_review = Vec::new();
        for patch in &patches {
            if patch.risk != RiskLevel::Low {
                manual_review.push(patch.node_id.clone());
            } else {
                auto_remediable.push(patch.node_id.clone());
            }
        }

        let imports = if options.generate_imports && dialect.is_hcl() {
            patches
                .iter()
                .filter_map(|p| nodes_by_id.get(&p.node_id))
                .map(terraform::import_block)
                .collect()
        } else {
            Vec::new()
        };

        let dependency_warnings = dependency_warnings(&patches, &nodes_by_id, options.edges.as_deref());

        RemediationPlan {
            dialect,
            patches,
            auto_remediable,
            manual_review,
            unremediable,
            imports,
            dependency_warnings,
        }
    }
}

fn render(node: &Node, fields: &[DriftedField], dialect: Dialect, options: &RemediationOptions) -> (String, String) {
    match dialect {
        Dialect::Terraform | Dialect::OpenTofu => {
            let (tf_type, tf_name) = terraform::resource_address(node);
            let text = if options.module_aware {
                let module_name = options.module_name.as_deref().unwrap_or("remediation");
                terraform::generate_module_aware(node, fields, module_name)
            } else {
                terraform::generate(node, fields)
            };
            (text, format!("{tf_type}.{tf_name}"))
        }
        Dialect::Pulumi => (pulumi::generate(node, fields), sanitize_identifier(&node.name)),
        Dialect::CloudFormation => (cloudformation::generate(node, fields), pascal_case(&node.name)),
    }
}

/// Surfaces a warning whenever a patched node's drifted fields touch a
/// sensitive attribute and another known node depends on it
/// (`spec.md` §4.6, "Dependency warnings"). The target need not itself
/// be drifting: it is a dependent whose configuration may now be stale.
fn dependency_warnings(patches: &[Patch], nodes_by_id: &HashMap<String, Node>, edges: Option<&[Edge]>) -> Vec<DependencyWarning> {
    let Some(edges) = edges else { return Vec::new() };
    let patched: HashMap<&str, &Patch> = patches.iter().map(|p| (p.node_id.as_str(), p)).collect();

    edges
        .iter()
        .filter_map(|edge| {
            let source_patch = patched.get(edge.source_node_id.as_str())?;
            nodes_by_id.get(edge.target_node_id.as_str())?;

            let affected_fields: Vec<String> = source_patch
                .drifted_fields
                .iter()
                .filter(|f| is_sensitive_field(&f.field))
                .map(|f| f.field.clone())
                .collect();
            if affected_fields.is_empty() {
                return None;
            }

            Some(DependencyWarning {
                source_node_id: edge.source_node_id.clone(),
                target_node_id: edge.target_node_id.clone(),
                relationship: edge.relationship_type,
                affected_fields,
            })
        })
        .collect()
}
