//! ISO/IEC 27001 control pack (4 controls).

use std::sync::Arc;

use ikg_core::{RelationshipType, ResourceType};

use crate::control::{simple_control, Control, Severity};

#[must_use]
pub fn controls() -> Vec<Arc<dyn Control>> {
    vec![
        simple_control(
            "iso27001-asset-owner-assigned",
            "iso-27001",
            "A.5.9",
            "Asset owner assigned",
            "Every tracked asset must have an assigned owner.",
            Severity::Medium,
            vec![ResourceType::Compute, ResourceType::Database, ResourceType::Storage],
            |ctx| ctx.node.owner.is_some(),
            "an owner is assigned",
            "no owner is assigned",
        ),
        simple_control(
            "iso27001-access-review",
            "iso-27001",
            "A.5.18",
            "Access rights reviewed",
            "Identity resources must undergo periodic access review.",
            Severity::High,
            vec![ResourceType::IamRole, ResourceType::ServiceAccount],
            |ctx| ctx.has_tag_value("access-reviewed", "true"),
            "access rights have been reviewed",
            "access rights have not been reviewed",
        ),
        simple_control(
            "iso27001-incident-monitoring",
            "iso-27001",
            "A.8.16",
            "Monitoring for incident response",
            "Compute resources must be monitored to support incident response.",
            Severity::Medium,
            vec![ResourceType::Compute, ResourceType::Cluster, ResourceType::Function],
            |ctx| ctx.has_edge(RelationshipType::Monitors),
            "a monitors edge is present",
            "no monitors edge found",
        ),
        simple_control(
            "iso27001-secure-disposal",
            "iso-27001",
            "A.7.14",
            "Secure disposal policy",
            "Storage resources must carry a secure-disposal policy.",
            Severity::Low,
            vec![ResourceType::Volume, ResourceType::Bucket],
            |ctx| ctx.has_tag_value("disposal-policy", "true"),
            "a disposal policy is configured",
            "no disposal policy is configured",
        ),
    ]
}
