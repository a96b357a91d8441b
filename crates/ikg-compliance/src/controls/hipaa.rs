//! HIPAA control pack (4 controls).

use std::sync::Arc;

use ikg_core::{RelationshipType, ResourceType};

use crate::control::{simple_control, Control, Severity};

#[must_use]
pub fn controls() -> Vec<Arc<dyn Control>> {
    vec![
        simple_control(
            "hipaa-phi-encryption",
            "hipaa",
            "164.312(a)(2)(iv)",
            "PHI encryption at rest",
            "Resources tagged as holding PHI must be encrypted.",
            Severity::Critical,
            vec![ResourceType::Database, ResourceType::Bucket, ResourceType::Volume],
            |ctx| !ctx.has_tag_value("contains-phi", "true") || ctx.has_tag_value("encrypted", "true"),
            "PHI-bearing resource is encrypted, or does not hold PHI",
            "resource holds PHI but is not encrypted",
        ),
        simple_control(
            "hipaa-access-controls",
            "hipaa",
            "164.312(a)(1)",
            "Access control enforced",
            "PHI-adjacent resources must be secured by an access-control mechanism.",
            Severity::High,
            vec![ResourceType::Database, ResourceType::ApiGateway],
            |ctx| ctx.has_edge(RelationshipType::SecuredBy),
            "a secured-by edge is present",
            "no secured-by edge found",
        ),
        simple_control(
            "hipaa-audit-logging",
            "hipaa",
            "164.312(b)",
            "Audit logging enabled",
            "PHI-adjacent resources must log access for audit review.",
            Severity::High,
            vec![ResourceType::Database, ResourceType::ApiGateway, ResourceType::Function],
            |ctx| ctx.has_tag_value("audit-logging", "true"),
            "audit logging is enabled",
            "audit logging is not enabled",
        ),
        simple_control(
            "hipaa-minimum-necessary-access",
            "hipaa",
            "164.502(b)",
            "Minimum necessary access",
            "Identities touching PHI must follow least-privilege access.",
            Severity::Medium,
            vec![ResourceType::IamRole, ResourceType::ServiceAccount],
            |ctx| ctx.has_tag_value("least-privilege", "true"),
            "least-privilege access is configured",
            "no least-privilege tag found",
        ),
    ]
}
