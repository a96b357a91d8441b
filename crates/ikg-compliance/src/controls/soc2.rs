//! SOC 2 control pack (5 controls).

use std::sync::Arc;

use ikg_core::{RelationshipType, ResourceType};

use crate::control::{simple_control, Control, Severity};

#[must_use]
pub fn controls() -> Vec<Arc<dyn Control>> {
    vec![
        simple_control(
            "soc2-encryption-at-rest",
            "soc2",
            "CC6.1",
            "Encryption at rest",
            "Storage resources holding customer data must be encrypted at rest.",
            Severity::High,
            vec![ResourceType::Database, ResourceType::Bucket, ResourceType::Volume],
            |ctx| ctx.has_tag_value("encrypted", "true"),
            "resource is encrypted at rest",
            "resource is missing the encrypted=true tag",
        ),
        simple_control(
            "soc2-access-logging",
            "soc2",
            "CC7.2",
            "Access logging enabled",
            "Public-facing resources must log access for monitoring.",
            Severity::Medium,
            vec![ResourceType::LoadBalancer, ResourceType::ApiGateway, ResourceType::Bucket],
            |ctx| ctx.has_tag_value("access-logging", "true"),
            "access logging is enabled",
            "access logging is not enabled",
        ),
        simple_control(
            "soc2-mfa-enforced",
            "soc2",
            "CC6.2",
            "MFA enforced for privileged identities",
            "IAM principals must require multi-factor authentication.",
            Severity::Critical,
            vec![ResourceType::IamRole, ResourceType::ServiceAccount],
            |ctx| ctx.has_tag_value("mfa-enforced", "true"),
            "MFA is enforced",
            "MFA is not enforced",
        ),
        simple_control(
            "soc2-backup-enabled",
            "soc2",
            "A1.2",
            "Backups enabled",
            "Stateful resources must have backups configured.",
            Severity::High,
            vec![ResourceType::Database, ResourceType::Volume],
            |ctx| ctx.has_tag_value("backup-enabled", "true") || ctx.has_edge(RelationshipType::BacksUp),
            "backups are configured",
            "no backup configuration or backs-up edge found",
        ),
        simple_control(
            "soc2-change-management",
            "soc2",
            "CC8.1",
            "Change management tracked",
            "Compute resources must be attributable to a managing process.",
            Severity::Medium,
            vec![ResourceType::Compute, ResourceType::Function, ResourceType::Cluster],
            |ctx| ctx.tag("managed-by").is_some(),
            "a managed-by tag is present",
            "no managed-by tag is present",
        ),
    ]
}
