//! NIST SP 800-53 control pack (10 controls).

use std::sync::Arc;

use ikg_core::{RelationshipType, ResourceType};

use crate::control::{simple_control, Control, Severity};

#[must_use]
pub fn controls() -> Vec<Arc<dyn Control>> {
    vec![
        simple_control(
            "nist-ac-2-account-management",
            "nist-800-53",
            "AC-2",
            "Account management",
            "Identities must undergo periodic access review.",
            Severity::High,
            vec![ResourceType::IamRole, ResourceType::ServiceAccount],
            |ctx| ctx.has_tag_value("access-reviewed", "true"),
            "access has been reviewed",
            "access has not been reviewed",
        ),
        simple_control(
            "nist-au-2-audit-events",
            "nist-800-53",
            "AU-2",
            "Audit events",
            "Data and API endpoints must log auditable events.",
            Severity::High,
            vec![ResourceType::Database, ResourceType::ApiGateway],
            |ctx| ctx.has_tag_value("audit-logging", "true"),
            "audit logging is enabled",
            "audit logging is not enabled",
        ),
        simple_control(
            "nist-sc-7-boundary-protection",
            "nist-800-53",
            "SC-7",
            "Boundary protection",
            "Network boundaries must default-deny.",
            Severity::Critical,
            vec![ResourceType::Vpc, ResourceType::SecurityGroup],
            |ctx| ctx.has_tag_value("default-deny", "true"),
            "default-deny is configured",
            "default-deny is not configured",
        ),
        simple_control(
            "nist-sc-13-crypto-protection",
            "nist-800-53",
            "SC-13",
            "Cryptographic protection",
            "Data-at-rest resources must be encrypted.",
            Severity::Critical,
            vec![ResourceType::Database, ResourceType::Volume, ResourceType::Bucket],
            |ctx| ctx.has_tag_value("encrypted", "true"),
            "resource is encrypted",
            "resource is not encrypted",
        ),
        simple_control(
            "nist-cp-9-backup",
            "nist-800-53",
            "CP-9",
            "System backup",
            "Stateful resources must have backups configured.",
            Severity::High,
            vec![ResourceType::Database, ResourceType::Volume],
            |ctx| ctx.has_tag_value("backup-enabled", "true"),
            "backups are configured",
            "no backup configuration found",
        ),
        simple_control(
            "nist-si-4-monitoring",
            "nist-800-53",
            "SI-4",
            "System monitoring",
            "Compute resources must be monitored.",
            Severity::Medium,
            vec![ResourceType::Compute, ResourceType::Cluster],
            |ctx| ctx.has_edge(RelationshipType::Monitors),
            "a monitors edge is present",
            "no monitors edge found",
        ),
        simple_control(
            "nist-ia-2-identification-auth",
            "nist-800-53",
            "IA-2",
            "Identification and authentication",
            "Public endpoints must authenticate callers.",
            Severity::High,
            vec![ResourceType::ApiGateway, ResourceType::LoadBalancer],
            |ctx| ctx.has_edge(RelationshipType::AuthenticatedBy),
            "an authenticated-by edge is present",
            "no authenticated-by edge found",
        ),
        simple_control(
            "nist-cm-6-config-settings",
            "nist-800-53",
            "CM-6",
            "Configuration settings",
            "Compute resources must be attributable to a managing process.",
            Severity::Medium,
            vec![ResourceType::Compute, ResourceType::Function],
            |ctx| ctx.tag("managed-by").is_some(),
            "a managed-by tag is present",
            "no managed-by tag is present",
        ),
        simple_control(
            "nist-ra-5-vuln-scanning",
            "nist-800-53",
            "RA-5",
            "Vulnerability scanning",
            "Compute resources must undergo periodic vulnerability scanning.",
            Severity::Medium,
            vec![ResourceType::Compute, ResourceType::Container],
            |ctx| ctx.has_tag_value("vuln-scan", "true"),
            "vulnerability scanning is configured",
            "vulnerability scanning is not configured",
        ),
        simple_control(
            "nist-cm-7-least-functionality",
            "nist-800-53",
            "CM-7",
            "Least functionality",
            "Security groups must be scoped to least functionality.",
            Severity::Low,
            vec![ResourceType::SecurityGroup],
            |ctx| ctx.has_tag_value("least-functionality", "true"),
            "scoped to least functionality",
            "not scoped to least functionality",
        ),
    ]
}
