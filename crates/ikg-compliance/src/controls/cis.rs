//! CIS Benchmarks control pack (10 controls).

use std::sync::Arc;

use ikg_core::{RelationshipType, ResourceType};

use crate::control::{simple_control, Control, Severity};

#[must_use]
pub fn controls() -> Vec<Arc<dyn Control>> {
    vec![
        simple_control(
            "cis-no-public-storage",
            "cis",
            "2.1.1",
            "Storage not publicly accessible",
            "Buckets and databases must not be publicly accessible.",
            Severity::Critical,
            vec![ResourceType::Bucket, ResourceType::Database],
            |ctx| !ctx.has_tag_value("publicly-accessible", "true"),
            "not publicly accessible",
            "resource is publicly accessible",
        ),
        simple_control(
            "cis-root-mfa",
            "cis",
            "1.5",
            "Privileged account MFA",
            "Privileged IAM roles must enforce MFA.",
            Severity::Critical,
            vec![ResourceType::IamRole],
            |ctx| ctx.has_tag_value("mfa-enforced", "true"),
            "MFA is enforced",
            "MFA is not enforced",
        ),
        simple_control(
            "cis-ssh-restricted",
            "cis",
            "5.2",
            "SSH access restricted",
            "Security groups must not allow unrestricted SSH.",
            Severity::High,
            vec![ResourceType::SecurityGroup],
            |ctx| ctx.has_tag_value("ssh-restricted", "true"),
            "SSH access is restricted",
            "SSH access is not restricted",
        ),
        simple_control(
            "cis-vpc-flow-logs",
            "cis",
            "3.9",
            "VPC flow logging enabled",
            "VPCs must have flow logs enabled.",
            Severity::Medium,
            vec![ResourceType::Vpc],
            |ctx| ctx.has_tag_value("flow-logs-enabled", "true"),
            "flow logs are enabled",
            "flow logs are not enabled",
        ),
        simple_control(
            "cis-volume-encryption",
            "cis",
            "2.2.1",
            "Volume encryption enabled",
            "Attached volumes must be encrypted.",
            Severity::High,
            vec![ResourceType::Volume],
            |ctx| ctx.has_tag_value("encrypted", "true"),
            "volume is encrypted",
            "volume is not encrypted",
        ),
        simple_control(
            "cis-unused-credentials",
            "cis",
            "1.12",
            "Unused credentials disabled",
            "IAM roles unused for 90+ days must be flagged for disablement.",
            Severity::Medium,
            vec![ResourceType::IamRole],
            |ctx| !ctx.has_tag_value("unused-90-days", "true"),
            "credential has recent activity",
            "credential unused for 90+ days",
        ),
        simple_control(
            "cis-password-policy",
            "cis",
            "1.8",
            "Password policy enforced",
            "Service accounts must enforce a password policy.",
            Severity::Medium,
            vec![ResourceType::ServiceAccount],
            |ctx| ctx.has_tag_value("password-policy", "true"),
            "a password policy is enforced",
            "no password policy is enforced",
        ),
        simple_control(
            "cis-cluster-monitoring",
            "cis",
            "3.1",
            "Cluster monitoring enabled",
            "Clusters must be monitored.",
            Severity::High,
            vec![ResourceType::Cluster],
            |ctx| ctx.has_edge(RelationshipType::Monitors),
            "a monitors edge is present",
            "no monitors edge found",
        ),
        simple_control(
            "cis-dns-query-logging",
            "cis",
            "3.4",
            "DNS query logging enabled",
            "DNS zones must log queries.",
            Severity::Low,
            vec![ResourceType::Dns],
            |ctx| ctx.has_tag_value("query-logging", "true"),
            "query logging is enabled",
            "query logging is not enabled",
        ),
        simple_control(
            "cis-certificate-expiry-monitored",
            "cis",
            "3.5",
            "Certificate expiry monitored",
            "Certificates must have expiry monitoring configured.",
            Severity::Medium,
            vec![ResourceType::Certificate],
            |ctx| ctx.has_tag_value("expiry-monitored", "true"),
            "expiry monitoring is configured",
            "expiry monitoring is not configured",
        ),
    ]
}
