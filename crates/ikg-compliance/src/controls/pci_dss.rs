//! PCI-DSS control pack (4 controls).

use std::sync::Arc;

use ikg_core::ResourceType;

use crate::control::{simple_control, Control, Severity};

#[must_use]
pub fn controls() -> Vec<Arc<dyn Control>> {
    vec![
        simple_control(
            "pci-cardholder-data-segmented",
            "pci-dss",
            "1.3",
            "Cardholder data environment segmented",
            "Network boundaries in PCI scope must be explicitly segmented.",
            Severity::Critical,
            vec![ResourceType::Vpc, ResourceType::Subnet],
            |ctx| !ctx.has_tag_value("pci-scope", "true") || ctx.has_tag_value("segmented", "true"),
            "in-scope network is segmented, or is out of PCI scope",
            "in-scope network is not segmented",
        ),
        simple_control(
            "pci-firewall-configured",
            "pci-dss",
            "1.1",
            "Firewall default-deny configured",
            "Security groups and firewalls must default to deny.",
            Severity::High,
            vec![ResourceType::SecurityGroup, ResourceType::Firewall],
            |ctx| ctx.has_tag_value("default-deny", "true"),
            "default-deny is configured",
            "default-deny is not configured",
        ),
        simple_control(
            "pci-encryption-in-transit",
            "pci-dss",
            "4.1",
            "Encryption in transit",
            "Public-facing endpoints must terminate TLS.",
            Severity::High,
            vec![ResourceType::LoadBalancer, ResourceType::ApiGateway],
            |ctx| ctx.has_tag_value("tls-enabled", "true"),
            "TLS is enabled",
            "TLS is not enabled",
        ),
        simple_control(
            "pci-vulnerability-scanning",
            "pci-dss",
            "11.2",
            "Vulnerability scanning",
            "Compute resources must undergo periodic vulnerability scanning.",
            Severity::Medium,
            vec![ResourceType::Compute, ResourceType::Container],
            |ctx| ctx.has_tag_value("vuln-scan", "true"),
            "vulnerability scanning is configured",
            "vulnerability scanning is not configured",
        ),
    ]
}
