//! Infrastructure-as-code patch generation from drift scan results
//! (`spec.md` §4.6): Terraform/OpenTofu, Pulumi, and CloudFormation
//! patches with injection-safe value formatting and dependency-aware
//! ordering.

pub mod cloudformation;
pub mod dialect;
pub mod escape;
pub mod fields;
pub mod naming;
pub mod plan;
pub mod pulumi;
pub mod terraform;
pub mod topo;

pub use dialect::Dialect;
pub use fields::{assess_risk, drifted_fields_from_changes, is_security_related, is_sensitive_field, DriftedField, RiskLevel};
pub use plan::{DependencyWarning, Patch, RemediationGenerator, RemediationOptions, RemediationPlan, UnremediableNode};
