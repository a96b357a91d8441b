//! Target IaC dialects and the static provider-support matrix (`spec.md`
//! §4.6 step 2: "CloudFormation supports AWS only").

use ikg_core::Provider;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    Terraform,
    CloudFormation,
    Pulumi,
    OpenTofu,
}

impl Dialect {
    /// Terraform and OpenTofu share HCL output and the import-block
    /// feature; callers branch on this rather than duplicating dialect
    /// matches everywhere.
    #[must_use]
    pub fn is_hcl(self) -> bool {
        matches!(self, Self::Terraform | Self::OpenTofu)
    }

    #[must_use]
    pub fn supports(self, provider: Provider) -> bool {
        match self {
            Self::CloudFormation => provider == Provider::Aws,
            Self::Terraform | Self::Pulumi | Self::OpenTofu => true,
        }
    }
}
