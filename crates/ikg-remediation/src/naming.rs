//! Dialect-specific resource-type and identifier naming.

use ikg_core::{Provider, ResourceType};

/// Terraform/OpenTofu resource type for a handful of common
/// `(provider, resourceType)` pairs; falls back to a generic
/// `<provider>_<resource_type>` form for everything else, since this
/// core does not ship a full provider schema.
#[must_use]
pub fn tf_resource_type(provider: Provider, resource_type: ResourceType) -> String {
    use Provider::{Aws, Azure, Gcp};
    use ResourceType::{Bucket, Compute, Database, Function, IamRole, LoadBalancer, SecurityGroup, Vpc};

    match (provider, resource_type) {
        (Aws, Compute) => "aws_instance".to_string(),
        (Aws, Database) => "aws_db_instance".to_string(),
        (Aws, Bucket) => "aws_s3_bucket".to_string(),
        (Aws, Vpc) => "aws_vpc".to_string(),
        (Aws, SecurityGroup) => "aws_security_group".to_string(),
        (Aws, LoadBalancer) => "aws_lb".to_string(),
        (Aws, Function) => "aws_lambda_function".to_string(),
        (Aws, IamRole) => "aws_iam_role".to_string(),
        (Gcp, Compute) => "google_compute_instance".to_string(),
        (Gcp, Database) => "google_sql_database_instance".to_string(),
        (Gcp, Bucket) => "google_storage_bucket".to_string(),
        (Azure, Compute) => "azurerm_linux_virtual_machine".to_string(),
        (Azure, Database) => "azurerm_mssql_database".to_string(),
        (Azure, Bucket) => "azurerm_storage_account".to_string(),
        _ => format!("{}_{}", provider_slug(provider), resource_type_slug(resource_type)),
    }
}

/// Pulumi's TypeScript SDK resource type, e.g. `aws.ec2.Instance`.
#[must_use]
pub fn pulumi_resource_type(provider: Provider, resource_type: ResourceType) -> String {
    format!("{}.{}", provider_slug(provider), pascal_case(&resource_type_slug(resource_type)))
}

/// CloudFormation resource type. AWS-only per the dialect support matrix.
#[must_use]
pub fn cloudformation_resource_type(resource_type: ResourceType) -> String {
    use ResourceType::{Bucket, Compute, Database, Function, IamRole, LoadBalancer, SecurityGroup, Vpc};

    match resource_type {
        Compute => "AWS::EC2::Instance".to_string(),
        Database => "AWS::RDS::DBInstance".to_string(),
        Bucket => "AWS::S3::Bucket".to_string(),
        Vpc => "AWS::EC2::VPC".to_string(),
        SecurityGroup => "AWS::EC2::SecurityGroup".to_string(),
        LoadBalancer => "AWS::ElasticLoadBalancingV2::LoadBalancer".to_string(),
        Function => "AWS::Lambda::Function".to_string(),
        IamRole => "AWS::IAM::Role".to_string(),
        other => format!("AWS::Custom::{}", pascal_case(&resource_type_slug(other))),
    }
}

fn provider_slug(provider: Provider) -> String {
    serde_json::to_value(provider).ok().and_then(|v| v.as_str().map(str::to_string)).unwrap_or_default()
}

fn resource_type_slug(resource_type: ResourceType) -> String {
    serde_json::to_value(resource_type)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default()
        .replace('-', "_")
}

#[must_use]
pub fn pascal_case(snake_or_kebab: &str) -> String {
    snake_or_kebab
        .split(|c| c == '_' || c == '-')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            chars.next().map_or_else(String::new, |first| first.to_uppercase().collect::<String>() + chars.as_str())
        })
        .collect()
}

#[must_use]
pub fn camel_case(snake_or_kebab: &str) -> String {
    let pascal = pascal_case(snake_or_kebab);
    let mut chars = pascal.chars();
    chars.next().map_or_else(String::new, |first| first.to_lowercase().collect::<String>() + chars.as_str())
}

/// A valid identifier for use as a Terraform resource name or Pulumi
/// variable name: lowercase alphanumerics and underscores only.
#[must_use]
pub fn sanitize_identifier(name: &str) -> String {
    let mut out: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect();
    if out.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    if out.is_empty() {
        out.push('_');
    }
    out
}
