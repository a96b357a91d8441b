//! `NodeFilter`: the filter shape recognized by every Storage query method.

use crate::model::{Node, NodeStatus, Provider, ResourceType};
use std::collections::HashMap;

/// Filter options recognized by `Storage::query_nodes` and every analysis
/// entry point that accepts an optional filter (§4.1).
#[derive(Debug, Clone, Default)]
pub struct NodeFilter {
    pub provider: Option<Provider>,
    pub account: Option<String>,
    pub region: Option<String>,
    pub resource_type: Option<ResourceType>,
    pub status: Option<StatusFilter>,
    /// AND over key=value pairs: every pair must be present in `Node::tags`.
    pub tags: HashMap<String, String>,
    pub name_contains: Option<String>,
}

/// A single status or a set of acceptable statuses.
#[derive(Debug, Clone)]
pub enum StatusFilter {
    One(NodeStatus),
    Set(Vec<NodeStatus>),
}

impl StatusFilter {
    fn matches(&self, status: NodeStatus) -> bool {
        match self {
            Self::One(s) => *s == status,
            Self::Set(set) => set.contains(&status),
        }
    }
}

impl NodeFilter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn provider(mut self, provider: Provider) -> Self {
        self.provider = Some(provider);
        self
    }

    #[must_use]
    pub fn account(mut self, account: impl Into<String>) -> Self {
        self.account = Some(account.into());
        self
    }

    #[must_use]
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    #[must_use]
    pub fn resource_type(mut self, resource_type: ResourceType) -> Self {
        self.resource_type = Some(resource_type);
        self
    }

    #[must_use]
    pub fn status(mut self, status: NodeStatus) -> Self {
        self.status = Some(StatusFilter::One(status));
        self
    }

    #[must_use]
    pub fn status_in(mut self, statuses: Vec<NodeStatus>) -> Self {
        self.status = Some(StatusFilter::Set(statuses));
        self
    }

    #[must_use]
    pub fn tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn name_contains(mut self, needle: impl Into<String>) -> Self {
        self.name_contains = Some(needle.into());
        self
    }

    /// Returns true if `node` satisfies every set criterion.
    #[must_use]
    pub fn matches(&self, node: &Node) -> bool {
        if let Some(provider) = self.provider {
            if node.provider != provider {
                return false;
            }
        }
        if let Some(account) = &self.account {
            if &node.account != account {
                return false;
            }
        }
        if let Some(region) = &self.region {
            if &node.region != region {
                return false;
            }
        }
        if let Some(resource_type) = self.resource_type {
            if node.resource_type != resource_type {
                return false;
            }
        }
        if let Some(status_filter) = &self.status {
            if !status_filter.matches(node.status) {
                return false;
            }
        }
        for (key, value) in &self.tags {
            match node.tags.get(key) {
                Some(v) if v == value => {}
                _ => return false,
            }
        }
        if let Some(needle) = &self.name_contains {
            if !node.name.contains(needle.as_str()) {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Provider, ResourceType};
    use chrono::Utc;
    use std::collections::HashMap;

    fn node(provider: Provider, status: NodeStatus, tags: &[(&str, &str)]) -> Node {
        let now = Utc::now();
        Node {
            id: "id".into(),
            provider,
            resource_type: ResourceType::Compute,
            native_id: "n".into(),
            name: "web-1".into(),
            region: "us-east-1".into(),
            account: "acct".into(),
            owner: None,
            created_at: None,
            status,
            tags: tags.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
            metadata: HashMap::new(),
            cost_monthly: None,
            discovered_at: now,
            updated_at: now,
            last_seen_at: now,
        }
    }

    #[test]
    fn tag_filter_requires_all_pairs() {
        let n = node(Provider::Aws, NodeStatus::Running, &[("env", "prod"), ("team", "core")]);
        let filter = NodeFilter::new().tag("env", "prod").tag("team", "core");
        assert!(filter.matches(&n));

        let filter = NodeFilter::new().tag("env", "staging");
        assert!(!filter.matches(&n));
    }

    #[test]
    fn status_in_matches_any_of_set() {
        let n = node(Provider::Aws, NodeStatus::Stopped, &[]);
        let filter = NodeFilter::new().status_in(vec![NodeStatus::Running, NodeStatus::Stopped]);
        assert!(filter.matches(&n));

        let filter = NodeFilter::new().status_in(vec![NodeStatus::Running]);
        assert!(!filter.matches(&n));
    }
}
