//! The adapter contract external collaborators implement (`spec.md` §6).

use async_trait::async_trait;
use ikg_core::{EdgeInput, NodeInput, Provider, ResourceType};

/// A single resource-level discovery failure. Collected into the sync
/// record rather than aborting the cycle.
#[derive(Debug, Clone)]
pub struct ResourceError {
    pub resource_type: Option<ResourceType>,
    pub region: Option<String>,
    pub message: String,
}

/// Adapter-specific discovery scoping. Left opaque here; concrete adapters
/// define their own option shape and adapt it to this one, or ignore it.
#[derive(Debug, Clone, Default)]
pub struct DiscoverOptions {
    pub region: Option<String>,
    pub account: Option<String>,
}

/// What one `discover` call returns: everything the adapter found, plus any
/// per-resource errors it recorded along the way.
#[derive(Debug, Clone, Default)]
pub struct DiscoverResult {
    pub nodes: Vec<NodeInput>,
    pub edges: Vec<EdgeInput>,
    pub errors: Vec<ResourceError>,
}

/// A pluggable discovery backend for one provider. Implementations perform
/// whatever I/O is necessary (API calls, config scans, runtime tracing) and
/// return the discovered topology; the engine owns reconciliation.
///
/// An `Err` from `discover` is treated as an adapter exception: it aborts
/// the sync cycle. Failures scoped to a single resource belong in
/// `DiscoverResult::errors` instead, so the cycle can continue.
#[async_trait]
pub trait Adapter: Send + Sync {
    fn provider(&self) -> Provider;

    async fn health_check(&self) -> bool;

    async fn discover(&self, options: Option<&DiscoverOptions>) -> Result<DiscoverResult, String>;
}
