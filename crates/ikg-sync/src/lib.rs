//! Adapter-driven sync and drift reconciliation (`spec.md` §4.2): the
//! `Adapter` contract, an `AdapterRegistry`, and the `SyncEngine` that
//! drives one provider's reconciliation cycle or a read-only drift scan.

pub mod adapter;
pub mod changes;
pub mod diff;
pub mod drift;
pub mod engine;
pub mod error;
pub mod registry;

pub use adapter::{Adapter, DiscoverOptions, DiscoverResult, ResourceError};
pub use diff::{diff_node, FieldDiff};
pub use drift::{drift_scan, DriftScanResult, DriftedNode};
pub use engine::{sync_provider, SyncEngine};
pub use error::{Error, Result};
pub use registry::AdapterRegistry;
