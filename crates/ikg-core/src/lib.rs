//! Graph data model and storage contract for the infrastructure knowledge
//! graph (`spec.md` §3-4.1).
//!
//! This crate defines the node/edge/change/snapshot/sync-record types, the
//! [`Storage`] trait every other crate depends on, and an in-memory
//! [`MemoryStorage`] reference implementation used across the workspace's
//! tests.

pub mod config;
pub mod error;
pub mod filter;
pub mod model;
pub mod storage;

pub use config::EngineConfig;
pub use error::{Error, Result};
pub use filter::{NodeFilter, StatusFilter};
pub use model::{
    Change, ChangeType, DetectedVia, DiscoveredVia, Direction, Edge, EdgeInput, Node, NodeInput,
    NodeStatus, Provider, RelationshipType, ResourceType, Snapshot, SyncRecord, SyncStatus,
};
pub use storage::{MemoryStorage, NeighborResult, SnapshotQuery, Storage};
