//! Graph traversal and analysis over the infrastructure knowledge graph:
//! blast radius, dependency chains, shortest paths, orphan/critical-node/
//! cluster/SPOF analysis, and topology export (`spec.md` §4.3, §6).

pub mod blast_radius;
pub mod clusters;
pub mod critical_nodes;
pub mod dependency_chain;
pub mod error;
pub mod export;
pub mod orphans;
pub mod shortest_path;
pub mod spof;
pub mod subgraph;
pub mod traversal;

pub use blast_radius::{get_blast_radius, BlastRadiusResult};
pub use clusters::{find_clusters, ClusterResult};
pub use critical_nodes::{find_critical_nodes, CriticalNode};
pub use dependency_chain::{get_dependency_chain, DependencyChainResult};
pub use error::{Error, Result};
pub use export::{export_topology, ExportFormat, ExportOptions};
pub use orphans::find_orphans;
pub use shortest_path::{shortest_path, ShortestPathResult};
pub use spof::find_spofs;
pub use subgraph::{adjacency, induced_subgraph, FilteredSubgraph};
pub use traversal::{bounded_bfs, HopResult};
