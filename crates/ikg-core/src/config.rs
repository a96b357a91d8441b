//! Engine-wide configuration recognized by the sync and graph engines (§6).

/// Settings shared by the sync engine and the traversal algorithms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// Hard cap on traversal depth for blast radius / dependency chain / BFS.
    pub max_traversal_depth: u32,
    /// How long a node may go unseen before it is eligible to be marked
    /// `disappeared`, and how long an edge may go unseen before pruning.
    pub stale_threshold_ms: i64,
    /// Whether the sync engine marks stale nodes as disappeared.
    pub enable_drift_detection: bool,
    /// Whether the sync engine prunes edges whose endpoints are both stale.
    pub prune_orphaned_edges: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_traversal_depth: 8,
            stale_threshold_ms: 86_400_000,
            enable_drift_detection: true,
            prune_orphaned_edges: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.max_traversal_depth, 8);
        assert_eq!(cfg.stale_threshold_ms, 86_400_000);
        assert!(cfg.enable_drift_detection);
        assert!(cfg.prune_orphaned_edges);
    }
}
