//! Load statistics.

use serde::{Deserialize, Serialize};

/// Statistics about a loaded index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexStats {
    /// Distinct node uids.
    pub nodes: usize,
    pub schemas: usize,
    pub relation_defs: usize,
    pub relations: usize,
    /// Distinct creator names.
    pub creators: usize,
    /// Node entries that replaced an earlier entry with the same uid.
    pub duplicate_nodes: usize,
    /// Relation-def entries ignored because their uid was already registered.
    pub duplicate_relation_defs: usize,
    /// Relations whose predicate is not declared.
    pub unresolved_predicates: usize,
    /// Relations with at least one endpoint outside the loaded nodes.
    pub dangling_relations: usize,
    /// Nodes whose title tag no declared schema covers; their type is dropped.
    pub undeclared_types: usize,
    /// Entries the source could not decode.
    pub skipped_entries: usize,
    /// SHA-256 of the source bytes, when the source has any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
    /// When this index was built.
    pub loaded_at: Option<chrono::DateTime<chrono::Utc>>,
}
