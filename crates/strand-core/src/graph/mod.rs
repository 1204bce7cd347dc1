//! In-memory discourse graph.
//!
//! [`DiscourseGraph`] is one immutable snapshot of a dataset: the
//! cross-referenced [`GraphIndex`], the relevance index built from it, and
//! the settings both were built with. Every query is a pure read, so a
//! snapshot can be shared freely between threads. [`GraphHandle`] swaps
//! snapshots on reload.

pub mod error;
pub mod handle;
pub mod indexer;
pub mod models;
pub mod search;
pub mod traversal;

pub use error::{GraphError, QueryError};
pub use handle::GraphHandle;
pub use indexer::GraphIndex;
pub use search::{Bm25Index, SearchEngine, SearchQuery};
pub use traversal::{NeighborhoodQuery, Traversal};

use tracing::{debug, info};

use crate::config::Config;
use crate::source::{EntrySource, LoadedEntries};
use models::{
    DiscourseNode, Direction, IndexStats, Neighborhood, Neighbors, NodeDetails, NodeSchema,
    RelationDef, SearchHit,
};

/// One loaded dataset, ready to query.
#[derive(Debug)]
pub struct DiscourseGraph {
    index: GraphIndex,
    search: SearchEngine,
    config: Config,
}

impl DiscourseGraph {
    /// Index a loaded entry list and build the relevance index eagerly.
    pub fn build(loaded: LoadedEntries, config: &Config) -> Result<Self, GraphError> {
        config.validate()?;

        let index = GraphIndex::build(loaded, &config.dataset)?;
        let search = SearchEngine::build(&index, &config.search)?;

        let stats = index.stats();
        debug!(
            duplicate_nodes = stats.duplicate_nodes,
            duplicate_relation_defs = stats.duplicate_relation_defs,
            unresolved_predicates = stats.unresolved_predicates,
            dangling_relations = stats.dangling_relations,
            undeclared_types = stats.undeclared_types,
            skipped_entries = stats.skipped_entries,
            "Index anomalies"
        );

        Ok(Self {
            index,
            search,
            config: config.clone(),
        })
    }

    /// Load entries from `source` and build a graph from them.
    pub fn load(source: &dyn EntrySource, config: &Config) -> Result<Self, GraphError> {
        let loaded = source.load()?;
        let graph = Self::build(loaded, config)?;
        info!(
            source = %source.describe(),
            nodes = graph.index.node_count(),
            relations = graph.index.relations().len(),
            "Loaded discourse graph"
        );
        Ok(graph)
    }

    /// Ranked full-text search.
    pub fn search(&self, query: &SearchQuery) -> Vec<SearchHit> {
        let hits = self.search.search(&self.index, query);
        debug!(query = %query.text, hits = hits.len(), "Search");
        hits
    }

    /// Nodes directly connected to `uid`.
    pub fn direct_neighbors(&self, uid: &str, direction: Direction) -> Result<Neighbors, QueryError> {
        Traversal::new(&self.index).direct_neighbors(uid, direction)
    }

    /// Breadth-first neighborhood around a node.
    pub fn neighborhood(&self, query: &NeighborhoodQuery) -> Result<Neighborhood, QueryError> {
        let result = Traversal::new(&self.index).neighborhood(query)?;
        debug!(uid = %query.uid, depth = result.depth, total = result.total, "Neighborhood");
        Ok(result)
    }

    /// Neighborhood query preset with the configured default depth.
    pub fn neighborhood_query(&self, uid: impl Into<String>) -> NeighborhoodQuery {
        NeighborhoodQuery::new(uid).with_depth(self.config.traversal.default_depth)
    }

    pub fn node(&self, uid: &str) -> Result<&DiscourseNode, QueryError> {
        self.index.node(uid).ok_or_else(|| QueryError::not_found(uid))
    }

    /// A node together with its typed relations and text back-references.
    pub fn node_details(&self, uid: &str) -> Result<NodeDetails, QueryError> {
        let node = self.node(uid)?;
        Ok(NodeDetails {
            node: node.clone(),
            outgoing: self.index.outgoing(uid).cloned().collect(),
            incoming: self.index.incoming(uid).cloned().collect(),
            referenced_by: self.index.referenced_by(uid).to_vec(),
        })
    }

    pub fn schemas(&self) -> Vec<&NodeSchema> {
        self.index.schemas()
    }

    pub fn relation_defs(&self) -> Vec<&RelationDef> {
        self.index.relation_defs()
    }

    /// Sorted distinct creator names.
    pub fn creators(&self) -> &[String] {
        self.index.creators()
    }

    pub fn nodes_by_creator(&self, creator: &str) -> Vec<&DiscourseNode> {
        self.index.nodes_by_creator(creator)
    }

    pub fn stats(&self) -> &IndexStats {
        self.index.stats()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::models::{RawEntry, RawNode};
    use crate::source::MemorySource;

    fn sample() -> DiscourseGraph {
        let source = MemorySource::new(vec![
            RawEntry::schema("_CLM-node", "Claim"),
            RawEntry::schema("_EVD-node", "Evidence"),
            RawEntry::relation_def("sup", "Supports", "_EVD-node", "_CLM-node"),
            RawNode::new("e1", "[[EVD]] - Soil samples", "Nitrogen levels rose")
                .with_creator("Ada")
                .with_references(["c1"])
                .into(),
            RawNode::new("c1", "[[CLM]] - Nitrogen drives growth", "")
                .with_creator("Grace")
                .with_timestamps("2024-03-01T10:00:00Z", "2024-03-02T08:30:00Z")
                .into(),
            RawEntry::relation("sup", "e1", "c1"),
        ]);
        DiscourseGraph::load(&source, &Config::default()).unwrap()
    }

    #[test]
    fn test_graph_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DiscourseGraph>();
        assert_send_sync::<GraphHandle>();
    }

    #[test]
    fn test_node_details() {
        let graph = sample();
        let details = graph.node_details("c1").unwrap();
        assert_eq!(details.incoming.len(), 1);
        assert_eq!(details.incoming[0].label, "Supports");
        assert!(details.outgoing.is_empty());
        assert_eq!(details.referenced_by, vec!["e1".to_string()]);
        assert_eq!(details.node.created, "2024-03-01T10:00:00Z");
        assert_eq!(details.node.modified, "2024-03-02T08:30:00Z");
    }

    #[test]
    fn test_node_not_found() {
        let graph = sample();
        assert_eq!(graph.node("zzz"), Err(QueryError::not_found("zzz")));
        assert!(graph.node_details("zzz").is_err());
    }

    #[test]
    fn test_neighborhood_query_uses_configured_depth() {
        let graph = sample();
        let query = graph.neighborhood_query("e1");
        assert_eq!(query.depth, graph.config().traversal.default_depth);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = Config::default();
        config.search.k1 = 0.0;
        let result = DiscourseGraph::build(LoadedEntries::default(), &config);
        assert!(matches!(result, Err(GraphError::Config(_))));
    }
}
