//! Atomic dataset reload.

use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{info, warn};

use super::error::GraphError;
use super::DiscourseGraph;
use crate::config::Config;
use crate::source::EntrySource;

/// Shared pointer to the current graph snapshot.
///
/// Readers take an [`Arc`] snapshot and query it without holding the lock,
/// so a reload never blocks or disturbs in-flight queries.
#[derive(Debug)]
pub struct GraphHandle {
    current: RwLock<Arc<DiscourseGraph>>,
}

impl GraphHandle {
    pub fn new(graph: DiscourseGraph) -> Self {
        Self {
            current: RwLock::new(Arc::new(graph)),
        }
    }

    /// Load the first snapshot from a source.
    pub fn open(source: &dyn EntrySource, config: &Config) -> Result<Self, GraphError> {
        Ok(Self::new(DiscourseGraph::load(source, config)?))
    }

    /// Snapshot of the graph currently in service.
    pub fn current(&self) -> Arc<DiscourseGraph> {
        Arc::clone(&self.current.read())
    }

    /// Build a fresh graph from `source` and swap it in.
    ///
    /// The new graph reuses the settings of the current one. On failure the
    /// current graph stays in place.
    pub fn reload(&self, source: &dyn EntrySource) -> Result<Arc<DiscourseGraph>, GraphError> {
        let config = self.current().config().clone();
        self.reload_with(source, &config)
    }

    /// Like [`reload`](Self::reload), with new settings.
    pub fn reload_with(
        &self,
        source: &dyn EntrySource,
        config: &Config,
    ) -> Result<Arc<DiscourseGraph>, GraphError> {
        let graph = match DiscourseGraph::load(source, config) {
            Ok(graph) => Arc::new(graph),
            Err(err) => {
                warn!(source = %source.describe(), error = %err, "Reload failed, keeping current graph");
                return Err(err);
            }
        };

        *self.current.write() = Arc::clone(&graph);
        info!(
            source = %source.describe(),
            nodes = graph.stats().nodes,
            relations = graph.stats().relations,
            "Graph reloaded"
        );
        Ok(graph)
    }
}
