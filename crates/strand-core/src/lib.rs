pub mod config;
pub mod graph;
pub mod source;

pub use config::Config;
pub use graph::models::{Direction, DiscourseNode, IndexStats, Neighborhood, Neighbors, SearchHit};
pub use graph::{
    DiscourseGraph, GraphError, GraphHandle, NeighborhoodQuery, QueryError, SearchQuery,
};
pub use source::{EntrySource, FileSource, LoadError, MemorySource};
