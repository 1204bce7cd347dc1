//! Data models for the discourse graph.

mod entry;
mod node;
mod query;
mod relation;
mod stats;

pub use entry::{RawEntry, RawNode, RawRelation, RawRelationDef, RawSchema};
pub use node::{DiscourseNode, NodeSchema, NodeSummary};
pub use query::{Direction, Hop, HopNode, Neighbor, Neighborhood, Neighbors, NodeDetails, SearchHit};
pub use relation::{RelationDef, RelationInstance};
pub use stats::IndexStats;
