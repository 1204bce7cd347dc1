//! Request and response types for the JSON API.
//!
//! Query-string parameters are deserialized with every field optional so a
//! bare request falls back to the configured defaults.

use serde::{Deserialize, Serialize};

use strand_core::graph::models::{NodeSchema, RelationDef};
use strand_core::Direction;

// =============================================================================
// Query Parameters
// =============================================================================

/// Query for `/api/search`.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    /// Free-text query.
    #[serde(default)]
    pub q: String,
    /// Category tag filter, e.g. `CLM`.
    #[serde(rename = "type")]
    pub node_type: Option<String>,
    /// Case-insensitive creator substring.
    pub creator: Option<String>,
    pub limit: Option<usize>,
}

/// Query for `/api/nodes/{uid}/neighbors`.
#[derive(Debug, Deserialize)]
pub struct NeighborsParams {
    #[serde(default)]
    pub direction: Direction,
}

/// Query for `/api/nodes/{uid}/neighborhood`.
#[derive(Debug, Deserialize)]
pub struct NeighborhoodParams {
    pub depth: Option<usize>,
    #[serde(default)]
    pub direction: Direction,
    #[serde(rename = "type")]
    pub node_type: Option<String>,
    /// Relationship label filter.
    pub relation: Option<String>,
}

// =============================================================================
// Responses
// =============================================================================

/// Response for `/api/schemas`.
#[derive(Debug, Serialize)]
pub struct SchemasResponse {
    pub schemas: Vec<NodeSchema>,
    pub relation_defs: Vec<RelationDef>,
}

/// One entry of `/api/creators`.
#[derive(Debug, Serialize)]
pub struct CreatorSummary {
    pub name: String,
    /// Number of nodes attributed to this creator.
    pub nodes: usize,
}

/// Body of non-query failures such as a rejected reload.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}
