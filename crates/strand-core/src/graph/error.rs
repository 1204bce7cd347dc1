//! Discourse graph error types.

use serde::Serialize;
use thiserror::Error;

use crate::config::ConfigError;
use crate::source::LoadError;

/// Errors that abort building an index.
///
/// Per-entry anomalies (missing predicate, dangling endpoint, duplicate uid)
/// never show up here; they are resolved with fallback values while indexing.
#[derive(Debug, Error)]
pub enum GraphError {
    /// The entry source could not produce an entry list.
    #[error("Failed to load dataset: {0}")]
    Load(#[from] LoadError),

    /// A built-in convention pattern failed to compile.
    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// Configuration rejected while building.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Expected, non-fatal query outcomes that carry no result.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "error", rename_all = "snake_case")]
pub enum QueryError {
    /// The uid is not among the loaded nodes.
    #[error("Node not found: {uid}")]
    NodeNotFound { uid: String },
}

impl QueryError {
    pub fn not_found(uid: impl Into<String>) -> Self {
        QueryError::NodeNotFound { uid: uid.into() }
    }

    /// Uid the query was about.
    pub fn uid(&self) -> &str {
        match self {
            QueryError::NodeNotFound { uid } => uid,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_serializes_as_structured_result() {
        let err = QueryError::not_found("abc");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["error"], "node_not_found");
        assert_eq!(json["uid"], "abc");
        assert_eq!(err.to_string(), "Node not found: abc");
        assert_eq!(err.uid(), "abc");
    }
}
