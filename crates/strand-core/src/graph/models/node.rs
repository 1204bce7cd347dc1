//! Node and schema types for the discourse graph.

use serde::{Deserialize, Serialize};

/// A content-bearing vertex (claim, evidence, question, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscourseNode {
    /// Unique identity key.
    pub uid: String,
    /// Category tag taken from the title prefix, if any.
    pub node_type: Option<String>,
    /// Raw title.
    pub title: String,
    /// Title with the category prefix stripped.
    pub title_clean: String,
    /// Free text body.
    pub content: String,
    pub creator: String,
    /// ISO-8601 timestamp, kept as an opaque sortable string.
    pub created: String,
    /// ISO-8601 timestamp, kept as an opaque sortable string.
    pub modified: String,
    /// Uids cross-referenced from the content, in order. May dangle.
    pub linked_node_uids: Vec<String>,
    /// Image URLs found in the content.
    pub image_urls: Vec<String>,
    /// Link to the node in its home application.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl DiscourseNode {
    /// Whether the node carries the given category tag.
    pub fn has_type(&self, tag: &str) -> bool {
        self.node_type.as_deref() == Some(tag)
    }

    /// Compact view used in query results.
    pub fn summary(&self) -> NodeSummary {
        NodeSummary {
            uid: self.uid.clone(),
            title: self.title_clean.clone(),
            node_type: self.node_type.clone(),
            creator: self.creator.clone(),
        }
    }
}

/// Compact node view carried by search and traversal results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSummary {
    pub uid: String,
    /// Cleaned title.
    pub title: String,
    pub node_type: Option<String>,
    pub creator: String,
}

/// A category declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSchema {
    pub uid: String,
    /// Display label, e.g. "Claim".
    pub label: String,
    /// Tag derived from the schema uid; `None` when the uid does not follow
    /// the naming convention.
    pub node_type: Option<String>,
}
