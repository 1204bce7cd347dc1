//! Raw entries as they arrive from an entry source.

use serde::{Deserialize, Serialize};

/// One raw record, discriminated by its `type` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RawEntry {
    /// A content-bearing node.
    Node(RawNode),
    /// A category declaration.
    Schema(RawSchema),
    /// A relationship kind declaration.
    RelationDef(RawRelationDef),
    /// One typed edge.
    Relation(RawRelation),
}

/// Raw node record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawNode {
    pub uid: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub creator: String,
    #[serde(default)]
    pub created: String,
    #[serde(default)]
    pub modified: String,
    /// Explicit cross-reference list; text is never re-parsed for links.
    #[serde(default)]
    pub references: Vec<String>,
}

/// Raw schema record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSchema {
    pub uid: String,
    pub label: String,
}

/// Raw relationship definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRelationDef {
    pub uid: String,
    pub label: String,
    pub domain: String,
    pub range: String,
}

/// Raw relationship instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRelation {
    pub predicate: String,
    pub source: String,
    pub destination: String,
}

impl RawEntry {
    /// Build a node entry; handy for fixtures.
    pub fn node(uid: impl Into<String>, title: impl Into<String>, content: impl Into<String>) -> Self {
        RawEntry::Node(RawNode::new(uid, title, content))
    }

    /// Build a schema entry.
    pub fn schema(uid: impl Into<String>, label: impl Into<String>) -> Self {
        RawEntry::Schema(RawSchema {
            uid: uid.into(),
            label: label.into(),
        })
    }

    /// Build a relationship definition entry.
    pub fn relation_def(
        uid: impl Into<String>,
        label: impl Into<String>,
        domain: impl Into<String>,
        range: impl Into<String>,
    ) -> Self {
        RawEntry::RelationDef(RawRelationDef {
            uid: uid.into(),
            label: label.into(),
            domain: domain.into(),
            range: range.into(),
        })
    }

    /// Build a relationship instance entry.
    pub fn relation(
        predicate: impl Into<String>,
        source: impl Into<String>,
        destination: impl Into<String>,
    ) -> Self {
        RawEntry::Relation(RawRelation {
            predicate: predicate.into(),
            source: source.into(),
            destination: destination.into(),
        })
    }
}

impl RawNode {
    /// Create a node record with empty attribution and no references.
    pub fn new(uid: impl Into<String>, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            title: title.into(),
            content: content.into(),
            creator: String::new(),
            created: String::new(),
            modified: String::new(),
            references: Vec::new(),
        }
    }

    /// Set the creator.
    pub fn with_creator(mut self, creator: impl Into<String>) -> Self {
        self.creator = creator.into();
        self
    }

    /// Set the explicit cross-reference list.
    pub fn with_references<I, S>(mut self, references: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.references = references.into_iter().map(Into::into).collect();
        self
    }

    /// Set both timestamps.
    pub fn with_timestamps(mut self, created: impl Into<String>, modified: impl Into<String>) -> Self {
        self.created = created.into();
        self.modified = modified.into();
        self
    }
}

impl From<RawNode> for RawEntry {
    fn from(node: RawNode) -> Self {
        RawEntry::Node(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_discriminant() {
        let json = r#"{"type": "relation_def", "uid": "r1", "label": "Supports", "domain": "_EVD-node", "range": "_CLM-node"}"#;
        let entry: RawEntry = serde_json::from_str(json).unwrap();
        assert_eq!(
            entry,
            RawEntry::relation_def("r1", "Supports", "_EVD-node", "_CLM-node")
        );
    }

    #[test]
    fn test_node_defaults() {
        let json = r#"{"type": "node", "uid": "n1", "title": "Plain"}"#;
        let entry: RawEntry = serde_json::from_str(json).unwrap();
        match entry {
            RawEntry::Node(node) => {
                assert!(node.content.is_empty());
                assert!(node.references.is_empty());
            }
            other => panic!("expected node, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_discriminant_is_rejected() {
        let json = r#"{"type": "page", "uid": "p1"}"#;
        assert!(serde_json::from_str::<RawEntry>(json).is_err());
    }
}
