//! Relationship kinds and instances.

use serde::{Deserialize, Serialize};

/// Declares a relationship kind.
///
/// `domain_uid` and `range_uid` name the expected source and destination
/// schemas. They are advisory: instances are never checked against them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationDef {
    pub uid: String,
    /// Display label, e.g. "Supports".
    pub label: String,
    pub domain_uid: String,
    pub range_uid: String,
    /// Schema label for `domain_uid`, or the raw uid when no schema matches.
    pub domain_label: String,
    /// Schema label for `range_uid`, or the raw uid when no schema matches.
    pub range_label: String,
}

/// One typed edge between two node uids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationInstance {
    pub predicate_uid: String,
    pub source_uid: String,
    pub destination_uid: String,
    /// Label of the predicate, resolved at load time.
    pub label: String,
}
