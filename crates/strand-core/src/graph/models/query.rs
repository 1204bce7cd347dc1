//! Result shapes returned by search and traversal queries.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::node::NodeSummary;
use super::relation::RelationInstance;
use super::DiscourseNode;

/// A ranked search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub node: NodeSummary,
    /// Cosmetic excerpt of the content.
    pub snippet: String,
    /// BM25 score, rounded for display.
    pub score: f64,
}

/// Edge direction relative to the queried node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Outgoing,
    Incoming,
    #[default]
    Both,
}

impl Direction {
    /// Whether outgoing edges are followed.
    pub fn includes_outgoing(self) -> bool {
        matches!(self, Direction::Outgoing | Direction::Both)
    }

    /// Whether incoming edges are followed.
    pub fn includes_incoming(self) -> bool {
        matches!(self, Direction::Incoming | Direction::Both)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Outgoing => "outgoing",
            Direction::Incoming => "incoming",
            Direction::Both => "both",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "outgoing" | "out" => Ok(Direction::Outgoing),
            "incoming" | "in" => Ok(Direction::Incoming),
            "both" | "all" => Ok(Direction::Both),
            other => Err(format!(
                "unknown direction '{}', expected outgoing, incoming or both",
                other
            )),
        }
    }
}

/// A directly connected node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
    pub uid: String,
    /// `None` when the uid is not among the loaded nodes.
    pub node: Option<NodeSummary>,
    /// Either `Outgoing` or `Incoming`, never `Both`.
    pub direction: Direction,
    /// Label of the typed relationship; absent for text cross-references.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relation_label: Option<String>,
}

/// Result of a direct-neighbor query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Neighbors {
    pub uid: String,
    pub direction: Direction,
    pub neighbors: Vec<Neighbor>,
}

impl Neighbors {
    /// Uids of all neighbors, in result order.
    pub fn uids(&self) -> Vec<&str> {
        self.neighbors.iter().map(|n| n.uid.as_str()).collect()
    }
}

/// A node reached during neighborhood traversal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HopNode {
    pub uid: String,
    pub node: Option<NodeSummary>,
    /// Uid of the node this one was first reached from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reached_from: Option<String>,
    /// Relationship label used to reach it; absent for text references.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relation_label: Option<String>,
}

/// All nodes first reached at one hop distance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hop {
    pub distance: usize,
    pub count: usize,
    pub nodes: Vec<HopNode>,
}

/// Result of a k-hop neighborhood query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Neighborhood {
    pub uid: String,
    /// Effective depth after clamping.
    pub depth: usize,
    pub direction: Direction,
    /// One entry per distance `0..=depth`, including empty ones.
    pub hops: Vec<Hop>,
    /// Nodes across all hops, the start node included.
    pub total: usize,
}

impl Neighborhood {
    /// Uids at a given distance.
    pub fn uids_at(&self, distance: usize) -> Vec<&str> {
        self.hops
            .get(distance)
            .map(|hop| hop.nodes.iter().map(|n| n.uid.as_str()).collect())
            .unwrap_or_default()
    }
}

/// A node with its typed relationships.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDetails {
    pub node: DiscourseNode,
    /// Relations whose source is this node.
    pub outgoing: Vec<RelationInstance>,
    /// Relations whose destination is this node.
    pub incoming: Vec<RelationInstance>,
    /// Uids of nodes whose cross-reference list names this node.
    pub referenced_by: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_parse() {
        assert_eq!("outgoing".parse::<Direction>().unwrap(), Direction::Outgoing);
        assert_eq!("IN".parse::<Direction>().unwrap(), Direction::Incoming);
        assert_eq!("both".parse::<Direction>().unwrap(), Direction::Both);
        assert!("sideways".parse::<Direction>().is_err());
    }

    #[test]
    fn test_direction_serde() {
        let json = serde_json::to_string(&Direction::Incoming).unwrap();
        assert_eq!(json, "\"incoming\"");
    }
}
