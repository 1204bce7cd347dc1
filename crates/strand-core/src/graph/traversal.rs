//! Direct-neighbor and k-hop neighborhood queries.
//!
//! Two edge sources are merged: typed relationship instances and untyped
//! text cross-references. Typed edges are gathered first, so when both lead
//! to the same uid the relationship label is kept.

use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};

use crate::config::{DEFAULT_NEIGHBORHOOD_DEPTH, MAX_NEIGHBORHOOD_DEPTH, MIN_NEIGHBORHOOD_DEPTH};
use crate::graph::error::QueryError;
use crate::graph::indexer::GraphIndex;
use crate::graph::models::{Direction, Hop, HopNode, Neighbor, Neighborhood, Neighbors};

/// Parameters of a k-hop neighborhood query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeighborhoodQuery {
    pub uid: String,
    /// Clamped into `[1, 4]`.
    pub depth: usize,
    pub direction: Direction,
    /// Only nodes with this category tag are reached.
    #[serde(default)]
    pub node_type: Option<String>,
    /// Only typed edges with this label are followed; text references are
    /// ignored while it is set. Compared case-insensitively.
    #[serde(default)]
    pub relation: Option<String>,
}

impl NeighborhoodQuery {
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            depth: DEFAULT_NEIGHBORHOOD_DEPTH,
            direction: Direction::Both,
            node_type: None,
            relation: None,
        }
    }

    pub fn with_depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_type(mut self, node_type: impl Into<String>) -> Self {
        self.node_type = Some(node_type.into());
        self
    }

    pub fn with_relation(mut self, relation: impl Into<String>) -> Self {
        self.relation = Some(relation.into());
        self
    }
}

/// One edge leaving the node being expanded.
#[derive(Debug, Clone, Copy)]
struct Edge<'a> {
    uid: &'a str,
    direction: Direction,
    label: Option<&'a str>,
}

/// Read-only traversal over a [`GraphIndex`].
#[derive(Debug, Clone, Copy)]
pub struct Traversal<'a> {
    index: &'a GraphIndex,
}

impl<'a> Traversal<'a> {
    pub fn new(index: &'a GraphIndex) -> Self {
        Self { index }
    }

    /// Nodes directly connected to `uid`.
    ///
    /// For [`Direction::Both`] outgoing edges are listed before incoming ones
    /// and each uid appears once.
    pub fn direct_neighbors(&self, uid: &str, direction: Direction) -> Result<Neighbors, QueryError> {
        if !self.index.contains(uid) {
            return Err(QueryError::not_found(uid));
        }

        let neighbors = self
            .edges(uid, direction, None)
            .into_iter()
            .map(|edge| Neighbor {
                uid: edge.uid.to_string(),
                node: self.index.node(edge.uid).map(|n| n.summary()),
                direction: edge.direction,
                relation_label: edge.label.map(str::to_string),
            })
            .collect();

        Ok(Neighbors {
            uid: uid.to_string(),
            direction,
            neighbors,
        })
    }

    /// Breadth-first neighborhood of `query.uid`.
    ///
    /// Each node is reported once, at the distance it was first reached.
    /// Nodes failing the category filter are treated as absent: they are not
    /// reported, not marked visited and not expanded.
    pub fn neighborhood(&self, query: &NeighborhoodQuery) -> Result<Neighborhood, QueryError> {
        let start = query.uid.as_str();
        let Some(start_node) = self.index.node(start) else {
            return Err(QueryError::not_found(start));
        };

        let depth = query.depth.clamp(MIN_NEIGHBORHOOD_DEPTH, MAX_NEIGHBORHOOD_DEPTH);
        let node_type = non_blank(query.node_type.as_deref());
        let relation = non_blank(query.relation.as_deref());

        let mut levels: Vec<Vec<HopNode>> = vec![Vec::new(); depth + 1];
        levels[0].push(HopNode {
            uid: start.to_string(),
            node: Some(start_node.summary()),
            reached_from: None,
            relation_label: None,
        });

        let mut visited: HashSet<&str> = HashSet::new();
        visited.insert(start);
        let mut queue: VecDeque<(&str, usize)> = VecDeque::new();
        queue.push_back((start, 0));

        while let Some((current, distance)) = queue.pop_front() {
            if distance >= depth {
                continue;
            }

            for edge in self.edges(current, query.direction, relation) {
                if visited.contains(edge.uid) {
                    continue;
                }
                let node = self.index.node(edge.uid);
                if let Some(tag) = node_type {
                    if !node.is_some_and(|n| n.has_type(tag)) {
                        continue;
                    }
                }

                visited.insert(edge.uid);
                levels[distance + 1].push(HopNode {
                    uid: edge.uid.to_string(),
                    node: node.map(|n| n.summary()),
                    reached_from: Some(current.to_string()),
                    relation_label: edge.label.map(str::to_string),
                });
                queue.push_back((edge.uid, distance + 1));
            }
        }

        let hops: Vec<Hop> = levels
            .into_iter()
            .enumerate()
            .map(|(distance, nodes)| Hop {
                distance,
                count: nodes.len(),
                nodes,
            })
            .collect();
        let total = hops.iter().map(|h| h.count).sum();

        Ok(Neighborhood {
            uid: start.to_string(),
            depth,
            direction: query.direction,
            hops,
            total,
        })
    }

    /// Edges of `uid` in the requested direction(s), first-seen per uid.
    ///
    /// With a relation filter only typed edges carrying that label are kept.
    fn edges(&self, uid: &str, direction: Direction, relation: Option<&str>) -> Vec<Edge<'a>> {
        let index = self.index;
        let mut seen: HashSet<&'a str> = HashSet::new();
        let mut edges = Vec::new();

        let wanted = relation.map(str::to_lowercase);
        let label_matches =
            |label: &str| wanted.as_deref().map_or(true, |wanted| label.to_lowercase() == wanted);

        let mut push = |edge: Edge<'a>, edges: &mut Vec<Edge<'a>>| {
            if seen.insert(edge.uid) {
                edges.push(edge);
            }
        };

        if direction.includes_outgoing() {
            for rel in index.outgoing(uid).filter(|r| label_matches(r.label.as_str())) {
                push(
                    Edge {
                        uid: &rel.destination_uid,
                        direction: Direction::Outgoing,
                        label: Some(&rel.label),
                    },
                    &mut edges,
                );
            }
            if relation.is_none() {
                let linked = index.node(uid).map(|n| n.linked_node_uids.as_slice()).unwrap_or_default();
                for target in linked {
                    push(
                        Edge {
                            uid: target,
                            direction: Direction::Outgoing,
                            label: None,
                        },
                        &mut edges,
                    );
                }
            }
        }

        if direction.includes_incoming() {
            for rel in index.incoming(uid).filter(|r| label_matches(r.label.as_str())) {
                push(
                    Edge {
                        uid: &rel.source_uid,
                        direction: Direction::Incoming,
                        label: Some(&rel.label),
                    },
                    &mut edges,
                );
            }
            if relation.is_none() {
                for source in index.referenced_by(uid) {
                    push(
                        Edge {
                            uid: source,
                            direction: Direction::Incoming,
                            label: None,
                        },
                        &mut edges,
                    );
                }
            }
        }

        edges
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatasetConfig;
    use crate::graph::models::{RawEntry, RawNode};
    use crate::source::LoadedEntries;

    fn index_of(entries: Vec<RawEntry>) -> GraphIndex {
        GraphIndex::build(
            LoadedEntries {
                entries,
                ..LoadedEntries::default()
            },
            &DatasetConfig::default(),
        )
        .unwrap()
    }

    /// A -Supports-> B, B references C in text.
    fn chain() -> GraphIndex {
        index_of(vec![
            RawEntry::relation_def("sup", "Supports", "_EVD-node", "_CLM-node"),
            RawEntry::node("A", "[[EVD]] - A", ""),
            RawNode::new("B", "[[CLM]] - B", "").with_references(["C"]).into(),
            RawEntry::node("C", "[[QUE]] - C", ""),
            RawEntry::relation("sup", "A", "B"),
        ])
    }

    #[test]
    fn test_typed_label_survives_later_text_reference() {
        let index = index_of(vec![
            RawEntry::relation_def("sup", "Supports", "x", "y"),
            RawNode::new("A", "A", "").with_references(["B"]).into(),
            RawEntry::node("B", "B", ""),
            RawEntry::relation("sup", "A", "B"),
        ]);
        let result = Traversal::new(&index)
            .direct_neighbors("A", Direction::Outgoing)
            .unwrap();
        assert_eq!(result.neighbors.len(), 1);
        assert_eq!(result.neighbors[0].relation_label.as_deref(), Some("Supports"));
    }

    #[test]
    fn test_incoming_includes_text_references() {
        let index = chain();
        let result = Traversal::new(&index)
            .direct_neighbors("C", Direction::Incoming)
            .unwrap();
        assert_eq!(result.uids(), vec!["B"]);
        assert!(result.neighbors[0].relation_label.is_none());
        assert_eq!(result.neighbors[0].direction, Direction::Incoming);
    }

    #[test]
    fn test_dangling_neighbor_is_unknown_node() {
        let index = index_of(vec![
            RawEntry::node("A", "A", ""),
            RawEntry::relation("p", "A", "ghost"),
        ]);
        let result = Traversal::new(&index)
            .direct_neighbors("A", Direction::Outgoing)
            .unwrap();
        assert_eq!(result.uids(), vec!["ghost"]);
        assert!(result.neighbors[0].node.is_none());
        assert_eq!(result.neighbors[0].relation_label.as_deref(), Some("unknown"));
    }

    #[test]
    fn test_depth_is_clamped() {
        let index = chain();
        let traversal = Traversal::new(&index);
        let deep = traversal
            .neighborhood(&NeighborhoodQuery::new("A").with_depth(99))
            .unwrap();
        assert_eq!(deep.depth, MAX_NEIGHBORHOOD_DEPTH);
        assert_eq!(deep.hops.len(), MAX_NEIGHBORHOOD_DEPTH + 1);

        let shallow = traversal
            .neighborhood(&NeighborhoodQuery::new("A").with_depth(0))
            .unwrap();
        assert_eq!(shallow.depth, MIN_NEIGHBORHOOD_DEPTH);
    }

    #[test]
    fn test_relation_filter_drops_text_edges() {
        let index = chain();
        let result = Traversal::new(&index)
            .neighborhood(
                &NeighborhoodQuery::new("A")
                    .with_depth(3)
                    .with_direction(Direction::Outgoing)
                    .with_relation("supports"),
            )
            .unwrap();
        assert_eq!(result.uids_at(1), vec!["B"]);
        assert!(result.uids_at(2).is_empty());
        assert_eq!(result.total, 2);
    }

    #[test]
    fn test_category_filter_blocks_expansion() {
        let index = chain();
        // C is only reachable through B, which is a CLM.
        let result = Traversal::new(&index)
            .neighborhood(
                &NeighborhoodQuery::new("A")
                    .with_depth(2)
                    .with_direction(Direction::Outgoing)
                    .with_type("QUE"),
            )
            .unwrap();
        assert_eq!(result.total, 1);
        assert!(result.uids_at(1).is_empty());
        assert!(result.uids_at(2).is_empty());
    }

    #[test]
    fn test_first_discovery_distance_is_final() {
        // A -> B -> C and A -> C: C belongs to hop 1 only.
        let index = index_of(vec![
            RawNode::new("A", "A", "").with_references(["B", "C"]).into(),
            RawNode::new("B", "B", "").with_references(["C"]).into(),
            RawEntry::node("C", "C", ""),
        ]);
        let result = Traversal::new(&index)
            .neighborhood(
                &NeighborhoodQuery::new("A")
                    .with_depth(2)
                    .with_direction(Direction::Outgoing),
            )
            .unwrap();
        assert_eq!(result.uids_at(1), vec!["B", "C"]);
        assert!(result.uids_at(2).is_empty());
        assert_eq!(result.total, 3);
    }

    #[test]
    fn test_missing_start_is_not_found() {
        let index = chain();
        let traversal = Traversal::new(&index);
        assert_eq!(
            traversal.neighborhood(&NeighborhoodQuery::new("nope")),
            Err(QueryError::not_found("nope"))
        );
        assert!(traversal.direct_neighbors("nope", Direction::Both).is_err());
    }

    #[test]
    fn test_relation_filter_folds_unicode_case() {
        let index = index_of(vec![
            RawEntry::relation_def("st", "Étaye", "x", "y"),
            RawEntry::node("A", "A", ""),
            RawEntry::node("B", "B", ""),
            RawEntry::relation("st", "A", "B"),
        ]);
        let result = Traversal::new(&index)
            .neighborhood(
                &NeighborhoodQuery::new("A")
                    .with_depth(1)
                    .with_direction(Direction::Outgoing)
                    .with_relation("éTAYE"),
            )
            .unwrap();
        assert_eq!(result.uids_at(1), vec!["B"]);
    }

    #[test]
    fn test_self_reference_is_symmetric() {
        let index = index_of(vec![RawNode::new("a", "A", "").with_references(["a"]).into()]);
        let traversal = Traversal::new(&index);
        let outgoing = traversal.direct_neighbors("a", Direction::Outgoing).unwrap();
        let incoming = traversal.direct_neighbors("a", Direction::Incoming).unwrap();
        assert!(outgoing.neighbors.is_empty());
        assert!(incoming.neighbors.is_empty());
    }
}
