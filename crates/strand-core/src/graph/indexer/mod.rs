//! Two-pass graph indexer.
//!
//! Pass 1 registers schemas and relationship definitions, then resolves the
//! definitions' domain/range labels. Pass 2 parses nodes and relationship
//! instances, resolving each instance's label from its definition. Every
//! lookup structure is built here; the result is never mutated afterwards.

mod conventions;

pub use conventions::Conventions;

use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use crate::config::{DatasetConfig, UNKNOWN_RELATION_LABEL};
use crate::graph::error::GraphError;
use crate::graph::models::{
    DiscourseNode, IndexStats, NodeSchema, RawEntry, RelationDef, RelationInstance,
};
use crate::source::LoadedEntries;

/// Immutable, cross-referenced view of one dataset snapshot.
#[derive(Debug, Clone, Default)]
pub struct GraphIndex {
    nodes: HashMap<String, DiscourseNode>,
    /// Distinct uids in order of first appearance.
    node_order: Vec<String>,
    /// Creator name to node uids, in node order.
    by_creator: HashMap<String, Vec<String>>,
    creators: Vec<String>,

    schemas: HashMap<String, NodeSchema>,
    schema_order: Vec<String>,
    relation_defs: HashMap<String, RelationDef>,
    relation_def_order: Vec<String>,

    relations: Vec<RelationInstance>,
    /// Source uid to positions in `relations`.
    by_source: HashMap<String, Vec<usize>>,
    /// Destination uid to positions in `relations`.
    by_destination: HashMap<String, Vec<usize>>,
    /// Target uid to the uids of nodes whose cross-reference list names it.
    referenced_by: HashMap<String, Vec<String>>,

    stats: IndexStats,
}

impl GraphIndex {
    /// Build an index from a full entry list.
    pub fn build(loaded: LoadedEntries, dataset: &DatasetConfig) -> Result<Self, GraphError> {
        let conventions = Conventions::new()?;
        let mut index = GraphIndex::default();
        let mut stats = IndexStats {
            skipped_entries: loaded.skipped,
            fingerprint: loaded.fingerprint,
            ..IndexStats::default()
        };

        // Pass 1: schemas and relationship definitions.
        let mut raw_defs = Vec::new();
        for entry in &loaded.entries {
            match entry {
                RawEntry::Schema(raw) => {
                    let schema = conventions.parse_schema(raw);
                    if index.schemas.insert(schema.uid.clone(), schema).is_none() {
                        index.schema_order.push(raw.uid.clone());
                    }
                }
                RawEntry::RelationDef(raw) => {
                    if index.relation_defs.contains_key(&raw.uid) {
                        debug!(uid = %raw.uid, "Ignoring duplicate relation definition");
                        stats.duplicate_relation_defs += 1;
                        continue;
                    }
                    // Labels are filled in once every schema is known.
                    index.relation_defs.insert(
                        raw.uid.clone(),
                        RelationDef {
                            uid: raw.uid.clone(),
                            label: raw.label.clone(),
                            domain_uid: raw.domain.clone(),
                            range_uid: raw.range.clone(),
                            domain_label: String::new(),
                            range_label: String::new(),
                        },
                    );
                    raw_defs.push(raw.uid.clone());
                }
                RawEntry::Node(_) | RawEntry::Relation(_) => {}
            }
        }
        index.relation_def_order = raw_defs;

        for def in index.relation_defs.values_mut() {
            def.domain_label = schema_label(&index.schemas, &def.domain_uid);
            def.range_label = schema_label(&index.schemas, &def.range_uid);
        }

        // Pass 2: nodes and relationship instances.
        // Tags are checked only when the dataset declares tagged schemas.
        let declared: BTreeSet<String> = index
            .declared_types()
            .into_iter()
            .map(str::to_string)
            .collect();
        let base_url = dataset.base_url.as_deref();
        for entry in loaded.entries {
            match entry {
                RawEntry::Node(raw) => {
                    let mut node = conventions.parse_node(raw, base_url);
                    let undeclared = !declared.is_empty()
                        && node
                            .node_type
                            .as_deref()
                            .is_some_and(|tag| !declared.contains(tag));
                    if undeclared {
                        debug!(uid = %node.uid, tag = ?node.node_type, "Undeclared category tag");
                        node.node_type = None;
                        stats.undeclared_types += 1;
                    }
                    let uid = node.uid.clone();
                    if index.nodes.insert(uid.clone(), node).is_some() {
                        debug!(uid = %uid, "Duplicate node uid, keeping the later entry");
                        stats.duplicate_nodes += 1;
                    } else {
                        index.node_order.push(uid);
                    }
                }
                RawEntry::Relation(raw) => {
                    let label = match index.relation_defs.get(&raw.predicate) {
                        Some(def) => def.label.clone(),
                        None => {
                            debug!(predicate = %raw.predicate, "Relation with undeclared predicate");
                            stats.unresolved_predicates += 1;
                            UNKNOWN_RELATION_LABEL.to_string()
                        }
                    };
                    let position = index.relations.len();
                    index
                        .by_source
                        .entry(raw.source.clone())
                        .or_default()
                        .push(position);
                    index
                        .by_destination
                        .entry(raw.destination.clone())
                        .or_default()
                        .push(position);
                    index.relations.push(RelationInstance {
                        predicate_uid: raw.predicate,
                        source_uid: raw.source,
                        destination_uid: raw.destination,
                        label,
                    });
                }
                RawEntry::Schema(_) | RawEntry::RelationDef(_) => {}
            }
        }

        // Groupings that depend on the final node set. Built after pass 2 so
        // that an overwritten duplicate leaves no stale entries behind.
        let mut creators = BTreeSet::new();
        for uid in &index.node_order {
            let Some(node) = index.nodes.get(uid) else {
                continue;
            };
            if !node.creator.is_empty() {
                index
                    .by_creator
                    .entry(node.creator.clone())
                    .or_default()
                    .push(uid.clone());
                creators.insert(node.creator.clone());
            }
            // Self-references are already dropped by `parse_node`.
            for target in &node.linked_node_uids {
                index
                    .referenced_by
                    .entry(target.clone())
                    .or_default()
                    .push(uid.clone());
            }
        }
        index.creators = creators.into_iter().collect();

        stats.dangling_relations = index
            .relations
            .iter()
            .filter(|r| {
                !index.nodes.contains_key(&r.source_uid)
                    || !index.nodes.contains_key(&r.destination_uid)
            })
            .count();
        stats.nodes = index.nodes.len();
        stats.schemas = index.schemas.len();
        stats.relation_defs = index.relation_defs.len();
        stats.relations = index.relations.len();
        stats.creators = index.creators.len();
        stats.loaded_at = Some(chrono::Utc::now());
        index.stats = stats;

        Ok(index)
    }

    /// Look up a node by uid.
    pub fn node(&self, uid: &str) -> Option<&DiscourseNode> {
        self.nodes.get(uid)
    }

    pub fn contains(&self, uid: &str) -> bool {
        self.nodes.contains_key(uid)
    }

    /// All nodes in order of first appearance.
    pub fn nodes(&self) -> impl Iterator<Item = &DiscourseNode> {
        self.node_order.iter().filter_map(|uid| self.nodes.get(uid))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Relations whose source is `uid`, in load order.
    pub fn outgoing(&self, uid: &str) -> impl Iterator<Item = &RelationInstance> {
        self.relations_at(self.by_source.get(uid))
    }

    /// Relations whose destination is `uid`, in load order.
    pub fn incoming(&self, uid: &str) -> impl Iterator<Item = &RelationInstance> {
        self.relations_at(self.by_destination.get(uid))
    }

    fn relations_at<'a>(
        &'a self,
        positions: Option<&'a Vec<usize>>,
    ) -> impl Iterator<Item = &'a RelationInstance> {
        positions
            .into_iter()
            .flatten()
            .filter_map(|&i| self.relations.get(i))
    }

    /// Every relation instance, in load order.
    pub fn relations(&self) -> &[RelationInstance] {
        &self.relations
    }

    /// Uids of other nodes listing `uid` as a cross-reference, in node order.
    pub fn referenced_by(&self, uid: &str) -> &[String] {
        self.referenced_by
            .get(uid)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Sorted distinct creator names.
    pub fn creators(&self) -> &[String] {
        &self.creators
    }

    /// Nodes by exact creator name, in node order.
    pub fn nodes_by_creator(&self, creator: &str) -> Vec<&DiscourseNode> {
        self.by_creator
            .get(creator)
            .into_iter()
            .flatten()
            .filter_map(|uid| self.nodes.get(uid))
            .collect()
    }

    pub fn schema(&self, uid: &str) -> Option<&NodeSchema> {
        self.schemas.get(uid)
    }

    /// Schemas in order of first appearance.
    pub fn schemas(&self) -> Vec<&NodeSchema> {
        self.schema_order
            .iter()
            .filter_map(|uid| self.schemas.get(uid))
            .collect()
    }

    pub fn relation_def(&self, uid: &str) -> Option<&RelationDef> {
        self.relation_defs.get(uid)
    }

    /// Relationship definitions in order of first appearance.
    pub fn relation_defs(&self) -> Vec<&RelationDef> {
        self.relation_def_order
            .iter()
            .filter_map(|uid| self.relation_defs.get(uid))
            .collect()
    }

    /// Category tags declared by the loaded schemas.
    pub fn declared_types(&self) -> BTreeSet<&str> {
        self.schemas
            .values()
            .filter_map(|s| s.node_type.as_deref())
            .collect()
    }

    pub fn stats(&self) -> &IndexStats {
        &self.stats
    }
}

/// Label of a schema, or the uid itself when no schema is registered.
fn schema_label(schemas: &HashMap<String, NodeSchema>, uid: &str) -> String {
    schemas
        .get(uid)
        .map(|s| s.label.clone())
        .unwrap_or_else(|| uid.to_string())
}
