//! Dataset naming conventions applied while indexing.

use regex::Regex;

use crate::config::{IMAGE_MARKUP_PATTERN, SCHEMA_UID_PATTERN, TITLE_PREFIX_PATTERN};
use crate::graph::models::{DiscourseNode, NodeSchema, RawNode, RawSchema};

/// Compiled patterns for category tags, schema uids and image markup.
#[derive(Debug, Clone)]
pub struct Conventions {
    title_prefix: Regex,
    schema_uid: Regex,
    image: Regex,
}

impl Conventions {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            title_prefix: Regex::new(TITLE_PREFIX_PATTERN)?,
            schema_uid: Regex::new(SCHEMA_UID_PATTERN)?,
            image: Regex::new(IMAGE_MARKUP_PATTERN)?,
        })
    }

    /// Split `[[TAG]] - rest` into `(Some(TAG), rest)`.
    ///
    /// Titles without the prefix have no tag and are returned trimmed.
    pub fn split_title(&self, title: &str) -> (Option<String>, String) {
        match self.title_prefix.captures(title.trim()) {
            Some(cap) => {
                let tag = cap.get(1).map(|m| m.as_str().to_string());
                let rest = cap.get(2).map(|m| m.as_str().trim()).unwrap_or("");
                (tag, rest.to_string())
            }
            None => (None, title.trim().to_string()),
        }
    }

    /// Tag for a schema uid following the `_TAG-node` convention.
    pub fn schema_tag(&self, uid: &str) -> Option<String> {
        self.schema_uid
            .captures(uid)
            .and_then(|cap| cap.get(1))
            .map(|m| m.as_str().to_string())
    }

    /// URLs of all markdown images in `content`, in order.
    pub fn image_urls(&self, content: &str) -> Vec<String> {
        self.image
            .captures_iter(content)
            .filter_map(|cap| cap.get(1))
            .map(|m| m.as_str().to_string())
            .collect()
    }

    pub fn parse_schema(&self, raw: &RawSchema) -> NodeSchema {
        NodeSchema {
            uid: raw.uid.clone(),
            label: raw.label.clone(),
            node_type: self.schema_tag(&raw.uid),
        }
    }

    /// Turn a raw node record into a [`DiscourseNode`].
    ///
    /// Cross-references come from the explicit list only. Blanks and the
    /// node's own uid are dropped; repeats collapse to their first position.
    pub fn parse_node(&self, raw: RawNode, base_url: Option<&str>) -> DiscourseNode {
        let (node_type, title_clean) = self.split_title(&raw.title);
        let image_urls = self.image_urls(&raw.content);
        let url = base_url.map(|base| format!("{}/{}", base.trim_end_matches('/'), raw.uid));

        let mut linked_node_uids: Vec<String> = Vec::with_capacity(raw.references.len());
        for reference in raw.references {
            let reference = reference.trim();
            if reference.is_empty() || reference == raw.uid {
                continue;
            }
            if !linked_node_uids.iter().any(|u| u == reference) {
                linked_node_uids.push(reference.to_string());
            }
        }

        DiscourseNode {
            uid: raw.uid,
            node_type,
            title: raw.title,
            title_clean,
            content: raw.content,
            creator: raw.creator.trim().to_string(),
            created: raw.created,
            modified: raw.modified,
            linked_node_uids,
            image_urls,
            url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conventions() -> Conventions {
        Conventions::new().unwrap()
    }

    #[test]
    fn test_split_title_with_prefix() {
        let (tag, clean) = conventions().split_title("[[CLM]] - Sleep improves recall");
        assert_eq!(tag.as_deref(), Some("CLM"));
        assert_eq!(clean, "Sleep improves recall");
    }

    #[test]
    fn test_split_title_without_prefix() {
        let (tag, clean) = conventions().split_title("  Just a page  ");
        assert!(tag.is_none());
        assert_eq!(clean, "Just a page");
    }

    #[test]
    fn test_schema_tag() {
        let c = conventions();
        assert_eq!(c.schema_tag("_EVD-node").as_deref(), Some("EVD"));
        assert_eq!(c.schema_tag("claim-schema"), None);
    }

    #[test]
    fn test_parse_node_derives_fields() {
        let raw = RawNode::new(
            "n1",
            "[[QUE]] - Why?",
            "See ![chart](https://img.example/a.png) and ![](https://img.example/b.png \"b\")",
        )
        .with_references(["x", "", "y", "x"]);

        let node = conventions().parse_node(raw, Some("https://app.example/page/"));
        assert_eq!(node.node_type.as_deref(), Some("QUE"));
        assert_eq!(node.title_clean, "Why?");
        assert_eq!(node.linked_node_uids, vec!["x", "y"]);
        assert_eq!(
            node.image_urls,
            vec!["https://img.example/a.png", "https://img.example/b.png"]
        );
        assert_eq!(node.url.as_deref(), Some("https://app.example/page/n1"));
    }

    #[test]
    fn test_split_title_spanning_lines() {
        let (tag, clean) = conventions().split_title("[[CLM]] - first line\nsecond line");
        assert_eq!(tag.as_deref(), Some("CLM"));
        assert_eq!(clean, "first line\nsecond line");
    }

    #[test]
    fn test_parse_node_drops_self_reference() {
        let raw = RawNode::new("a", "A", "").with_references(["a", "b"]);
        let node = conventions().parse_node(raw, None);
        assert_eq!(node.linked_node_uids, vec!["b"]);
    }
}
