use strand_core::graph::models::RawEntry;
use strand_core::{EntrySource, FileSource, LoadError};
use tempfile::TempDir;

const JSON_DATASET: &str = r#"[
  {"type": "schema", "uid": "_CLM-node", "label": "Claim"},
  {"type": "relation_def", "uid": "sup", "label": "Supports", "domain": "_EVD-node", "range": "_CLM-node"},
  {"type": "node", "uid": "c1", "title": "[[CLM]] - Warming is real", "creator": "Ada"},
  {"type": "relation", "predicate": "sup", "source": "e1", "destination": "c1"}
]"#;

const YAML_DATASET: &str = r#"
entries:
  - type: node
    uid: q1
    title: "[[QUE]] - Why now?"
    content: See the notes.
    references: [c1]
  - type: node
    uid: c1
    title: A claim
"#;

fn write(dir: &TempDir, name: &str, content: &str) -> FileSource {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    FileSource::new(path)
}

#[test]
fn test_load_json_array() {
    let temp = TempDir::new().unwrap();
    let source = write(&temp, "graph.json", JSON_DATASET);

    let loaded = source.load().unwrap();
    assert_eq!(loaded.entries.len(), 4);
    assert_eq!(loaded.skipped, 0);
    assert!(matches!(loaded.entries[2], RawEntry::Node(ref n) if n.uid == "c1"));
}

#[test]
fn test_load_yaml_envelope() {
    let temp = TempDir::new().unwrap();
    let source = write(&temp, "graph.yml", YAML_DATASET);

    let loaded = source.load().unwrap();
    assert_eq!(loaded.entries.len(), 2);
    match &loaded.entries[0] {
        RawEntry::Node(node) => {
            assert_eq!(node.references, vec!["c1".to_string()]);
            assert_eq!(node.content, "See the notes.");
        }
        other => panic!("expected a node, got {:?}", other),
    }
}

#[test]
fn test_bad_entries_are_skipped() {
    let temp = TempDir::new().unwrap();
    let source = write(
        &temp,
        "graph.json",
        r#"[
          {"type": "node", "uid": "a", "title": "A"},
          {"type": "mystery", "uid": "b"},
          {"type": "relation", "predicate": "p"}
        ]"#,
    );

    let loaded = source.load().unwrap();
    assert_eq!(loaded.entries.len(), 1);
    assert_eq!(loaded.skipped, 2);
}

#[test]
fn test_malformed_top_level_is_fatal() {
    let temp = TempDir::new().unwrap();
    let source = write(&temp, "graph.json", r#"{"nodes": []}"#);
    assert!(matches!(source.load(), Err(LoadError::Malformed(_))));

    let source = write(&temp, "scalar.json", "42");
    assert!(matches!(source.load(), Err(LoadError::Malformed(_))));

    let source = write(&temp, "broken.json", "[{");
    assert!(matches!(source.load(), Err(LoadError::Json(_))));
}

#[test]
fn test_missing_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("absent.json");
    let source = FileSource::new(&path);
    assert_eq!(source.path(), path.as_path());
    assert!(matches!(source.load(), Err(LoadError::NotFound(_))));
}

#[test]
fn test_fingerprint_tracks_content() {
    let temp = TempDir::new().unwrap();
    let first = write(&temp, "a.json", JSON_DATASET).load().unwrap();
    let same = write(&temp, "b.json", JSON_DATASET).load().unwrap();
    let other = write(&temp, "c.json", "[]").load().unwrap();

    let fingerprint = first.fingerprint.unwrap();
    assert_eq!(fingerprint.len(), 64);
    assert_eq!(Some(fingerprint.clone()), same.fingerprint);
    assert_ne!(Some(fingerprint), other.fingerprint);
}
