use std::sync::Arc;

use strand_core::graph::models::RawEntry;
use strand_core::{Config, Direction, FileSource, GraphHandle, MemorySource, SearchQuery};
use tempfile::TempDir;

#[test]
fn test_concurrent_readers_during_reload() {
    let config = Config::default();
    let small = MemorySource::new(vec![RawEntry::node("a", "Alpha", "shared words")]);
    let large = MemorySource::new(vec![
        RawEntry::node("a", "Alpha", "shared words"),
        RawEntry::node("b", "Beta", "shared words"),
    ]);
    let handle = Arc::new(GraphHandle::open(&small, &config).unwrap());

    std::thread::scope(|scope| {
        for _ in 0..4 {
            let handle = Arc::clone(&handle);
            scope.spawn(move || {
                for _ in 0..200 {
                    let graph = handle.current();
                    // A snapshot is internally consistent whichever one we got.
                    let hits = graph.search(&SearchQuery::new("shared"));
                    assert_eq!(hits.len(), graph.stats().nodes);
                    assert!(graph.direct_neighbors("a", Direction::Both).is_ok());
                }
            });
        }
        scope.spawn(|| {
            for i in 0..50 {
                let source = if i % 2 == 0 { &large } else { &small };
                handle.reload(source).unwrap();
            }
        });
    });
}

#[test]
fn test_file_reload_picks_up_changes() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("graph.json");
    std::fs::write(&path, r#"[{"type": "node", "uid": "a", "title": "A"}]"#).unwrap();

    let source = FileSource::new(&path);
    let handle = GraphHandle::open(&source, &Config::default()).unwrap();
    let first = handle.current().stats().fingerprint.clone();

    std::fs::write(
        &path,
        r#"[{"type": "node", "uid": "a", "title": "A"}, {"type": "node", "uid": "b", "title": "B"}]"#,
    )
    .unwrap();
    handle.reload(&source).unwrap();

    assert_eq!(handle.current().stats().nodes, 2);
    assert_ne!(handle.current().stats().fingerprint, first);
}

#[test]
fn test_failed_reload_keeps_previous_graph() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("graph.json");
    std::fs::write(&path, r#"[{"type": "node", "uid": "a", "title": "A"}]"#).unwrap();

    let source = FileSource::new(&path);
    let handle = GraphHandle::open(&source, &Config::default()).unwrap();

    std::fs::write(&path, "not json").unwrap();
    assert!(handle.reload(&source).is_err());
    assert!(handle.current().node("a").is_ok());
}
