use strand_core::config::{
    DEFAULT_BM25_B, DEFAULT_BM25_K1, DEFAULT_DATASET_PATH, DEFAULT_NEIGHBORHOOD_DEPTH,
    DEFAULT_SEARCH_LIMIT, DEFAULT_TITLE_BOOST,
};
use strand_core::Config;
use tempfile::TempDir;

#[test]
fn test_default_config() {
    let config = Config::default();
    assert_eq!(config.search.k1, DEFAULT_BM25_K1);
    assert_eq!(config.search.b, DEFAULT_BM25_B);
    assert_eq!(config.search.title_boost, DEFAULT_TITLE_BOOST);
    assert_eq!(config.search.default_limit, DEFAULT_SEARCH_LIMIT);
    assert_eq!(config.traversal.default_depth, DEFAULT_NEIGHBORHOOD_DEPTH);
    assert_eq!(config.dataset.path.to_string_lossy(), DEFAULT_DATASET_PATH);
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_from_toml() {
    let toml_str = r#"
[dataset]
path = "data/graph.yaml"
base_url = "https://example.org/page"

[search]
k1 = 1.2
title_boost = 3.0
"#;
    let config: Config = toml::from_str(toml_str).unwrap();
    assert_eq!(config.dataset.path.to_string_lossy(), "data/graph.yaml");
    assert_eq!(
        config.dataset.base_url.as_deref(),
        Some("https://example.org/page")
    );
    assert_eq!(config.search.k1, 1.2);
    assert_eq!(config.search.title_boost, 3.0);
    // Unset keys keep their defaults.
    assert_eq!(config.search.b, DEFAULT_BM25_B);
}

#[test]
fn test_config_from_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("strand.toml");
    std::fs::write(&path, "[traversal]\ndefault_depth = 3\n").unwrap();

    let config = Config::from_file(&path).unwrap();
    assert_eq!(config.traversal.default_depth, 3);
}

#[test]
fn test_invalid_file_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("strand.toml");
    std::fs::write(&path, "[search]\nb = 1.5\n").unwrap();

    assert!(Config::from_file(&path).is_err());
}

#[test]
fn test_unparseable_file_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("strand.toml");
    std::fs::write(&path, "[search\nk1 = ").unwrap();

    assert!(Config::from_file(&path).is_err());
}

#[test]
fn test_excessive_score_precision_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("strand.toml");
    std::fs::write(&path, "[search]\nscore_precision = 400\n").unwrap();

    assert!(Config::from_file(&path).is_err());
}
