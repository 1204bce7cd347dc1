//! Default values for Strand configuration.
//!
//! All hardcoded defaults are centralized here for easy maintenance.

// ============================================================================
// Dataset Defaults
// ============================================================================

/// Default dataset file, relative to the working directory.
pub const DEFAULT_DATASET_PATH: &str = "graph.json";

/// Project-local config file name.
pub const DEFAULT_CONFIG_FILE: &str = "strand.toml";

/// Directory under the user config dir holding `config.toml`.
pub const DEFAULT_CONFIG_DIR: &str = "strand";

// ============================================================================
// Search Defaults
// ============================================================================

/// BM25 term-frequency saturation.
pub const DEFAULT_BM25_K1: f64 = 1.5;

/// BM25 length normalization.
pub const DEFAULT_BM25_B: f64 = 0.75;

/// Flat bonus multiplier (times idf) when a query term appears in the title.
pub const DEFAULT_TITLE_BOOST: f64 = 2.0;

/// Maximum snippet length in characters.
pub const DEFAULT_SNIPPET_LENGTH: usize = 200;

/// Default number of search results.
pub const DEFAULT_SEARCH_LIMIT: usize = 20;

/// Decimal places kept when reporting scores.
pub const DEFAULT_SCORE_PRECISION: u32 = 3;

/// Largest accepted `search.score_precision`.
pub const MAX_SCORE_PRECISION: u32 = 15;

// ============================================================================
// Traversal Defaults
// ============================================================================

/// Smallest neighborhood radius.
pub const MIN_NEIGHBORHOOD_DEPTH: usize = 1;

/// Largest neighborhood radius.
pub const MAX_NEIGHBORHOOD_DEPTH: usize = 4;

/// Radius used when the caller does not give one.
pub const DEFAULT_NEIGHBORHOOD_DEPTH: usize = 2;

// ============================================================================
// Server Defaults
// ============================================================================

/// Default bind host for the JSON API.
pub const DEFAULT_SERVER_HOST: &str = "127.0.0.1";

/// Default port for the JSON API.
pub const DEFAULT_SERVER_PORT: u16 = 3333;

// ============================================================================
// Indexing Conventions
// ============================================================================

/// Title prefix carrying the category tag, e.g. `[[CLM]] - Some claim`.
pub const TITLE_PREFIX_PATTERN: &str = r"(?s)^\[\[([A-Za-z][A-Za-z0-9]*)\]\]\s*-\s*(.*)$";

/// Schema uid carrying the category tag, e.g. `_CLM-node`.
pub const SCHEMA_UID_PATTERN: &str = r"^_([A-Za-z][A-Za-z0-9]*)-node$";

/// Markdown image markup `![alt](url)`.
pub const IMAGE_MARKUP_PATTERN: &str = r"!\[[^\]]*\]\(([^)\s]+)[^)]*\)";

/// Label used for relations whose predicate is not declared.
pub const UNKNOWN_RELATION_LABEL: &str = "unknown";
