//! Entry sources feeding the graph indexer.
//!
//! A source turns some serialized dataset into a flat list of [`RawEntry`]
//! values. Only the top-level envelope is strict: a record that fails to
//! decode is logged and skipped so that one bad entry never blocks a load.

mod error;
mod file;

pub use error::LoadError;
pub use file::FileSource;

use serde_json::Value;
use tracing::warn;

use crate::graph::models::RawEntry;

/// Entries produced by one load.
#[derive(Debug, Clone, Default)]
pub struct LoadedEntries {
    pub entries: Vec<RawEntry>,
    /// Records that could not be decoded.
    pub skipped: usize,
    /// SHA-256 (hex) of the raw bytes, when there are any.
    pub fingerprint: Option<String>,
}

/// Trait for dataset backends.
pub trait EntrySource: Send + Sync {
    /// Produce the full entry list for a fresh index.
    fn load(&self) -> Result<LoadedEntries, LoadError>;

    /// Human-readable origin, used in logs.
    fn describe(&self) -> String;
}

/// In-memory source, mostly for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    entries: Vec<RawEntry>,
}

impl MemorySource {
    pub fn new(entries: Vec<RawEntry>) -> Self {
        Self { entries }
    }
}

impl EntrySource for MemorySource {
    fn load(&self) -> Result<LoadedEntries, LoadError> {
        Ok(LoadedEntries {
            entries: self.entries.clone(),
            skipped: 0,
            fingerprint: None,
        })
    }

    fn describe(&self) -> String {
        format!("memory ({} entries)", self.entries.len())
    }
}

/// Decode an already-parsed document into entries.
///
/// Accepts a bare list or an object with an `entries` list.
pub fn decode_entries(root: Value) -> Result<LoadedEntries, LoadError> {
    let items = match root {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("entries") {
            Some(Value::Array(items)) => items,
            Some(_) => {
                return Err(LoadError::Malformed(
                    "`entries` must be a list".to_string(),
                ))
            }
            None => {
                return Err(LoadError::Malformed(
                    "object has no `entries` list".to_string(),
                ))
            }
        },
        other => {
            return Err(LoadError::Malformed(format!(
                "expected a list of entries, found {}",
                value_kind(&other)
            )))
        }
    };

    let mut entries = Vec::with_capacity(items.len());
    let mut skipped = 0;

    for (index, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<RawEntry>(item) {
            Ok(entry) => entries.push(entry),
            Err(err) => {
                warn!(index, error = %err, "Skipping undecodable entry");
                skipped += 1;
            }
        }
    }

    Ok(LoadedEntries {
        entries,
        skipped,
        fingerprint: None,
    })
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
