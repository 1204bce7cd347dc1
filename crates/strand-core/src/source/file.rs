use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

use super::error::LoadError;
use super::{decode_entries, EntrySource, LoadedEntries};

/// Dataset file on disk.
///
/// `.yaml` and `.yml` files are read as YAML, everything else as JSON. Both
/// use the same envelope.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn is_yaml(&self) -> bool {
        self.path
            .extension()
            .and_then(|e| e.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
            .unwrap_or(false)
    }

    /// Compute SHA256 hash of content for change detection.
    fn compute_hash(content: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(content.as_bytes());
        hex::encode(hasher.finalize())
    }
}

impl EntrySource for FileSource {
    fn load(&self) -> Result<LoadedEntries, LoadError> {
        if !self.path.exists() {
            return Err(LoadError::NotFound(self.path.clone()));
        }

        let content =
            fs::read_to_string(&self.path).map_err(|e| LoadError::io(&self.path, e))?;

        let root: serde_json::Value = if self.is_yaml() {
            serde_yaml::from_str(&content)?
        } else {
            serde_json::from_str(&content)?
        };

        let mut loaded = decode_entries(root)?;
        loaded.fingerprint = Some(Self::compute_hash(&content));
        Ok(loaded)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
