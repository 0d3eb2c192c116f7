//! JSON Index Repository
//!
//! Implements the IndexRepository port. The index file is a JSON object
//! keyed by authored object name:
//!
//! ```json
//! { "test-ssp": { "profile": "simplified_nist_profile", "components": ["test_comp"] } }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::entities::{Index, IndexEntry};
use crate::domain::ports::file_system::FileSystem;
use crate::domain::ports::index_repository::{IndexError, IndexRepository, IndexResult};
use crate::infrastructure::fs::LocalFs;

pub struct JsonIndexRepository<F: FileSystem = LocalFs> {
    fs: F,
}

impl JsonIndexRepository {
    pub fn new() -> Self {
        Self { fs: LocalFs::new() }
    }
}

impl<F: FileSystem> JsonIndexRepository<F> {
    /// Create with a custom file system (for testing)
    pub fn with_fs(fs: F) -> Self {
        Self { fs }
    }
}

impl Default for JsonIndexRepository {
    fn default() -> Self {
        Self::new()
    }
}

/// JSON representation of one entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct JsonIndexEntry {
    profile: String,
    #[serde(default)]
    components: Vec<String>,
}

impl<F: FileSystem> IndexRepository for JsonIndexRepository<F> {
    fn load(&self, path: &Path) -> IndexResult<Index> {
        let content = self
            .fs
            .read(path)
            .map_err(|e| IndexError::Io(e.to_string()))?;
        let entries: BTreeMap<String, JsonIndexEntry> =
            serde_json::from_str(&content).map_err(|e| IndexError::Parse(e.to_string()))?;

        let mut index = Index::new();
        for (name, entry) in entries {
            index.insert(name, IndexEntry::new(entry.profile, entry.components));
        }
        Ok(index)
    }

    fn load_or_new(&self, path: &Path) -> IndexResult<Index> {
        if !self.fs.exists(path) {
            return Ok(Index::new());
        }
        self.load(path)
    }

    fn save(&self, index: &Index, path: &Path) -> IndexResult<()> {
        let entries: BTreeMap<&str, JsonIndexEntry> = index
            .entries()
            .map(|(name, entry)| {
                (
                    name,
                    JsonIndexEntry {
                        profile: entry.profile().to_string(),
                        components: entry.components().iter().cloned().collect(),
                    },
                )
            })
            .collect();

        let mut content =
            serde_json::to_string_pretty(&entries).map_err(|e| IndexError::Parse(e.to_string()))?;
        content.push('\n');
        self.fs
            .write(path, &content)
            .map_err(|e| IndexError::Io(e.to_string()))
    }
}
