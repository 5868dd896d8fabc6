use crate::store::atomic_writer::AtomicWriter;
use crate::traits::KeyValueStore;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use taskboard_core::{KanbanError, KanbanResult};

/// Key-value storage backed by one JSON object file (`{ "key": "text" }`).
///
/// Every `set` rewrites the whole file atomically. A file that exists but
/// is not a JSON object of strings is reported as a serialization error on
/// read and replaced on the next write.
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    path: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn read_entries(&self) -> KanbanResult<BTreeMap<String, String>> {
        let Some(text) = AtomicWriter::read_to_string(&self.path)? else {
            return Ok(BTreeMap::new());
        };
        if text.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&text).map_err(|e| {
            KanbanError::Serialization(format!("{}: {}", self.path.display(), e))
        })
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> KanbanResult<()> {
        let bytes = serde_json::to_vec_pretty(entries)
            .map_err(|e| KanbanError::Serialization(e.to_string()))?;
        AtomicWriter::write_atomic(&self.path, &bytes)
    }

    fn entries_for_update(&self) -> KanbanResult<BTreeMap<String, String>> {
        match self.read_entries() {
            Ok(entries) => Ok(entries),
            Err(KanbanError::Serialization(reason)) => {
                tracing::warn!("Replacing unreadable storage file: {}", reason);
                Ok(BTreeMap::new())
            }
            Err(e) => Err(e),
        }
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> KanbanResult<Option<String>> {
        Ok(self.read_entries()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> KanbanResult<()> {
        let mut entries = self.entries_for_update()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_entries(&entries)
    }
}
