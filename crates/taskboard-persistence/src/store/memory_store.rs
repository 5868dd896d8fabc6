use crate::traits::KeyValueStore;
use std::cell::RefCell;
use std::collections::HashMap;
use taskboard_core::{KanbanError, KanbanResult};

/// In-process storage area. An optional quota, counted in bytes of keys
/// plus values, makes writes fail the way a full browser storage does.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: RefCell<HashMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota: usize) -> Self {
        Self {
            entries: RefCell::new(HashMap::new()),
            quota: Some(quota),
        }
    }

    /// Seeds a raw value, bypassing the quota.
    pub fn with_entry(self, key: &str, value: &str) -> Self {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        self
    }

    fn used_bytes_without(&self, key: &str) -> usize {
        self.entries
            .borrow()
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> KanbanResult<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> KanbanResult<()> {
        if let Some(quota) = self.quota {
            let needed = self.used_bytes_without(key) + key.len() + value.len();
            if needed > quota {
                return Err(KanbanError::storage(
                    key,
                    format!("quota exceeded ({} of {} bytes)", needed, quota),
                ));
            }
        }
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_overwrites() {
        let store = MemoryKeyValueStore::new();
        store.set("k", "one").unwrap();
        store.set("k", "two").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("two"));
        assert_eq!(store.entries.borrow().len(), 1);
    }

    #[test]
    fn test_quota_rejects_oversized_write_and_keeps_old_value() {
        let store = MemoryKeyValueStore::with_quota(8);
        store.set("k", "small").unwrap();

        let result = store.set("k", "much too large");
        assert!(matches!(result, Err(KanbanError::Storage { .. })));
        assert_eq!(store.get("k").unwrap().as_deref(), Some("small"));
    }
}
