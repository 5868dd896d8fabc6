//! Browser-local-storage style persistence for the task board.
//!
//! The whole collection lives under [`TASKS_KEY`] as one JSON array and the
//! column order under [`COLUMN_ORDER_KEY`]. Reads and writes never fail
//! outward: unreadable data loads as an empty board and rejected writes are
//! logged while the in-memory store stays authoritative.
//!
//! Stored elements that cannot be read as tasks are kept aside and written
//! back after the live tasks, so a newer or older client's records survive
//! edits made here.

use crate::serialization::JsonSerializer;
use crate::traits::{KeyValueStore, Serializer};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashSet;
use taskboard_core::{KanbanError, KanbanResult};
use taskboard_domain::{ColumnOrder, Task, TaskPersistence, TaskStatus};

pub const TASKS_KEY: &str = "kanban-tasks";
pub const COLUMN_ORDER_KEY: &str = "kanban-columns-order";

pub struct LocalStorageAdapter<S: KeyValueStore> {
    medium: Option<S>,
    serializer: JsonSerializer,
    preserved: RefCell<Vec<Value>>,
}

/// The array written under [`TASKS_KEY`]: live tasks, then preserved records.
struct StoredTasks<'a> {
    tasks: &'a [Task],
    preserved: &'a [Value],
}

impl Serialize for StoredTasks<'_> {
    fn serialize<Ser: serde::Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        let mut seq = serializer.serialize_seq(Some(self.tasks.len() + self.preserved.len()))?;
        for task in self.tasks {
            seq.serialize_element(task)?;
        }
        for value in self.preserved {
            seq.serialize_element(value)?;
        }
        seq.end()
    }
}

impl<S: KeyValueStore> LocalStorageAdapter<S> {
    pub fn new(medium: S) -> Self {
        Self {
            medium: Some(medium),
            serializer: JsonSerializer,
            preserved: RefCell::default(),
        }
    }

    /// An adapter with no storage medium. Loads return empty and saves are
    /// dropped, as when storage is disabled in the host environment.
    pub fn detached() -> Self {
        Self {
            medium: None,
            serializer: JsonSerializer,
            preserved: RefCell::default(),
        }
    }

    fn require_medium(&self, key: &str) -> KanbanResult<&S> {
        self.medium
            .as_ref()
            .ok_or_else(|| KanbanError::storage(key, "storage unavailable"))
    }

    /// Reads the stored collection, reporting why it could not be read.
    ///
    /// A missing key is an empty board. Elements of the stored array that
    /// do not decode as tasks are preserved for the next save; a repeated id
    /// keeps its first occurrence only.
    pub fn try_load_tasks(&self) -> KanbanResult<Vec<Task>> {
        self.preserved.borrow_mut().clear();
        let medium = self.require_medium(TASKS_KEY)?;
        let Some(text) = medium.get(TASKS_KEY)? else {
            return Ok(Vec::new());
        };

        let value: Value = self.serializer.deserialize(&text)?;
        let Value::Array(items) = value else {
            return Err(KanbanError::Serialization(format!(
                "value under '{}' is not an array",
                TASKS_KEY
            )));
        };

        let total = items.len();
        let mut tasks = Vec::with_capacity(total);
        let mut preserved = Vec::new();
        let mut seen = HashSet::new();
        for (index, item) in items.into_iter().enumerate() {
            match Task::deserialize(&item) {
                Ok(task) if !seen.insert(task.id.clone()) => {
                    tracing::warn!("Dropping stored task #{}: duplicate id '{}'", index, task.id);
                }
                Ok(task) => tasks.push(task),
                Err(e) => {
                    tracing::warn!("Keeping unreadable stored task #{} as is: {}", index, e);
                    preserved.push(item);
                }
            }
        }

        tracing::debug!(
            "Loaded {} of {} stored tasks ({} preserved)",
            tasks.len(),
            total,
            preserved.len()
        );
        *self.preserved.borrow_mut() = preserved;
        Ok(tasks)
    }

    pub fn try_save_tasks(&self, tasks: &[Task]) -> KanbanResult<()> {
        let medium = self.require_medium(TASKS_KEY)?;
        let preserved = self.preserved.borrow();
        let text = self.serializer.serialize(&StoredTasks {
            tasks,
            preserved: &preserved,
        })?;
        medium.set(TASKS_KEY, &text)?;
        tracing::debug!("Saved {} tasks", tasks.len());
        Ok(())
    }

    pub fn try_load_column_order(&self) -> KanbanResult<Option<ColumnOrder>> {
        let medium = self.require_medium(COLUMN_ORDER_KEY)?;
        let Some(text) = medium.get(COLUMN_ORDER_KEY)? else {
            return Ok(None);
        };
        let ids: Vec<String> = self.serializer.deserialize(&text)?;
        Ok(ColumnOrder::from_ids(&ids))
    }

    pub fn try_save_column_order(&self, order: &[TaskStatus]) -> KanbanResult<()> {
        let medium = self.require_medium(COLUMN_ORDER_KEY)?;
        let ids: Vec<String> = order.iter().map(|s| s.as_str().to_string()).collect();
        let text = self.serializer.serialize(&ids)?;
        medium.set(COLUMN_ORDER_KEY, &text)
    }
}

impl<S: KeyValueStore> TaskPersistence for LocalStorageAdapter<S> {
    fn load_tasks(&self) -> Vec<Task> {
        self.try_load_tasks().unwrap_or_else(|e| {
            tracing::warn!("Starting with an empty board: {}", e);
            Vec::new()
        })
    }

    fn save_tasks(&self, tasks: &[Task]) {
        if let Err(e) = self.try_save_tasks(tasks) {
            tracing::error!("Failed to save tasks: {}", e);
        }
    }

    fn load_column_order(&self) -> Option<Vec<TaskStatus>> {
        match self.try_load_column_order() {
            Ok(Some(order)) => Some(order.statuses().to_vec()),
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("Ignoring stored column order: {}", e);
                None
            }
        }
    }

    fn save_column_order(&self, order: &[TaskStatus]) {
        if let Err(e) = self.try_save_column_order(order) {
            tracing::error!("Failed to save column order: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryKeyValueStore;
    use chrono::{TimeZone, Utc};
    use taskboard_domain::{TaskId, TaskPriority};

    fn sample(id: &str, status: TaskStatus) -> Task {
        let mut task = Task::new(TaskId::new(id), status, "Write spec", "draft v1");
        task.created_at = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        task
    }

    #[test]
    fn test_save_then_load_preserves_order_and_fields() {
        let adapter = LocalStorageAdapter::new(MemoryKeyValueStore::new());
        let tasks = vec![
            sample("task-1", TaskStatus::Todo),
            sample("task-2", TaskStatus::Done).with_priority(Some(TaskPriority::High)),
        ];

        adapter.save_tasks(&tasks);
        assert_eq!(adapter.load_tasks(), tasks);
    }

    #[test]
    fn test_empty_collection_round_trips() {
        let adapter = LocalStorageAdapter::new(MemoryKeyValueStore::new());
        adapter.save_tasks(&[]);
        assert_eq!(
            adapter.medium.as_ref().unwrap().get(TASKS_KEY).unwrap().as_deref(),
            Some("[]")
        );
        assert!(adapter.load_tasks().is_empty());
    }

    #[test]
    fn test_missing_key_loads_empty() {
        let adapter = LocalStorageAdapter::new(MemoryKeyValueStore::new());
        assert!(adapter.load_tasks().is_empty());
        assert!(adapter.load_column_order().is_none());
    }

    #[test]
    fn test_unparseable_text_loads_empty() {
        let medium = MemoryKeyValueStore::new().with_entry(TASKS_KEY, "not json");
        let adapter = LocalStorageAdapter::new(medium);

        assert!(adapter.try_load_tasks().is_err());
        assert!(adapter.load_tasks().is_empty());
    }

    #[test]
    fn test_non_array_value_loads_empty() {
        let medium = MemoryKeyValueStore::new().with_entry(TASKS_KEY, r#"{"id":"task-1"}"#);
        let adapter = LocalStorageAdapter::new(medium);
        assert!(adapter.load_tasks().is_empty());
    }

    #[test]
    fn test_malformed_records_are_skipped_and_written_back() {
        let stored = r#"[
            {"id":"task-1","title":"Keep","description":"","status":"todo","createdAt":"2024-05-01T10:00:00.000Z"},
            {"id":"task-2","title":"Bad status","description":"","status":"blocked","createdAt":"2024-05-01T10:00:00.000Z"},
            42
        ]"#;
        let adapter = LocalStorageAdapter::new(MemoryKeyValueStore::new().with_entry(TASKS_KEY, stored));

        let mut tasks = adapter.load_tasks();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id.as_str(), "task-1");

        tasks[0].status = TaskStatus::Done;
        adapter.save_tasks(&tasks);

        let text = adapter.medium.as_ref().unwrap().get(TASKS_KEY).unwrap().unwrap();
        let written: Value = serde_json::from_str(&text).unwrap();
        let items = written.as_array().unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0]["status"], "done");
        assert_eq!(items[1]["status"], "blocked");
        assert_eq!(items[2], 42);
    }

    #[test]
    fn test_repeated_ids_keep_first_record() {
        let stored = r#"[
            {"id":"dup","title":"First","status":"todo","createdAt":"2024-05-01T10:00:00.000Z"},
            {"id":"dup","title":"Second","status":"done","createdAt":"2024-05-01T10:00:00.000Z"}
        ]"#;
        let adapter = LocalStorageAdapter::new(MemoryKeyValueStore::new().with_entry(TASKS_KEY, stored));

        let tasks = adapter.load_tasks();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "First");
    }

    #[test]
    fn test_rejected_write_is_swallowed() {
        let adapter = LocalStorageAdapter::new(MemoryKeyValueStore::with_quota(16));
        let tasks = vec![sample("task-1", TaskStatus::Todo)];

        assert!(matches!(
            adapter.try_save_tasks(&tasks),
            Err(KanbanError::Storage { .. })
        ));
        adapter.save_tasks(&tasks);
        assert!(adapter.load_tasks().is_empty());
    }

    #[test]
    fn test_detached_adapter_is_inert() {
        let adapter = LocalStorageAdapter::<MemoryKeyValueStore>::detached();
        assert!(adapter.medium.is_none());

        adapter.save_tasks(&[sample("task-1", TaskStatus::Todo)]);
        assert!(adapter.load_tasks().is_empty());
        assert!(adapter.try_load_tasks().is_err());
    }

    #[test]
    fn test_column_order_round_trip() {
        let adapter = LocalStorageAdapter::new(MemoryKeyValueStore::new());
        let order = [TaskStatus::Done, TaskStatus::Todo, TaskStatus::InProgress];

        adapter.save_column_order(&order);
        assert_eq!(adapter.load_column_order(), Some(order.to_vec()));
        assert_eq!(
            adapter.medium.as_ref().unwrap().get(COLUMN_ORDER_KEY).unwrap().as_deref(),
            Some(r#"["done","todo","in-progress"]"#)
        );
    }

    #[test]
    fn test_invalid_column_order_is_ignored() {
        for stored in [r#"["todo","todo","done"]"#, r#"["todo"]"#, r#"["todo","doing","done"]"#, "oops"] {
            let medium = MemoryKeyValueStore::new().with_entry(COLUMN_ORDER_KEY, stored);
            assert!(LocalStorageAdapter::new(medium).load_column_order().is_none());
        }
    }

    #[test]
    fn test_generated_ids_are_distinct() {
        let adapter = LocalStorageAdapter::new(MemoryKeyValueStore::new());
        let a = adapter.generate_id();
        let b = adapter.generate_id();
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("task-"));
    }
}
