//! The authoritative, in-memory task collection.
//!
//! Every mutation is applied to the collection first and then written
//! through to the persistence seam in full. Insertion order is display
//! order within a column.

use crate::column::{Column, ColumnOrder};
use crate::persistence::TaskPersistence;
use crate::task::{Task, TaskId, TaskStatus};
use taskboard_core::{KanbanError, KanbanResult};

pub struct TaskStore<P: TaskPersistence> {
    tasks: Vec<Task>,
    column_order: ColumnOrder,
    persistence: P,
}

impl<P: TaskPersistence> TaskStore<P> {
    /// Loads the stored board. A stored column order that does not name
    /// every column exactly once falls back to the default order.
    pub fn open(persistence: P) -> Self {
        let tasks = persistence.load_tasks();
        let column_order = persistence
            .load_column_order()
            .and_then(ColumnOrder::from_statuses)
            .unwrap_or_default();
        tracing::debug!("Opened task store with {} tasks", tasks.len());
        Self {
            tasks,
            column_order,
            persistence,
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.id == id)
    }

    pub fn contains(&self, id: &TaskId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn column_order(&self) -> &ColumnOrder {
        &self.column_order
    }

    pub fn columns(&self) -> Vec<Column> {
        self.column_order.columns().collect()
    }

    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    pub fn add_task(
        &mut self,
        status: TaskStatus,
        title: &str,
        description: &str,
    ) -> KanbanResult<Task> {
        if title.trim().is_empty() {
            return Err(KanbanError::Validation("Title is required".to_string()));
        }
        let task = Task::new(self.persistence.generate_id(), status, title, description);
        tracing::info!("Creating task: {} (id: {})", task.title, task.id);
        self.tasks.push(task.clone());
        self.write_through();
        Ok(task)
    }

    /// Replaces the record sharing `updated.id` wholesale, keeping its
    /// position in the collection.
    pub fn update_task(&mut self, updated: Task) -> KanbanResult<()> {
        if updated.title.trim().is_empty() {
            return Err(KanbanError::Validation("Title is required".to_string()));
        }
        let slot = self
            .tasks
            .iter_mut()
            .find(|t| t.id == updated.id)
            .ok_or_else(|| KanbanError::NotFound(format!("task {}", updated.id)))?;
        tracing::info!("Updating task {}", updated.id);
        *slot = updated;
        self.write_through();
        Ok(())
    }

    /// Idempotent: deleting an id that is not present is not an error.
    pub fn delete_task(&mut self, id: &TaskId) {
        let before = self.tasks.len();
        self.tasks.retain(|t| &t.id != id);
        if self.tasks.len() < before {
            tracing::info!("Deleted task {}", id);
        } else {
            tracing::debug!("Delete of absent task {} ignored", id);
        }
        self.write_through();
    }

    /// Moves a task to the column named by `target`. Unknown columns and
    /// unknown tasks are silent no-ops; returns whether anything changed.
    pub fn move_task(&mut self, id: &TaskId, target: &str) -> bool {
        match target.parse::<TaskStatus>() {
            Ok(status) => self.move_task_to(id, status),
            Err(e) => {
                tracing::debug!("Ignoring move of {}: {}", id, e);
                false
            }
        }
    }

    pub fn move_task_to(&mut self, id: &TaskId, status: TaskStatus) -> bool {
        let Some(task) = self.tasks.iter_mut().find(|t| &t.id == id) else {
            tracing::debug!("Ignoring move of absent task {}", id);
            return false;
        };
        tracing::info!("Moving task {} from {} to {}", id, task.status, status);
        task.status = status;
        self.write_through();
        true
    }

    /// Moves a column within the display order and persists the new order.
    pub fn reorder_column(&mut self, status: TaskStatus, new_index: usize) -> bool {
        if !self.column_order.move_column(status, new_index) {
            return false;
        }
        tracing::info!("Column {} moved to position {}", status, new_index);
        self.persistence
            .save_column_order(self.column_order.statuses());
        true
    }

    fn write_through(&self) {
        self.persistence.save_tasks(&self.tasks);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MockTaskPersistence;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Persistence double that records every write.
    #[derive(Clone, Default)]
    struct RecordingPersistence {
        saved: Rc<RefCell<Vec<Vec<Task>>>>,
        order: Rc<RefCell<Option<Vec<TaskStatus>>>>,
    }

    impl RecordingPersistence {
        fn last_saved(&self) -> Option<Vec<Task>> {
            self.saved.borrow().last().cloned()
        }

        fn write_count(&self) -> usize {
            self.saved.borrow().len()
        }
    }

    impl TaskPersistence for RecordingPersistence {
        fn load_tasks(&self) -> Vec<Task> {
            self.last_saved().unwrap_or_default()
        }

        fn save_tasks(&self, tasks: &[Task]) {
            self.saved.borrow_mut().push(tasks.to_vec());
        }

        fn load_column_order(&self) -> Option<Vec<TaskStatus>> {
            self.order.borrow().clone()
        }

        fn save_column_order(&self, order: &[TaskStatus]) {
            *self.order.borrow_mut() = Some(order.to_vec());
        }
    }

    fn empty_store() -> (TaskStore<RecordingPersistence>, RecordingPersistence) {
        let persistence = RecordingPersistence::default();
        (TaskStore::open(persistence.clone()), persistence)
    }

    #[test]
    fn test_add_task_trims_and_appends() {
        let (mut store, persistence) = empty_store();
        let first = store
            .add_task(TaskStatus::Todo, "  Write spec  ", " draft ")
            .unwrap();
        let second = store.add_task(TaskStatus::Done, "Review", "").unwrap();

        assert_eq!(first.title, "Write spec");
        assert_eq!(first.description, "draft");
        assert_eq!(first.status, TaskStatus::Todo);
        assert_ne!(first.id, second.id);
        assert_eq!(store.tasks()[1].id, second.id);
        assert_eq!(persistence.last_saved().unwrap(), store.tasks());
    }

    #[test]
    fn test_add_task_rejects_blank_title() {
        let (mut store, persistence) = empty_store();
        let result = store.add_task(TaskStatus::Todo, "   ", "anything");

        assert!(matches!(result, Err(KanbanError::Validation(_))));
        assert!(store.is_empty());
        assert_eq!(persistence.write_count(), 0);
    }

    #[test]
    fn test_update_task_replaces_in_place() {
        let (mut store, _) = empty_store();
        let a = store.add_task(TaskStatus::Todo, "A", "").unwrap();
        let b = store.add_task(TaskStatus::Todo, "B", "").unwrap();

        let mut edited = a.clone();
        edited.title = "A2".to_string();
        edited.description = "more".to_string();
        store.update_task(edited.clone()).unwrap();

        assert_eq!(store.tasks()[0], edited);
        assert_eq!(store.tasks()[1], b);
    }

    #[test]
    fn test_update_unknown_task_is_not_found() {
        let (mut store, persistence) = empty_store();
        let ghost = Task::new(TaskId::new("ghost"), TaskStatus::Todo, "Ghost", "");

        let result = store.update_task(ghost);
        assert!(matches!(result, Err(KanbanError::NotFound(_))));
        assert_eq!(persistence.write_count(), 0);
    }

    #[test]
    fn test_delete_is_idempotent() {
        let (mut store, _) = empty_store();
        let a = store.add_task(TaskStatus::Todo, "A", "").unwrap();
        store.add_task(TaskStatus::Todo, "B", "").unwrap();

        store.delete_task(&a.id);
        let once = store.tasks().to_vec();
        store.delete_task(&a.id);

        assert_eq!(store.tasks(), once.as_slice());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_move_changes_only_status() {
        let (mut store, _) = empty_store();
        let task = store.add_task(TaskStatus::Todo, "A", "desc").unwrap();

        assert!(store.move_task(&task.id, "done"));

        let moved = store.get(&task.id).unwrap();
        assert_eq!(moved.status, TaskStatus::Done);
        assert_eq!(
            Task {
                status: TaskStatus::Todo,
                ..moved.clone()
            },
            task
        );
    }

    #[test]
    fn test_move_to_invalid_column_leaves_store_unchanged() {
        let (mut store, persistence) = empty_store();
        let task = store.add_task(TaskStatus::Todo, "A", "").unwrap();
        let before = store.tasks().to_vec();
        let writes = persistence.write_count();

        assert!(!store.move_task(&task.id, "archived"));
        assert!(!store.move_task(&TaskId::new("missing"), "done"));

        assert_eq!(store.tasks(), before.as_slice());
        assert_eq!(persistence.write_count(), writes);
    }

    #[test]
    fn test_reorder_column_persists_order() {
        let (mut store, persistence) = empty_store();
        assert!(store.reorder_column(TaskStatus::Done, 0));

        assert_eq!(store.column_order().first(), TaskStatus::Done);
        assert_eq!(
            persistence.order.borrow().clone().unwrap(),
            vec![TaskStatus::Done, TaskStatus::Todo, TaskStatus::InProgress]
        );
    }

    #[test]
    fn test_open_uses_stored_tasks_and_order() {
        let mut mock = MockTaskPersistence::new();
        let stored = vec![Task::new(TaskId::new("t1"), TaskStatus::Done, "Old", "")];
        let loaded = stored.clone();
        mock.expect_load_tasks().return_once(move || loaded);
        mock.expect_load_column_order()
            .return_once(|| Some(vec![TaskStatus::Done, TaskStatus::InProgress, TaskStatus::Todo]));

        let store = TaskStore::open(mock);

        assert_eq!(store.tasks(), stored.as_slice());
        assert_eq!(store.column_order().first(), TaskStatus::Done);
    }

    #[test]
    fn test_open_ignores_partial_column_order() {
        let mut mock = MockTaskPersistence::new();
        mock.expect_load_tasks().return_once(Vec::new);
        mock.expect_load_column_order()
            .return_once(|| Some(vec![TaskStatus::Done]));

        let store = TaskStore::open(mock);
        assert_eq!(store.column_order(), &ColumnOrder::default());
    }

    #[test]
    fn test_each_mutation_writes_through_once() {
        let mut mock = MockTaskPersistence::new();
        mock.expect_load_tasks().return_once(Vec::new);
        mock.expect_load_column_order().return_once(|| None);
        mock.expect_generate_id()
            .times(1)
            .return_once(|| TaskId::new("task-fixed"));
        mock.expect_save_tasks().times(3).return_const(());

        let mut store = TaskStore::open(mock);
        let task = store.add_task(TaskStatus::Todo, "Write spec", "").unwrap();
        assert_eq!(task.id, TaskId::new("task-fixed"));
        assert!(store.move_task(&task.id, "in-progress"));
        store.delete_task(&task.id);
    }
}
