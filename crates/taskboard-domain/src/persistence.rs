use crate::task::{Task, TaskId, TaskStatus};

/// Where the task store mirrors its state after each mutation.
///
/// Implementations never fail outward: a medium that cannot be read yields
/// an empty board and a rejected write is logged and dropped, leaving the
/// in-memory store authoritative for the session.
#[cfg_attr(test, mockall::automock)]
pub trait TaskPersistence {
    fn load_tasks(&self) -> Vec<Task>;

    fn save_tasks(&self, tasks: &[Task]);

    /// `None` when no valid column order has been stored.
    fn load_column_order(&self) -> Option<Vec<TaskStatus>>;

    fn save_column_order(&self, order: &[TaskStatus]);

    fn generate_id(&self) -> TaskId {
        TaskId::generate()
    }
}

impl<P: TaskPersistence + ?Sized> TaskPersistence for Box<P> {
    fn load_tasks(&self) -> Vec<Task> {
        (**self).load_tasks()
    }

    fn save_tasks(&self, tasks: &[Task]) {
        (**self).save_tasks(tasks)
    }

    fn load_column_order(&self) -> Option<Vec<TaskStatus>> {
        (**self).load_column_order()
    }

    fn save_column_order(&self, order: &[TaskStatus]) {
        (**self).save_column_order(order)
    }

    fn generate_id(&self) -> TaskId {
        (**self).generate_id()
    }
}
