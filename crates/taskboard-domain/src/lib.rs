pub mod column;
pub mod drag;
pub mod persistence;
pub mod search;
pub mod store;
pub mod task;
pub mod view;

pub use column::{Column, ColumnOrder, COLUMNS};
pub use drag::{DragController, DragOutcome, DragState, Point};
pub use persistence::TaskPersistence;
pub use store::TaskStore;
pub use task::{Task, TaskId, TaskPriority, TaskStatus};
pub use view::{project, BoardView, ColumnView};
