//! Per-column, search-filtered view of the board.
//!
//! Computed fresh from the store on every render; nothing here is cached or
//! mutates the tasks it borrows.

use crate::column::Column;
use crate::search::{CompositeSearcher, TaskSearcher};
use crate::task::{Task, TaskStatus};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ColumnView<'a> {
    pub column: Column,
    pub tasks: Vec<&'a Task>,
}

#[derive(Debug, Serialize)]
pub struct BoardView<'a> {
    pub columns: Vec<ColumnView<'a>>,
    pub total_count: usize,
}

impl<'a> BoardView<'a> {
    pub fn column(&self, status: TaskStatus) -> Option<&ColumnView<'a>> {
        self.columns.iter().find(|c| c.column.id == status)
    }

    /// Visible tasks in the column for `status`, in store order.
    pub fn tasks_in(&self, status: TaskStatus) -> &[&'a Task] {
        self.column(status)
            .map(|c| c.tasks.as_slice())
            .unwrap_or_default()
    }

    pub fn visible_count(&self) -> usize {
        self.columns.iter().map(|c| c.tasks.len()).sum()
    }
}

/// Groups `tasks` under `columns` (in the given column order), keeping only
/// tasks whose title or description contains `query`, case-insensitively.
pub fn project<'a>(tasks: &'a [Task], columns: &[Column], query: &str) -> BoardView<'a> {
    let searcher = CompositeSearcher::all(query);
    let columns = columns
        .iter()
        .map(|column| ColumnView {
            column: *column,
            tasks: tasks
                .iter()
                .filter(|t| t.status == column.id && searcher.matches(t))
                .collect(),
        })
        .collect();
    BoardView {
        columns,
        total_count: tasks.len(),
    }
}
