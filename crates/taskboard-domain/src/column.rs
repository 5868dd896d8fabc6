use crate::task::TaskStatus;
use serde::Serialize;

/// A fixed board column. Columns are configuration, not user data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Column {
    pub id: TaskStatus,
    pub title: &'static str,
}

pub const COLUMNS: [Column; 3] = [
    Column {
        id: TaskStatus::Todo,
        title: "To Do",
    },
    Column {
        id: TaskStatus::InProgress,
        title: "In Progress",
    },
    Column {
        id: TaskStatus::Done,
        title: "Done",
    },
];

impl Column {
    pub fn for_status(status: TaskStatus) -> Column {
        match status {
            TaskStatus::Todo => COLUMNS[0],
            TaskStatus::InProgress => COLUMNS[1],
            TaskStatus::Done => COLUMNS[2],
        }
    }
}

/// Display order of the columns: always a permutation of every status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnOrder(Vec<TaskStatus>);

impl Default for ColumnOrder {
    fn default() -> Self {
        Self(TaskStatus::ALL.to_vec())
    }
}

impl ColumnOrder {
    /// Accepts a stored order only if it names each column exactly once.
    pub fn from_statuses(statuses: Vec<TaskStatus>) -> Option<Self> {
        let is_permutation = statuses.len() == TaskStatus::ALL.len()
            && TaskStatus::ALL.iter().all(|s| statuses.contains(s));
        is_permutation.then_some(Self(statuses))
    }

    /// Parses raw column identifiers; any unknown id rejects the whole order.
    pub fn from_ids<S: AsRef<str>>(ids: &[S]) -> Option<Self> {
        let statuses = ids
            .iter()
            .map(|id| id.as_ref().parse::<TaskStatus>().ok())
            .collect::<Option<Vec<_>>>()?;
        Self::from_statuses(statuses)
    }

    pub fn statuses(&self) -> &[TaskStatus] {
        &self.0
    }

    pub fn columns(&self) -> impl Iterator<Item = Column> + '_ {
        self.0.iter().map(|status| Column::for_status(*status))
    }

    pub fn first(&self) -> TaskStatus {
        self.0[0]
    }

    pub fn position(&self, status: TaskStatus) -> usize {
        self.0
            .iter()
            .position(|s| *s == status)
            .unwrap_or_default()
    }

    pub fn get(&self, index: usize) -> Option<TaskStatus> {
        self.0.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Moves `status` to `new_index` (clamped), shifting the columns in
    /// between. Returns false when nothing moved.
    pub fn move_column(&mut self, status: TaskStatus, new_index: usize) -> bool {
        let from = self.position(status);
        let to = new_index.min(self.0.len() - 1);
        if from == to {
            return false;
        }
        let moved = self.0.remove(from);
        self.0.insert(to, moved);
        true
    }
}
