//! Single-selection state for the rows of one board column.

#[derive(Clone, Debug, Default)]
pub struct SelectionState {
    selected_index: Option<usize>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<usize> {
        self.selected_index
    }

    pub fn set(&mut self, index: Option<usize>) {
        self.selected_index = index;
    }

    pub fn clear(&mut self) {
        self.selected_index = None;
    }

    /// Move down one row, stopping at the last of `len` rows.
    pub fn next(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        self.selected_index = Some(match self.selected_index {
            Some(idx) => (idx + 1).min(len - 1),
            None => 0,
        });
    }

    /// Move up one row, stopping at the first.
    pub fn prev(&mut self) {
        self.selected_index = Some(self.selected_index.map_or(0, |idx| idx.saturating_sub(1)));
    }

    /// Keep the selection inside a list that now has `len` rows, selecting
    /// the first row if nothing was selected.
    pub fn sync(&mut self, len: usize) {
        self.selected_index = match (self.selected_index, len) {
            (_, 0) => None,
            (None, _) => Some(0),
            (Some(idx), len) => Some(idx.min(len - 1)),
        };
    }
}
