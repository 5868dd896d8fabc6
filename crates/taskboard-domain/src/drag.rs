//! Drag-and-drop gesture state machine.
//!
//! Gesture recognition (pointer or keyboard) is reduced to a small set of
//! calls: press, move, release for pointers, and `on_drag_start` /
//! `on_drag_over` / `on_drag_end` for anything that already knows a drag
//! has begun. A drop applies at most one `move_task` to the store.

use crate::persistence::TaskPersistence;
use crate::store::TaskStore;
use crate::task::{TaskId, TaskStatus};

/// Pointer travel before a press turns into a drag, in pixels.
pub const DEFAULT_ACTIVATION_DISTANCE: f64 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    fn distance_to(self, other: Point) -> f64 {
        let dx = f64::from(self.x - other.x);
        let dy = f64::from(self.y - other.y);
        (dx * dx + dy * dy).sqrt()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    /// Pointer is down on a task but has not travelled far enough to drag.
    Pressed { task_id: TaskId, origin: Point },
    Dragging {
        task_id: TaskId,
        over: Option<TaskStatus>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragOutcome {
    /// The task was dropped on a column and its status was set.
    Moved {
        task_id: TaskId,
        from: TaskStatus,
        to: TaskStatus,
    },
    /// The drag ended without a valid drop target; nothing changed.
    Cancelled { task_id: TaskId },
    /// The press was released before the activation distance.
    Click { task_id: TaskId },
    /// The event did not belong to an active gesture.
    Ignored,
}

#[derive(Debug, Clone)]
pub struct DragController {
    state: DragState,
    activation_distance: f64,
}

impl Default for DragController {
    fn default() -> Self {
        Self::new(DEFAULT_ACTIVATION_DISTANCE)
    }
}

impl DragController {
    pub fn new(activation_distance: f64) -> Self {
        Self {
            state: DragState::Idle,
            activation_distance,
        }
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// The task being dragged, for overlay rendering.
    pub fn active_task(&self) -> Option<&TaskId> {
        match &self.state {
            DragState::Dragging { task_id, .. } => Some(task_id),
            _ => None,
        }
    }

    /// The column currently under the dragged task, for highlighting.
    pub fn drop_target(&self) -> Option<TaskStatus> {
        match &self.state {
            DragState::Dragging { over, .. } => *over,
            _ => None,
        }
    }

    /// Enters `Dragging` for a task that exists in the store. Rejected while
    /// another drag is active.
    pub fn on_drag_start<P: TaskPersistence>(
        &mut self,
        store: &TaskStore<P>,
        task_id: &TaskId,
    ) -> bool {
        if self.is_dragging() {
            tracing::warn!("Drag start for {} rejected: a drag is already active", task_id);
            return false;
        }
        let Some(task) = store.get(task_id) else {
            tracing::debug!("Drag start for unknown task {} ignored", task_id);
            self.state = DragState::Idle;
            return false;
        };
        tracing::debug!("Drag started for {}", task_id);
        self.state = DragState::Dragging {
            task_id: task_id.clone(),
            over: Some(task.status),
        };
        true
    }

    /// Updates the candidate drop target. Presentation only; the store is
    /// never touched here.
    pub fn on_drag_over(&mut self, target: Option<&str>) {
        if let DragState::Dragging { over, .. } = &mut self.state {
            *over = target.and_then(|id| id.parse().ok());
        }
    }

    /// Typed form of [`on_drag_over`](Self::on_drag_over).
    pub fn hover(&mut self, target: Option<TaskStatus>) {
        if let DragState::Dragging { over, .. } = &mut self.state {
            *over = target;
        }
    }

    /// Ends the drag for `task_id`. A target that resolves to another column
    /// moves the task exactly once; dropping back on its own column reports
    /// `from == to` without writing. Anything else leaves the store as it
    /// was. The controller is idle afterwards either way.
    pub fn on_drag_end<P: TaskPersistence>(
        &mut self,
        store: &mut TaskStore<P>,
        task_id: &TaskId,
        target: Option<&str>,
    ) -> DragOutcome {
        let active = match std::mem::take(&mut self.state) {
            DragState::Dragging { task_id: active, .. } => active,
            _ => return DragOutcome::Ignored,
        };
        if &active != task_id {
            tracing::warn!("Drag end for {} does not match active drag {}", task_id, active);
            return DragOutcome::Cancelled { task_id: active };
        }

        let Some(to) = target.and_then(|id| id.parse::<TaskStatus>().ok()) else {
            tracing::debug!("Drag of {} ended without a column target", active);
            return DragOutcome::Cancelled { task_id: active };
        };
        let Some(from) = store.get(&active).map(|t| t.status) else {
            return DragOutcome::Cancelled { task_id: active };
        };

        if from == to || store.move_task_to(&active, to) {
            DragOutcome::Moved {
                task_id: active,
                from,
                to,
            }
        } else {
            DragOutcome::Cancelled { task_id: active }
        }
    }

    /// Drops the active task on whatever column it is hovering.
    pub fn drop_on_hovered<P: TaskPersistence>(&mut self, store: &mut TaskStore<P>) -> DragOutcome {
        match &self.state {
            DragState::Dragging { task_id, over } => {
                let task_id = task_id.clone();
                let target = over.map(TaskStatus::as_str);
                self.on_drag_end(store, &task_id, target)
            }
            _ => DragOutcome::Ignored,
        }
    }

    /// Abandons any gesture without touching the store.
    pub fn cancel(&mut self) -> DragOutcome {
        match std::mem::take(&mut self.state) {
            DragState::Dragging { task_id, .. } => DragOutcome::Cancelled { task_id },
            DragState::Pressed { task_id, .. } => DragOutcome::Click { task_id },
            DragState::Idle => DragOutcome::Ignored,
        }
    }

    /// Records a press on a task. Ignored while a drag is active.
    pub fn pointer_down(&mut self, task_id: TaskId, at: Point) {
        if self.is_dragging() {
            tracing::warn!("Pointer press on {} ignored: a drag is already active", task_id);
            return;
        }
        self.state = DragState::Pressed {
            task_id,
            origin: at,
        };
    }

    /// Promotes a press to a drag once the pointer has travelled the
    /// activation distance. Returns true on the move that starts the drag.
    pub fn pointer_move<P: TaskPersistence>(&mut self, store: &TaskStore<P>, at: Point) -> bool {
        let DragState::Pressed { task_id, origin } = &self.state else {
            return false;
        };
        if origin.distance_to(at) < self.activation_distance {
            return false;
        }
        let task_id = task_id.clone();
        self.state = DragState::Idle;
        self.on_drag_start(store, &task_id)
    }

    /// Releases the pointer over `target`.
    pub fn pointer_up<P: TaskPersistence>(
        &mut self,
        store: &mut TaskStore<P>,
        target: Option<&str>,
    ) -> DragOutcome {
        match &self.state {
            DragState::Idle => DragOutcome::Ignored,
            DragState::Pressed { task_id, .. } => {
                let task_id = task_id.clone();
                self.state = DragState::Idle;
                DragOutcome::Click { task_id }
            }
            DragState::Dragging { task_id, .. } => {
                let task_id = task_id.clone();
                self.on_drag_end(store, &task_id, target)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Task;
    use std::cell::{Cell, RefCell};

    #[derive(Default)]
    struct CountingPersistence {
        writes: Cell<usize>,
        tasks: RefCell<Vec<Task>>,
    }

    impl TaskPersistence for CountingPersistence {
        fn load_tasks(&self) -> Vec<Task> {
            self.tasks.borrow().clone()
        }

        fn save_tasks(&self, tasks: &[Task]) {
            self.writes.set(self.writes.get() + 1);
            *self.tasks.borrow_mut() = tasks.to_vec();
        }

        fn load_column_order(&self) -> Option<Vec<TaskStatus>> {
            None
        }

        fn save_column_order(&self, _order: &[TaskStatus]) {}
    }

    fn store_with_task() -> (TaskStore<CountingPersistence>, TaskId) {
        let mut store = TaskStore::open(CountingPersistence::default());
        let task = store.add_task(TaskStatus::Todo, "Drag me", "").unwrap();
        (store, task.id)
    }

    fn writes(store: &TaskStore<CountingPersistence>) -> usize {
        store.persistence().writes.get()
    }

    #[test]
    fn test_drop_on_column_moves_once() {
        let (mut store, id) = store_with_task();
        let mut drag = DragController::default();
        let before = writes(&store);

        assert!(drag.on_drag_start(&store, &id));
        drag.on_drag_over(Some("in-progress"));
        assert_eq!(drag.drop_target(), Some(TaskStatus::InProgress));

        let outcome = drag.on_drag_end(&mut store, &id, Some("done"));

        assert_eq!(
            outcome,
            DragOutcome::Moved {
                task_id: id.clone(),
                from: TaskStatus::Todo,
                to: TaskStatus::Done
            }
        );
        assert_eq!(store.get(&id).unwrap().status, TaskStatus::Done);
        assert_eq!(writes(&store), before + 1);
        assert_eq!(drag.state(), &DragState::Idle);
    }

    #[test]
    fn test_drop_on_own_column_does_not_write() {
        let (mut store, id) = store_with_task();
        let mut drag = DragController::default();
        let before = writes(&store);

        assert!(drag.on_drag_start(&store, &id));
        let outcome = drag.drop_on_hovered(&mut store);

        assert_eq!(
            outcome,
            DragOutcome::Moved {
                task_id: id.clone(),
                from: TaskStatus::Todo,
                to: TaskStatus::Todo
            }
        );
        assert_eq!(writes(&store), before);
        assert_eq!(drag.state(), &DragState::Idle);
    }

    #[test]
    fn test_drop_without_target_does_not_mutate() {
        let (mut store, id) = store_with_task();
        let mut drag = DragController::default();
        let before = writes(&store);

        drag.on_drag_start(&store, &id);
        let outcome = drag.on_drag_end(&mut store, &id, None);

        assert_eq!(outcome, DragOutcome::Cancelled { task_id: id.clone() });
        assert_eq!(writes(&store), before);
        assert!(drag.active_task().is_none());
    }

    #[test]
    fn test_drop_on_invalid_target_does_not_mutate() {
        let (mut store, id) = store_with_task();
        let mut drag = DragController::default();
        let before = store.tasks().to_vec();

        drag.on_drag_start(&store, &id);
        drag.on_drag_end(&mut store, &id, Some(id.as_str()));

        assert_eq!(store.tasks(), before.as_slice());
        assert_eq!(drag.state(), &DragState::Idle);
    }

    #[test]
    fn test_drag_start_requires_existing_task() {
        let (store, _) = store_with_task();
        let mut drag = DragController::default();

        assert!(!drag.on_drag_start(&store, &TaskId::new("nope")));
        assert_eq!(drag.state(), &DragState::Idle);
    }

    #[test]
    fn test_second_drag_start_is_rejected() {
        let (mut store, first) = store_with_task();
        let second = store.add_task(TaskStatus::Done, "Other", "").unwrap().id;
        let mut drag = DragController::default();

        assert!(drag.on_drag_start(&store, &first));
        assert!(!drag.on_drag_start(&store, &second));
        assert_eq!(drag.active_task(), Some(&first));
    }

    #[test]
    fn test_press_below_threshold_is_a_click() {
        let (mut store, id) = store_with_task();
        let mut drag = DragController::new(8.0);
        let before = writes(&store);

        drag.pointer_down(id.clone(), Point::new(10, 10));
        assert!(!drag.pointer_move(&store, Point::new(14, 13)));
        assert!(!drag.is_dragging());

        let outcome = drag.pointer_up(&mut store, Some("done"));
        assert_eq!(outcome, DragOutcome::Click { task_id: id.clone() });
        assert_eq!(store.get(&id).unwrap().status, TaskStatus::Todo);
        assert_eq!(writes(&store), before);
    }

    #[test]
    fn test_press_past_threshold_starts_drag() {
        let (mut store, id) = store_with_task();
        let mut drag = DragController::new(8.0);

        drag.pointer_down(id.clone(), Point::new(0, 0));
        assert!(drag.pointer_move(&store, Point::new(8, 0)));
        assert!(drag.is_dragging());

        let outcome = drag.pointer_up(&mut store, Some("in-progress"));
        assert!(matches!(outcome, DragOutcome::Moved { to: TaskStatus::InProgress, .. }));
    }

    #[test]
    fn test_mismatched_drag_end_cancels() {
        let (mut store, id) = store_with_task();
        let mut drag = DragController::default();
        let before = store.tasks().to_vec();

        drag.on_drag_start(&store, &id);
        let outcome = drag.on_drag_end(&mut store, &TaskId::new("other"), Some("done"));

        assert_eq!(outcome, DragOutcome::Cancelled { task_id: id });
        assert_eq!(store.tasks(), before.as_slice());
        assert_eq!(drag.state(), &DragState::Idle);
    }

    #[test]
    fn test_drag_end_while_idle_is_ignored() {
        let (mut store, id) = store_with_task();
        let mut drag = DragController::default();
        assert_eq!(drag.on_drag_end(&mut store, &id, Some("done")), DragOutcome::Ignored);
    }

    #[test]
    fn test_keyboard_drop_on_hovered_column() {
        let (mut store, id) = store_with_task();
        let mut drag = DragController::default();

        drag.on_drag_start(&store, &id);
        assert_eq!(drag.drop_target(), Some(TaskStatus::Todo));
        drag.hover(Some(TaskStatus::Done));

        let outcome = drag.drop_on_hovered(&mut store);
        assert!(matches!(outcome, DragOutcome::Moved { to: TaskStatus::Done, .. }));
    }

    #[test]
    fn test_cancel_leaves_store_untouched() {
        let (store, id) = store_with_task();
        let mut drag = DragController::default();
        let before = writes(&store);

        drag.on_drag_start(&store, &id);
        drag.hover(Some(TaskStatus::Done));
        assert_eq!(drag.cancel(), DragOutcome::Cancelled { task_id: id });
        assert_eq!(writes(&store), before);
        assert_eq!(drag.state(), &DragState::Idle);
    }
}
