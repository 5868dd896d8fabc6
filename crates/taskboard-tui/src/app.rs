use crate::dialog::{handle_confirm_input, handle_dialog_input, DialogAction};
use crate::events::{Event, EventHandler};
use crate::form::{FormAction, FormKind, FormPresentation, FormSubmission, TaskForm};
use crate::ui::{self, HitMap};
use crossterm::event::{
    DisableMouseCapture, EnableMouseCapture, KeyCode, KeyEvent, KeyModifiers, MouseButton,
    MouseEvent, MouseEventKind,
};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::collections::HashMap;
use std::io;
use std::time::{Duration, Instant};
use taskboard_core::{AppConfig, InputState, KanbanError, KanbanResult, SelectionState};
use taskboard_domain::{
    project, BoardView, DragController, DragOutcome, Point, TaskId, TaskPersistence, TaskStatus,
    TaskStore,
};

pub type BoardStore = TaskStore<Box<dyn TaskPersistence>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppMode {
    Normal,
    Search,
    Form,
    ConfirmDelete,
    Detail,
}

pub struct App {
    pub should_quit: bool,
    pub mode: AppMode,
    pub store: BoardStore,
    pub search: InputState,
    /// Index into the column order.
    pub focused_column: usize,
    pub selections: HashMap<TaskStatus, SelectionState>,
    pub drag: DragController,
    pub form: Option<TaskForm>,
    pub pending_delete: Option<TaskId>,
    pub detail: Option<TaskId>,
    pub status_message: Option<String>,
    pub hit_map: HitMap,
    submit_delay: Duration,
}

impl App {
    pub fn new(store: BoardStore, config: &AppConfig) -> Self {
        let mut app = Self {
            should_quit: false,
            mode: AppMode::Normal,
            store,
            search: InputState::new(),
            focused_column: 0,
            selections: HashMap::new(),
            drag: DragController::new(f64::from(config.effective_drag_activation_distance())),
            form: None,
            pending_delete: None,
            detail: None,
            status_message: None,
            hit_map: HitMap::default(),
            submit_delay: config.effective_submit_delay(),
        };
        app.sync_selections();
        app
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn view(&self) -> BoardView<'_> {
        project(self.store.tasks(), &self.store.columns(), &self.search.text())
    }

    pub fn focused_status(&self) -> TaskStatus {
        self.store
            .column_order()
            .get(self.focused_column)
            .unwrap_or_else(|| self.store.column_order().first())
    }

    fn visible_ids(&self, status: TaskStatus) -> Vec<TaskId> {
        self.view()
            .tasks_in(status)
            .iter()
            .map(|t| t.id.clone())
            .collect()
    }

    pub fn selected_task_id(&self) -> Option<TaskId> {
        let status = self.focused_status();
        let index = self.selections.get(&status)?.get()?;
        self.visible_ids(status).into_iter().nth(index)
    }

    fn select_task(&mut self, id: &TaskId) {
        let Some(status) = self.store.get(id).map(|t| t.status) else {
            return;
        };
        let ids = self.visible_ids(status);
        if let Some(index) = ids.iter().position(|t| t == id) {
            self.focused_column = self.store.column_order().position(status);
            self.selections.entry(status).or_default().set(Some(index));
        }
    }

    /// Clamps every column's selection to what is currently visible.
    fn sync_selections(&mut self) {
        for status in TaskStatus::ALL {
            let len = self.visible_ids(status).len();
            self.selections.entry(status).or_default().sync(len);
        }
    }

    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Tick => self.on_tick(Instant::now()),
            Event::Resize => {}
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.quit();
            return;
        }

        match self.mode {
            AppMode::Normal => self.handle_normal_key(key),
            AppMode::Search => self.handle_search_key(key.code),
            AppMode::Form => self.handle_form_key(key.code, Instant::now()),
            AppMode::ConfirmDelete => self.handle_confirm_key(key.code),
            AppMode::Detail => self.handle_detail_key(key.code),
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) {
        if self.drag.is_dragging() {
            self.handle_drag_key(key.code);
            return;
        }

        self.status_message = None;
        match key.code {
            KeyCode::Char('q') => self.quit(),
            KeyCode::Char('h') | KeyCode::Left => {
                self.focused_column = self.focused_column.saturating_sub(1);
            }
            KeyCode::Char('l') | KeyCode::Right => {
                let last = self.store.column_order().len().saturating_sub(1);
                self.focused_column = (self.focused_column + 1).min(last);
            }
            KeyCode::Char('j') | KeyCode::Down => {
                let status = self.focused_status();
                let len = self.visible_ids(status).len();
                self.selections.entry(status).or_default().next(len);
            }
            KeyCode::Char('k') | KeyCode::Up => {
                let status = self.focused_status();
                if !self.visible_ids(status).is_empty() {
                    self.selections.entry(status).or_default().prev();
                }
            }
            KeyCode::Char('a') => {
                let status = self.focused_status();
                self.open_create_form(status, FormPresentation::Modal);
            }
            KeyCode::Char('n') => self.open_create_form(TaskStatus::Todo, FormPresentation::FullScreen),
            KeyCode::Char('N') => self.open_create_form(TaskStatus::Todo, FormPresentation::QuickPanel),
            KeyCode::Char('e') => self.open_edit_form(),
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(id) = self.selected_task_id() {
                    self.pending_delete = Some(id);
                    self.mode = AppMode::ConfirmDelete;
                }
            }
            KeyCode::Char('/') => self.mode = AppMode::Search,
            KeyCode::Char('m') | KeyCode::Char(' ') => {
                if let Some(id) = self.selected_task_id() {
                    self.drag.on_drag_start(&self.store, &id);
                }
            }
            KeyCode::Enter => {
                if let Some(id) = self.selected_task_id() {
                    self.detail = Some(id);
                    self.mode = AppMode::Detail;
                }
            }
            KeyCode::Char('<') => self.shift_focused_column(false),
            KeyCode::Char('>') => self.shift_focused_column(true),
            KeyCode::Esc => {
                if !self.search.is_empty() {
                    self.search.clear();
                    self.sync_selections();
                }
            }
            _ => {}
        }
    }

    /// Keyboard sensor: choose a column for the picked-up task, then drop
    /// or cancel.
    fn handle_drag_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('h') | KeyCode::Left => self.step_drop_target(false),
            KeyCode::Char('l') | KeyCode::Right => self.step_drop_target(true),
            KeyCode::Enter | KeyCode::Char('m') | KeyCode::Char(' ') => {
                let outcome = self.drag.drop_on_hovered(&mut self.store);
                self.report(outcome);
            }
            KeyCode::Esc | KeyCode::Char('q') => {
                let outcome = self.drag.cancel();
                self.report(outcome);
            }
            _ => {}
        }
    }

    fn step_drop_target(&mut self, forward: bool) {
        let order = self.store.column_order();
        let current = self
            .drag
            .drop_target()
            .map(|s| order.position(s))
            .unwrap_or(self.focused_column);
        let next = if forward {
            (current + 1).min(order.len().saturating_sub(1))
        } else {
            current.saturating_sub(1)
        };
        let target = order.get(next);
        self.drag.hover(target);
        self.focused_column = next;
    }

    fn shift_focused_column(&mut self, right: bool) {
        let status = self.focused_status();
        let index = self.store.column_order().position(status);
        let new_index = if right {
            index + 1
        } else if index == 0 {
            return;
        } else {
            index - 1
        };
        if self.store.reorder_column(status, new_index) {
            self.focused_column = self.store.column_order().position(status);
        }
    }

    fn handle_search_key(&mut self, code: KeyCode) {
        match handle_dialog_input(&mut self.search, code, true) {
            DialogAction::Confirm => self.mode = AppMode::Normal,
            DialogAction::Cancel => {
                self.search.clear();
                self.mode = AppMode::Normal;
            }
            DialogAction::None => {}
        }
        self.sync_selections();
    }

    fn open_create_form(&mut self, status: TaskStatus, presentation: FormPresentation) {
        self.form = Some(TaskForm::create(status, presentation, self.submit_delay));
        self.mode = AppMode::Form;
    }

    fn open_edit_form(&mut self) {
        let Some(task) = self.selected_task_id().and_then(|id| self.store.get(&id)) else {
            return;
        };
        self.form = Some(TaskForm::edit(task, self.submit_delay));
        self.mode = AppMode::Form;
    }

    fn close_form(&mut self) {
        self.form = None;
        self.mode = AppMode::Normal;
    }

    pub fn handle_form_key(&mut self, code: KeyCode, now: Instant) {
        let Some(form) = self.form.as_mut() else {
            self.mode = AppMode::Normal;
            return;
        };
        if form.handle_key(code, now) == FormAction::Cancel {
            self.close_form();
        }
    }

    fn handle_confirm_key(&mut self, code: KeyCode) {
        match handle_confirm_input(code) {
            DialogAction::Confirm => {
                if let Some(id) = self.pending_delete.take() {
                    self.store.delete_task(&id);
                    self.status_message = Some("Task deleted".to_string());
                    self.sync_selections();
                }
                self.mode = AppMode::Normal;
            }
            DialogAction::Cancel => {
                self.pending_delete = None;
                self.mode = AppMode::Normal;
            }
            DialogAction::None => {}
        }
    }

    fn handle_detail_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => {
                self.detail = None;
                self.mode = AppMode::Normal;
            }
            KeyCode::Char('e') => {
                self.detail = None;
                self.open_edit_form();
            }
            _ => {}
        }
    }

    /// Completes a form whose save delay has elapsed.
    pub fn on_tick(&mut self, now: Instant) {
        let Some(submission) = self.form.as_mut().and_then(|f| f.poll(now)) else {
            return;
        };
        match self.apply_submission(submission) {
            Ok(id) => {
                self.close_form();
                self.sync_selections();
                self.select_task(&id);
            }
            Err(KanbanError::Validation(message)) => {
                if let Some(form) = self.form.as_mut() {
                    form.reject(message);
                }
            }
            Err(e) => {
                tracing::warn!("Form submission dropped: {}", e);
                self.status_message = Some(e.to_string());
                self.close_form();
            }
        }
    }

    fn apply_submission(&mut self, submission: FormSubmission) -> KanbanResult<TaskId> {
        match &submission.kind {
            FormKind::Create(status) => {
                let task = self
                    .store
                    .add_task(*status, &submission.title, &submission.description)?;
                if submission.priority.is_some() {
                    self.store
                        .update_task(task.clone().with_priority(submission.priority))?;
                }
                Ok(task.id)
            }
            FormKind::Edit(id) => {
                let current = self
                    .store
                    .get(id)
                    .ok_or_else(|| KanbanError::NotFound(format!("task {}", id)))?;
                let updated = submission.apply_to(current);
                self.store.update_task(updated)?;
                Ok(id.clone())
            }
        }
    }

    /// Pointer sensor over the last rendered layout.
    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        if self.mode != AppMode::Normal {
            return;
        }
        let point = Point::new(i32::from(mouse.column), i32::from(mouse.row));
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(id) = self.hit_map.task_at(mouse.column, mouse.row).cloned() {
                    self.select_task(&id);
                    self.drag.pointer_down(id, point);
                } else if let Some(status) = self.hit_map.column_at(mouse.column, mouse.row) {
                    self.focused_column = self.store.column_order().position(status);
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                self.drag.pointer_move(&self.store, point);
                if self.drag.is_dragging() {
                    let over = self.hit_map.column_at(mouse.column, mouse.row);
                    self.drag.hover(over);
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let target = self.hit_map.column_at(mouse.column, mouse.row);
                let outcome = self
                    .drag
                    .pointer_up(&mut self.store, target.map(TaskStatus::as_str));
                self.report(outcome);
            }
            _ => {}
        }
    }

    fn report(&mut self, outcome: DragOutcome) {
        match outcome {
            DragOutcome::Moved { from, to, .. } if from == to => {
                self.status_message = Some("No change".to_string());
            }
            DragOutcome::Moved { task_id, to, .. } => {
                self.sync_selections();
                self.select_task(&task_id);
                let title = self
                    .store
                    .get(&task_id)
                    .map(|t| t.title.clone())
                    .unwrap_or_default();
                self.status_message = Some(format!(
                    "Moved '{}' to {}",
                    title,
                    taskboard_domain::Column::for_status(to).title
                ));
            }
            DragOutcome::Cancelled { .. } => {
                self.status_message = Some("Drag cancelled".to_string());
            }
            DragOutcome::Click { .. } | DragOutcome::Ignored => {}
        }
    }

    pub async fn run(&mut self) -> KanbanResult<()> {
        let mut terminal = setup_terminal()?;
        let mut events = EventHandler::new();

        let result = self.event_loop(&mut terminal, &mut events).await;

        events.stop();
        restore_terminal(&mut terminal)?;
        result
    }

    async fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
        events: &mut EventHandler,
    ) -> KanbanResult<()> {
        while !self.should_quit {
            let mut hit_map = HitMap::default();
            terminal.draw(|frame| hit_map = ui::render(self, frame))?;
            self.hit_map = hit_map;

            match events.next().await {
                Some(event) => self.handle_event(event),
                None => break,
            }
        }
        Ok(())
    }
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>, io::Error> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<(), io::Error> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

/// Leaves the alternate screen and prints a short error screen if the UI
/// panics, instead of leaving the terminal in raw mode.
pub fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        tracing::error!("Board crashed: {}", info);
        eprintln!("Something went wrong");
        eprintln!("The board hit an unexpected error and closed. Saved tasks are kept; restart to continue.");
        default_hook(info);
    }));
}
