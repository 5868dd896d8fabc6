//! Create and edit forms for a single task.
//!
//! A valid submit does not touch the store immediately: the form enters a
//! saving state for a short delay, ignores every key and further submits
//! while saving, and hands back exactly one [`FormSubmission`] once the
//! delay has elapsed.

use crate::dialog::{handle_dialog_input, DialogAction};
use crossterm::event::KeyCode;
use std::time::{Duration, Instant};
use taskboard_core::InputState;
use taskboard_domain::{Task, TaskId, TaskPriority, TaskStatus};

pub const TITLE_REQUIRED: &str = "Title is required";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormKind {
    Create(TaskStatus),
    Edit(TaskId),
}

/// How a create form is shown. Edit forms are always modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPresentation {
    /// Centered over the board, opened from a column.
    Modal,
    FullScreen,
    /// Small panel in the corner of the board.
    QuickPanel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Description,
    Priority,
}

impl FormField {
    fn next(self) -> Self {
        match self {
            Self::Title => Self::Description,
            Self::Description => Self::Priority,
            Self::Priority => Self::Title,
        }
    }

    fn prev(self) -> Self {
        match self {
            Self::Title => Self::Priority,
            Self::Description => Self::Title,
            Self::Priority => Self::Description,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    None,
    Cancel,
    /// Validation passed; the form is now saving.
    Submitted,
    /// Validation failed; the error is shown inline.
    Invalid,
    /// A submit or key arrived while already saving.
    Ignored,
}

/// Values captured from a form whose save delay has elapsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSubmission {
    pub kind: FormKind,
    pub title: String,
    pub description: String,
    pub priority: Option<TaskPriority>,
}

impl FormSubmission {
    /// Applies the edited fields to `task`, keeping its id, status and
    /// creation time.
    pub fn apply_to(&self, task: &Task) -> Task {
        Task {
            title: self.title.clone(),
            description: self.description.clone(),
            priority: self.priority,
            ..task.clone()
        }
    }
}

#[derive(Debug, Clone)]
pub struct TaskForm {
    pub kind: FormKind,
    pub presentation: FormPresentation,
    pub title: InputState,
    pub description: InputState,
    pub priority: Option<TaskPriority>,
    pub focus: FormField,
    pub error: Option<String>,
    saving_until: Option<Instant>,
    delay: Duration,
}

impl TaskForm {
    pub fn create(status: TaskStatus, presentation: FormPresentation, delay: Duration) -> Self {
        Self {
            kind: FormKind::Create(status),
            presentation,
            title: InputState::new(),
            description: InputState::new(),
            priority: None,
            focus: FormField::Title,
            error: None,
            saving_until: None,
            delay,
        }
    }

    pub fn edit(task: &Task, delay: Duration) -> Self {
        Self {
            kind: FormKind::Edit(task.id.clone()),
            presentation: FormPresentation::Modal,
            title: InputState::with_text(&task.title),
            description: InputState::with_text(&task.description),
            priority: task.priority,
            focus: FormField::Title,
            error: None,
            saving_until: None,
            delay,
        }
    }

    pub fn heading(&self) -> &'static str {
        match (&self.kind, self.presentation) {
            (FormKind::Edit(_), _) => "Edit Task",
            (FormKind::Create(_), FormPresentation::QuickPanel) => "Quick Add",
            (FormKind::Create(_), _) => "Add Task",
        }
    }

    pub fn is_saving(&self) -> bool {
        self.saving_until.is_some()
    }

    pub fn focused_input(&self) -> Option<&InputState> {
        match self.focus {
            FormField::Title => Some(&self.title),
            FormField::Description => Some(&self.description),
            FormField::Priority => None,
        }
    }

    pub fn handle_key(&mut self, key: KeyCode, now: Instant) -> FormAction {
        if self.is_saving() {
            return FormAction::Ignored;
        }
        match key {
            KeyCode::Tab | KeyCode::Down => {
                self.focus = self.focus.next();
                FormAction::None
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus = self.focus.prev();
                FormAction::None
            }
            KeyCode::Enter => self.submit(now),
            KeyCode::Esc => FormAction::Cancel,
            _ if self.focus == FormField::Priority => {
                match key {
                    KeyCode::Left | KeyCode::Char('h') => self.priority = cycle_priority(self.priority, false),
                    KeyCode::Right | KeyCode::Char('l') | KeyCode::Char(' ') => {
                        self.priority = cycle_priority(self.priority, true)
                    }
                    _ => {}
                }
                FormAction::None
            }
            _ => {
                let input = match self.focus {
                    FormField::Description => &mut self.description,
                    _ => &mut self.title,
                };
                if let DialogAction::Cancel = handle_dialog_input(input, key, true) {
                    return FormAction::Cancel;
                }
                if self.focus == FormField::Title && self.error.is_some() && !self.title.is_blank() {
                    self.error = None;
                }
                FormAction::None
            }
        }
    }

    pub fn submit(&mut self, now: Instant) -> FormAction {
        if self.is_saving() {
            tracing::debug!("Submit ignored while saving");
            return FormAction::Ignored;
        }
        if self.title.is_blank() {
            self.error = Some(TITLE_REQUIRED.to_string());
            self.focus = FormField::Title;
            return FormAction::Invalid;
        }
        self.error = None;
        self.saving_until = Some(now + self.delay);
        FormAction::Submitted
    }

    /// Returns the submission once the save delay has passed. Yields at most
    /// once per accepted submit.
    pub fn poll(&mut self, now: Instant) -> Option<FormSubmission> {
        let deadline = self.saving_until?;
        if now < deadline {
            return None;
        }
        self.saving_until = None;
        Some(FormSubmission {
            kind: self.kind.clone(),
            title: self.title.trimmed(),
            description: self.description.trimmed(),
            priority: self.priority,
        })
    }

    /// Re-opens the form after the store rejected a submission.
    pub fn reject(&mut self, message: impl Into<String>) {
        self.saving_until = None;
        self.error = Some(message.into());
    }
}

fn cycle_priority(current: Option<TaskPriority>, forward: bool) -> Option<TaskPriority> {
    let options = [
        None,
        Some(TaskPriority::Low),
        Some(TaskPriority::Medium),
        Some(TaskPriority::High),
    ];
    let index = options.iter().position(|p| *p == current).unwrap_or(0);
    let next = if forward {
        (index + 1) % options.len()
    } else {
        (index + options.len() - 1) % options.len()
    };
    options[next]
}
