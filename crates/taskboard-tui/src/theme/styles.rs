use super::colors::*;
use ratatui::style::{Modifier, Style};
use taskboard_domain::{TaskPriority, TaskStatus};

pub fn focused_border() -> Style {
    Style::default().fg(FOCUSED_BORDER)
}

pub fn unfocused_border() -> Style {
    Style::default().fg(UNFOCUSED_BORDER)
}

pub fn drop_target_border() -> Style {
    Style::default()
        .fg(DROP_TARGET_BORDER)
        .add_modifier(Modifier::BOLD)
}

pub fn selected_item(focused: bool) -> Style {
    if focused {
        Style::default().bg(SELECTED_BG)
    } else {
        Style::default()
    }
}

/// The card left behind in its column while it is being dragged.
pub fn drag_placeholder() -> Style {
    Style::default()
        .fg(LABEL_TEXT)
        .bg(DRAGGED_BG)
        .add_modifier(Modifier::DIM)
}

pub fn normal_text() -> Style {
    Style::default().fg(NORMAL_TEXT)
}

pub fn label_text() -> Style {
    Style::default().fg(LABEL_TEXT)
}

pub fn highlight_text() -> Style {
    Style::default().fg(HIGHLIGHT_TEXT)
}

pub fn bold_highlight() -> Style {
    Style::default()
        .fg(HIGHLIGHT_TEXT)
        .add_modifier(Modifier::BOLD)
}

pub fn error_text() -> Style {
    Style::default().fg(ERROR_COLOR)
}

pub fn status_dot(status: TaskStatus) -> Style {
    let color = match status {
        TaskStatus::Todo => STATUS_TODO,
        TaskStatus::InProgress => STATUS_IN_PROGRESS,
        TaskStatus::Done => STATUS_DONE,
    };
    Style::default().fg(color)
}

pub fn priority_style(priority: TaskPriority) -> Style {
    let color = match priority {
        TaskPriority::High => PRIORITY_HIGH,
        TaskPriority::Medium => PRIORITY_MEDIUM,
        TaskPriority::Low => PRIORITY_LOW,
    };
    Style::default().fg(color)
}

pub fn popup_bg() -> Style {
    Style::default().bg(POPUP_BG)
}
