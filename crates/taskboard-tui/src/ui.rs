use crate::app::{App, AppMode};
use crate::form::{FormField, FormPresentation, TaskForm};
use crate::popup::{bottom_right_rect, centered_rect, render_block_in, render_confirm_popup};
use crate::theme::*;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use taskboard_core::InputState;
use taskboard_domain::{ColumnView, Task, TaskId, TaskStatus};

const CARD_HEIGHT: u16 = 4;

/// Screen areas of the last rendered board, used to resolve pointer input.
#[derive(Debug, Clone, Default)]
pub struct HitMap {
    pub columns: Vec<(TaskStatus, Rect)>,
    pub cards: Vec<(TaskId, Rect)>,
}

impl HitMap {
    pub fn column_at(&self, x: u16, y: u16) -> Option<TaskStatus> {
        self.columns
            .iter()
            .find(|(_, area)| contains(*area, x, y))
            .map(|(status, _)| *status)
    }

    pub fn task_at(&self, x: u16, y: u16) -> Option<&TaskId> {
        self.cards
            .iter()
            .find(|(_, area)| contains(*area, x, y))
            .map(|(id, _)| id)
    }
}

fn contains(area: Rect, x: u16, y: u16) -> bool {
    x >= area.x && x < area.right() && y >= area.y && y < area.bottom()
}

/// Cursor cell for a bordered single-line input, kept inside the border.
fn input_cursor(area: Rect, offset: usize) -> (u16, u16) {
    let offset = u16::try_from(offset).unwrap_or(u16::MAX);
    let last_inner = area.right().saturating_sub(2).max(area.x);
    let x = area.x.saturating_add(1).saturating_add(offset).min(last_inner);
    (x, area.y.saturating_add(1))
}

pub fn render(app: &App, frame: &mut Frame) -> HitMap {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(frame.area());

    render_header(app, frame, chunks[0]);
    let hit_map = render_board(app, frame, chunks[1]);
    render_footer(app, frame, chunks[2]);

    match app.mode {
        AppMode::Form => {
            if let Some(form) = &app.form {
                render_form(form, frame, chunks[1]);
            }
        }
        AppMode::ConfirmDelete => {
            let title = app
                .pending_delete
                .as_ref()
                .and_then(|id| app.store.get(id))
                .map(|t| t.title.as_str())
                .unwrap_or_default();
            render_confirm_popup(
                frame,
                "Delete Task",
                &format!("Delete \"{}\"? This cannot be undone.", title),
            );
        }
        AppMode::Detail => {
            if let Some(task) = app.detail.as_ref().and_then(|id| app.store.get(id)) {
                render_detail(task, frame);
            }
        }
        AppMode::Normal | AppMode::Search => {}
    }

    hit_map
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let total = app.store.len();
    let summary = Line::from(vec![
        Span::styled("Task Board", bold_highlight()),
        Span::styled(format!("  {} tasks total", total), label_text()),
    ]);
    let header = Paragraph::new(summary).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(unfocused_border()),
    );
    frame.render_widget(header, chunks[0]);

    let searching = app.mode == AppMode::Search;
    let query = app.search.text();
    let search_line = if query.is_empty() && !searching {
        Line::from(Span::styled("/ to search", label_text()))
    } else {
        Line::from(Span::styled(query, normal_text()))
    };
    let search_box = Paragraph::new(search_line).block(
        Block::default()
            .title("Search")
            .borders(Borders::ALL)
            .border_style(if searching {
                focused_border()
            } else {
                unfocused_border()
            }),
    );
    frame.render_widget(search_box, chunks[1]);

    if searching {
        frame.set_cursor_position(input_cursor(chunks[1], app.search.cursor_pos()));
    }
}

fn render_board(app: &App, frame: &mut Frame, area: Rect) -> HitMap {
    let view = app.view();
    let mut hit_map = HitMap::default();
    if view.columns.is_empty() {
        return hit_map;
    }

    let constraints: Vec<Constraint> = view
        .columns
        .iter()
        .map(|_| Constraint::Ratio(1, view.columns.len() as u32))
        .collect();
    let areas = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    let focused = app.focused_status();
    for (column, column_area) in view.columns.iter().zip(areas.iter()) {
        hit_map.columns.push((column.column.id, *column_area));
        let cards = render_column(app, frame, column, *column_area, column.column.id == focused);
        hit_map.cards.extend(cards);
    }

    if let Some(task) = app.drag.active_task().and_then(|id| app.store.get(id)) {
        let target_area = app
            .drag
            .drop_target()
            .and_then(|status| hit_map.columns.iter().find(|(s, _)| *s == status))
            .map(|(_, r)| *r)
            .unwrap_or(area);
        render_drag_overlay(task, frame, target_area);
    }

    hit_map
}

fn render_column(
    app: &App,
    frame: &mut Frame,
    column: &ColumnView<'_>,
    area: Rect,
    focused: bool,
) -> Vec<(TaskId, Rect)> {
    let status = column.column.id;
    let is_drop_target = app.drag.drop_target() == Some(status);
    let border_style = if is_drop_target {
        drop_target_border()
    } else if focused {
        focused_border()
    } else {
        unfocused_border()
    };

    let title = Line::from(vec![
        Span::styled("● ", status_dot(status)),
        Span::styled(column.column.title, normal_text().add_modifier(Modifier::BOLD)),
        Span::styled(format!(" ({})", column.tasks.len()), label_text()),
    ]);
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if column.tasks.is_empty() {
        let empty = Paragraph::new("No tasks yet")
            .style(label_text())
            .alignment(Alignment::Center);
        let middle = Rect {
            y: inner.y + inner.height / 2,
            height: inner.height.min(1),
            ..inner
        };
        frame.render_widget(empty, middle);
        return Vec::new();
    }

    let selection = app.selections.get(&status).and_then(|s| s.get());
    let dragged = app.drag.active_task();
    let capacity = (inner.height / CARD_HEIGHT) as usize;
    let first = match selection {
        Some(index) if capacity > 0 && index >= capacity => index + 1 - capacity,
        _ => 0,
    };

    let mut cards = Vec::new();
    for (row, task) in column.tasks.iter().enumerate().skip(first).take(capacity) {
        let card_area = Rect {
            y: inner.y + (row - first) as u16 * CARD_HEIGHT,
            height: CARD_HEIGHT,
            ..inner
        };
        let selected = focused && selection == Some(row);
        let placeholder = dragged == Some(&task.id);
        render_card(task, frame, card_area, selected, placeholder);
        cards.push((task.id.clone(), card_area));
    }

    let hidden = column.tasks.len().saturating_sub(first + capacity);
    if hidden > 0 && inner.height > 0 {
        let more = Paragraph::new(format!("+{} more", hidden))
            .style(label_text())
            .alignment(Alignment::Right);
        let last_line = Rect {
            y: inner.bottom() - 1,
            height: 1,
            ..inner
        };
        frame.render_widget(more, last_line);
    }

    cards
}

fn card_lines(task: &Task) -> Vec<Line<'static>> {
    let mut title = vec![Span::styled(
        task.title.clone(),
        normal_text().add_modifier(Modifier::BOLD),
    )];
    if let Some(priority) = task.priority {
        title.push(Span::styled(
            format!(" [{}]", priority.as_str()),
            priority_style(priority),
        ));
    }
    let description = task.description.lines().next().unwrap_or_default().to_string();
    vec![
        Line::from(title),
        Line::from(Span::styled(description, label_text())),
    ]
}

fn render_card(task: &Task, frame: &mut Frame, area: Rect, selected: bool, placeholder: bool) {
    let style = if placeholder {
        drag_placeholder()
    } else {
        selected_item(selected)
    };
    let card = Paragraph::new(card_lines(task)).style(style).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(if selected { focused_border() } else { label_text() }),
    );
    frame.render_widget(card, area);
}

/// Floating copy of the dragged card, pinned to the bottom of the column
/// it would drop into.
fn render_drag_overlay(task: &Task, frame: &mut Frame, column_area: Rect) {
    let width = column_area.width.saturating_sub(4);
    let area = Rect {
        x: column_area.x + 2,
        y: column_area.bottom().saturating_sub(CARD_HEIGHT + 1),
        width,
        height: CARD_HEIGHT.min(column_area.height),
    };
    frame.render_widget(Clear, area);
    let overlay = Paragraph::new(card_lines(task)).style(popup_bg()).block(
        Block::default()
            .title("Moving")
            .borders(Borders::ALL)
            .border_style(drop_target_border()),
    );
    frame.render_widget(overlay, area);
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let hints = if app.drag.is_dragging() {
        "h/l: choose column | ENTER: drop | ESC: cancel"
    } else {
        match app.mode {
            AppMode::Normal => {
                "a: add | n: new | N: quick add | e: edit | d: delete | m: move | /: search | </>: reorder | q: quit"
            }
            AppMode::Search => "type to filter | ENTER: keep | ESC: clear",
            AppMode::Form => "TAB: next field | ENTER: save | ESC: cancel",
            AppMode::ConfirmDelete => "y: delete | n: keep",
            AppMode::Detail => "e: edit | ESC: close",
        }
    };

    let mut lines = vec![Line::from(Span::styled(hints, label_text()))];
    if let Some(message) = &app.status_message {
        lines.insert(0, Line::from(Span::styled(message.clone(), highlight_text())));
    }

    let footer = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(unfocused_border()),
    );
    frame.render_widget(footer, area);
}

fn form_area(form: &TaskForm, frame: &Frame, board_area: Rect) -> Rect {
    match form.presentation {
        FormPresentation::Modal => centered_rect(60, 60, frame.area()),
        FormPresentation::FullScreen => frame.area(),
        FormPresentation::QuickPanel => bottom_right_rect(50, 14, board_area),
    }
}

fn render_form(form: &TaskForm, frame: &mut Frame, board_area: Rect) {
    let area = form_area(form, frame, board_area);
    let heading = if form.is_saving() {
        format!("{} (saving...)", form.heading())
    } else {
        form.heading().to_string()
    };
    let inner = render_block_in(frame, area, &heading);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

    render_input(frame, chunks[0], "Title", &form.title, form.focus == FormField::Title, form.error.is_some());
    if let Some(error) = &form.error {
        frame.render_widget(Paragraph::new(error.as_str()).style(error_text()), chunks[1]);
    }
    render_input(
        frame,
        chunks[2],
        "Description (optional)",
        &form.description,
        form.focus == FormField::Description,
        false,
    );

    let priority = form.priority.map(|p| p.as_str()).unwrap_or("none");
    let priority_line = Line::from(vec![
        Span::styled("Priority: ", label_text()),
        Span::styled(
            format!("< {} >", priority),
            if form.focus == FormField::Priority {
                bold_highlight()
            } else {
                normal_text()
            },
        ),
    ]);
    frame.render_widget(Paragraph::new(priority_line), chunks[3]);

    if !form.is_saving() {
        let cursor_area = match form.focus {
            FormField::Title => Some(chunks[0]),
            FormField::Description => Some(chunks[2]),
            FormField::Priority => None,
        };
        if let (Some(area), Some(input)) = (cursor_area, form.focused_input()) {
            frame.set_cursor_position(input_cursor(area, input.cursor_pos()));
        }
    }
}

fn render_input(
    frame: &mut Frame,
    area: Rect,
    label: &str,
    input: &InputState,
    focused: bool,
    invalid: bool,
) {
    let border = if invalid {
        error_text()
    } else if focused {
        focused_border()
    } else {
        unfocused_border()
    };
    let widget = Paragraph::new(input.text()).style(normal_text()).block(
        Block::default()
            .title(label)
            .borders(Borders::ALL)
            .border_style(border),
    );
    frame.render_widget(widget, area);
}

fn render_detail(task: &Task, frame: &mut Frame) {
    let inner = render_block_in(frame, centered_rect(70, 70, frame.area()), &task.title);

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Status: ", label_text()),
            Span::styled(
                taskboard_domain::Column::for_status(task.status).title,
                status_dot(task.status),
            ),
        ]),
        Line::from(vec![
            Span::styled("Created: ", label_text()),
            Span::styled(
                task.created_at.format("%Y-%m-%d %H:%M").to_string(),
                normal_text(),
            ),
        ]),
    ];
    if let Some(priority) = task.priority {
        lines.push(Line::from(vec![
            Span::styled("Priority: ", label_text()),
            Span::styled(priority.as_str(), priority_style(priority)),
        ]));
    }
    lines.push(Line::from(""));
    if task.description.is_empty() {
        lines.push(Line::from(Span::styled("No description", label_text())));
    } else {
        lines.extend(task.description.lines().map(|l| Line::from(l.to_string())));
    }

    let body = Paragraph::new(lines).wrap(Wrap { trim: false });
    frame.render_widget(body, inner.inner(ratatui::layout::Margin::new(1, 0)));
}
