use crate::theme::{focused_border, label_text, normal_text, popup_bg};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// A fixed-height strip anchored to the bottom-right corner of `r`.
pub fn bottom_right_rect(width: u16, height: u16, r: Rect) -> Rect {
    let width = width.min(r.width);
    let height = height.min(r.height);
    Rect {
        x: r.x + r.width - width,
        y: r.y + r.height - height,
        width,
        height,
    }
}

/// Clears `area`, draws a titled popup frame on it and returns the inner area.
pub fn render_block_in(frame: &mut Frame, area: Rect, title: &str) -> Rect {
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(focused_border())
        .style(popup_bg());

    let inner = block.inner(area);
    frame.render_widget(block, area);

    inner
}

pub fn render_popup_with_block(
    frame: &mut Frame,
    title: &str,
    width_percent: u16,
    height_percent: u16,
) -> Rect {
    let area = centered_rect(width_percent, height_percent, frame.area());
    render_block_in(frame, area, title)
}

pub fn render_confirm_popup(frame: &mut Frame, title: &str, message: &str) {
    let inner = render_popup_with_block(frame, title, 50, 25);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(inner);

    let body = Paragraph::new(message)
        .style(normal_text())
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(body, chunks[0]);

    let hint = Paragraph::new(Line::from("y: delete   n/ESC: keep"))
        .style(label_text())
        .alignment(Alignment::Center);
    frame.render_widget(hint, chunks[1]);
}
