pub mod boards_view;
pub mod flow_view;
pub mod manage_view;
pub mod modal_popup;
pub mod status_row;
pub mod tab_bar;

#[cfg(test)]
pub mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Block;

use super::app::{App, View};

/// Main render function: a full rebuild of the screen from `app`
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    // Layout: tab bar (2 rows) | content | status row (1 row)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // tab bar + separator
            Constraint::Min(1),    // content area
            Constraint::Length(1), // status row
        ])
        .split(area);

    tab_bar::render_tab_bar(frame, app, chunks[0]);

    match app.view {
        View::Flow => flow_view::render_flow_view(frame, app, chunks[1]),
        View::Manage => manage_view::render_manage_view(frame, app, chunks[1]),
        View::Boards => boards_view::render_boards_view(frame, app, chunks[1]),
    }

    status_row::render_status_row(frame, app, chunks[2]);

    // Modal (rendered on top of everything)
    if app.modal.is_some() {
        modal_popup::render_modal(frame, app, area);
    }
}

/// A line that fills `width` cells with `bg`, so highlighted rows span the pane
pub(super) fn padded_line<'a>(mut spans: Vec<Span<'a>>, width: u16, bg: Color) -> Line<'a> {
    let content_width: usize = spans.iter().map(|s| s.width()).sum();
    let w = width as usize;
    if content_width < w {
        spans.push(Span::styled(" ".repeat(w - content_width), Style::default().bg(bg)));
    }
    Line::from(spans)
}
