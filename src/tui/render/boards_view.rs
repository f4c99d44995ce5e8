use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::App;

use super::padded_line;

/// Render the boards overview: a two-line card per board with its task count
pub fn render_boards_view(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let mut lines: Vec<Line> = Vec::new();

    if app.state.boards.is_empty() {
        lines.push(Line::from(Span::styled(
            " No boards. Press n to create one.",
            Style::default().fg(app.theme.dim).bg(bg),
        )));
    }

    for (i, board) in app.state.boards.iter().enumerate() {
        let is_cursor = i == app.boards_cursor;
        let is_active = app.state.active_board_id.as_deref() == Some(board.id.as_str());
        let row_bg = if is_cursor { app.theme.selection_bg } else { bg };
        let count = board.task_count();

        let mut name_spans = vec![
            Span::styled(
                if is_cursor { " \u{25B8} " } else { "   " },
                Style::default().fg(app.theme.highlight).bg(row_bg),
            ),
            Span::styled(
                board.name.clone(),
                Style::default()
                    .fg(app.theme.text_bright)
                    .bg(row_bg)
                    .add_modifier(Modifier::BOLD),
            ),
        ];
        if is_active {
            name_spans.push(Span::styled(
                "  \u{25CF} active",
                Style::default().fg(app.theme.green).bg(row_bg),
            ));
        }
        lines.push(padded_line(name_spans, area.width, row_bg));

        let mut detail_spans = vec![Span::styled(
            format!("   {} task{}", count, if count == 1 { "" } else { "s" }),
            Style::default().fg(app.theme.dim).bg(row_bg),
        )];
        if is_cursor {
            detail_spans.push(Span::styled(
                "   Enter open",
                Style::default().fg(app.theme.highlight).bg(row_bg),
            ));
        }
        lines.push(padded_line(detail_spans, area.width, row_bg));
        lines.push(Line::from(""));
    }

    let paragraph = Paragraph::new(lines).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}
