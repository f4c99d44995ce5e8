use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::model::board::Board;
use crate::model::day::{DAYS_PER_WEEK, day_name, day_short_name};
use crate::tui::app::{AddForm, App};
use crate::util::unicode::truncate_to_width;

use super::padded_line;

const BOARD_LIST_WIDTH: u16 = 24;

/// Render the management view: board list on the left, the active board's
/// selected day on the right
pub fn render_manage_view(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(BOARD_LIST_WIDTH), Constraint::Min(1)])
        .split(area);

    render_board_list(frame, app, chunks[0]);

    match app.active_board() {
        Some(board) => render_board(frame, app, board, chunks[1]),
        None => {
            let msg = Paragraph::new(Line::from(Span::styled(
                " No board selected. Press n to create one.",
                Style::default().fg(app.theme.dim),
            )))
            .style(Style::default().bg(app.theme.background));
            frame.render_widget(msg, chunks[1]);
        }
    }
}

fn render_board_list(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let mut lines: Vec<Line> = vec![Line::from(Span::styled(
        " Boards",
        Style::default()
            .fg(app.theme.text)
            .bg(bg)
            .add_modifier(Modifier::BOLD),
    ))];

    if app.state.boards.is_empty() {
        lines.push(Line::from(Span::styled(
            " No boards.",
            Style::default().fg(app.theme.dim).bg(bg),
        )));
    }

    let name_w = (area.width as usize).saturating_sub(4);
    for board in &app.state.boards {
        let is_active = app.state.active_board_id.as_deref() == Some(board.id.as_str());
        let (marker, style) = if is_active {
            (
                " \u{25CF} ",
                Style::default()
                    .fg(app.theme.highlight)
                    .bg(bg)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            ("   ", Style::default().fg(app.theme.text).bg(bg))
        };
        lines.push(Line::from(vec![
            Span::styled(marker, style),
            Span::styled(truncate_to_width(&board.name, name_w), style),
        ]));
    }

    let block = Block::default()
        .borders(Borders::RIGHT)
        .border_style(Style::default().fg(app.theme.dim).bg(bg));
    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

fn render_board(frame: &mut Frame, app: &App, board: &Board, area: Rect) {
    let bg = app.theme.background;
    let width = area.width;
    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::from(Span::styled(
        format!(" {}", board.name),
        Style::default()
            .fg(app.theme.text_bright)
            .bg(bg)
            .add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(Span::styled(
        format!(" Created {}", board.created_at.format("%d/%m/%Y")),
        Style::default().fg(app.theme.dim).bg(bg),
    )));
    lines.push(Line::from(""));

    // Day tabs
    let mut day_spans = vec![Span::styled(" ", Style::default().bg(bg))];
    for day in 0..DAYS_PER_WEEK {
        let style = if day == app.manage_day {
            Style::default()
                .fg(app.theme.text_bright)
                .bg(app.theme.selection_bg)
                .add_modifier(Modifier::BOLD)
        } else if day == app.today {
            Style::default().fg(app.theme.highlight).bg(bg)
        } else {
            Style::default().fg(app.theme.text).bg(bg)
        };
        day_spans.push(Span::styled(format!(" {} ", day_short_name(day)), style));
    }
    lines.push(Line::from(day_spans));
    lines.push(Line::from(""));

    let tasks = board.day(app.manage_day);
    if tasks.is_empty() {
        lines.push(Line::from(Span::styled(
            format!(" No tasks for {}.", day_name(app.manage_day)),
            Style::default().fg(app.theme.dim).bg(bg),
        )));
    }
    let title_w = (width as usize).saturating_sub(11);
    for (i, task) in tasks.iter().enumerate() {
        let is_cursor = i == app.manage_cursor && app.add_form.is_none();
        let row_bg = if is_cursor { app.theme.selection_bg } else { bg };
        let mut title_style = Style::default().fg(app.theme.text_bright).bg(row_bg);
        if task.done {
            title_style = title_style.fg(app.theme.dim);
        }
        lines.push(padded_line(
            vec![
                Span::styled(
                    if is_cursor { " \u{25B8} " } else { "   " },
                    Style::default().fg(app.theme.highlight).bg(row_bg),
                ),
                Span::styled(task.time.clone(), Style::default().fg(app.theme.blue).bg(row_bg)),
                Span::styled("  ", Style::default().bg(row_bg)),
                Span::styled(truncate_to_width(&task.title, title_w), title_style),
            ],
            width,
            row_bg,
        ));
    }

    if let Some(form) = &app.add_form {
        lines.push(Line::from(""));
        lines.extend(add_form_lines(app, form));
    }

    let paragraph = Paragraph::new(lines).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

fn add_form_lines<'a>(app: &App, form: &AddForm) -> Vec<Line<'a>> {
    let bg = app.theme.background;
    let field = |value: String, placeholder: &str, focused: bool| {
        let shown = if value.is_empty() && !focused {
            placeholder.to_string()
        } else {
            value
        };
        let style = if focused {
            Style::default()
                .fg(app.theme.text_bright)
                .bg(app.theme.selection_bg)
        } else {
            Style::default().fg(app.theme.text).bg(bg)
        };
        let cursor = if focused { "\u{258C}" } else { "" };
        Span::styled(format!("[{}{}]", shown, cursor), style)
    };

    let mut lines = vec![Line::from(vec![
        Span::styled(" Add task  ", Style::default().fg(app.theme.highlight).bg(bg)),
        Span::styled("Time ", Style::default().fg(app.theme.dim).bg(bg)),
        field(form.time.display(), "--:--", !form.on_title),
        Span::styled("  Title ", Style::default().fg(app.theme.dim).bg(bg)),
        field(form.title.display(), "", form.on_title),
    ])];
    if let Some(err) = &form.error {
        lines.push(Line::from(Span::styled(
            format!(" {}", err),
            Style::default().fg(app.theme.red).bg(bg),
        )));
    }
    lines
}
