use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, View};
use crate::util::unicode::display_width;

const TABS: [(View, &str); 3] = [
    (View::Flow, "Flow"),
    (View::Manage, "Manage"),
    (View::Boards, "Boards"),
];

/// Render the tab bar: view tabs on the left, the clock on the right,
/// with a separator line below
pub fn render_tab_bar(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // tabs
            Constraint::Length(1), // separator
        ])
        .split(area);

    let sep_cols = render_tabs(frame, app, chunks[0]);
    render_separator(frame, app, chunks[1], &sep_cols);
}

/// Render tabs and return the column positions of each separator character.
fn render_tabs(frame: &mut Frame, app: &App, area: Rect) -> Vec<usize> {
    let bg = app.theme.background;
    let mut spans: Vec<Span> = Vec::new();
    let mut sep_cols: Vec<usize> = Vec::new();
    let sep = Span::styled("\u{2502}", Style::default().fg(app.theme.dim).bg(bg));

    // Leading icon
    spans.push(Span::styled(" ", Style::default().bg(bg)));
    spans.push(Span::styled(
        "\u{25B6}",
        Style::default().fg(app.theme.highlight).bg(bg),
    ));
    spans.push(Span::styled(" ", Style::default().bg(bg)));

    for (i, (view, label)) in TABS.iter().enumerate() {
        let style = tab_style(app, app.view == *view);
        spans.push(Span::styled(format!(" {} {} ", i + 1, label), style));
        sep_cols.push(spans.iter().map(|s| s.width()).sum());
        spans.push(sep.clone());
    }

    // Clock, right-aligned
    let clock = app.clock.format("%a %d %b %Y  %H:%M").to_string();
    let used: usize = spans.iter().map(|s| s.width()).sum();
    let clock_w = display_width(&clock) + 1;
    let width = area.width as usize;
    if used + clock_w < width {
        spans.push(Span::styled(
            " ".repeat(width - used - clock_w),
            Style::default().bg(bg),
        ));
        spans.push(Span::styled(clock, Style::default().fg(app.theme.dim).bg(bg)));
    }

    let tabs = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(tabs, area);
    sep_cols
}

fn render_separator(frame: &mut Frame, app: &App, area: Rect, sep_cols: &[usize]) {
    let width = area.width as usize;
    let mut line: String = String::with_capacity(width * 3);
    for col in 0..width {
        if sep_cols.contains(&col) {
            line.push('\u{2534}');
        } else {
            line.push('\u{2500}');
        }
    }
    let sep_widget =
        Paragraph::new(line).style(Style::default().fg(app.theme.dim).bg(app.theme.background));
    frame.render_widget(sep_widget, area);
}

/// Style for a tab: highlighted if current, normal otherwise
fn tab_style(app: &App, is_current: bool) -> Style {
    if is_current {
        Style::default()
            .fg(app.theme.text_bright)
            .bg(app.theme.selection_bg)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(app.theme.text).bg(app.theme.background)
    }
}
