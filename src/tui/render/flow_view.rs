use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::day::day_name;
use crate::ops::diagram::{DiagramError, Flowchart, generate, parse_flowchart};
use crate::tui::app::{App, FlowTab};
use crate::util::unicode::{display_width, truncate_to_width};

use super::padded_line;

/// Shown in place of the diagram when the markup can't be drawn
pub const DIAGRAM_FAILED: &str = "Failed to generate flowchart.";

/// Render the flow view: active board header, sub-tabs, then either the
/// diagram or the checklist for today
pub fn render_flow_view(frame: &mut Frame, app: &mut App, area: Rect) {
    let bg = app.theme.background;
    let mut lines: Vec<Line> = Vec::new();

    let title = match app.active_board() {
        Some(board) => Span::styled(
            format!(" {}", board.name),
            Style::default()
                .fg(app.theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ),
        None => Span::styled(" No board selected", Style::default().fg(app.theme.dim).bg(bg)),
    };
    lines.push(Line::from(title));

    let tab = |label: &'static str, current: bool| {
        if current {
            Span::styled(
                format!("[{}]", label),
                Style::default()
                    .fg(app.theme.highlight)
                    .bg(bg)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            Span::styled(format!(" {} ", label), Style::default().fg(app.theme.dim).bg(bg))
        }
    };
    lines.push(Line::from(vec![
        Span::styled(" ", Style::default().bg(bg)),
        tab("Diagram", app.flow_tab == FlowTab::Diagram),
        Span::styled(" ", Style::default().bg(bg)),
        tab("Checklist", app.flow_tab == FlowTab::Checklist),
    ]));
    lines.push(Line::from(""));

    let header_len = lines.len() as u16;
    let body = match app.flow_tab {
        FlowTab::Diagram => diagram_lines(app, area.width),
        FlowTab::Checklist => checklist_lines(app, area.width),
    };

    // Keep the diagram scroll inside the content
    let visible = area.height.saturating_sub(header_len);
    let max_scroll = (body.len() as u16).saturating_sub(visible);
    app.flow_scroll = app.flow_scroll.min(max_scroll);
    lines.extend(body.into_iter().skip(app.flow_scroll as usize));

    let paragraph = Paragraph::new(lines).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

fn diagram_lines(app: &App, width: u16) -> Vec<Line<'static>> {
    let markup = generate(app.active_board(), app.today, app.theme_mode);
    markup_lines(app, &markup, width)
}

fn markup_lines(app: &App, markup: &str, width: u16) -> Vec<Line<'static>> {
    match parse_flowchart(markup) {
        Ok(chart) => draw_chart(app, &chart, width),
        Err(e) => diagram_error(app, &e),
    }
}

fn diagram_error(app: &App, err: &DiagramError) -> Vec<Line<'static>> {
    tracing::warn!(error = %err, "flowchart render failed");
    vec![Line::from(Span::styled(
        format!(" {}", DIAGRAM_FAILED),
        Style::default().fg(app.theme.red).bg(app.theme.background),
    ))]
}

/// Boxed nodes stacked top-down and centered, joined by arrows where the
/// chart has an edge between consecutive nodes
fn draw_chart(app: &App, chart: &Flowchart, width: u16) -> Vec<Line<'static>> {
    let bg = app.theme.background;
    let border = Style::default().fg(app.theme.border).bg(bg);
    let arrow = Style::default().fg(app.theme.dim).bg(bg);

    let labels: Vec<String> = chart
        .nodes
        .iter()
        .map(|n| {
            if n.done {
                format!("\u{2713} {}", n.label)
            } else {
                n.label.clone()
            }
        })
        .collect();

    let max_inner = (width as usize).saturating_sub(6).max(1);
    let inner = labels
        .iter()
        .map(|l| display_width(l))
        .max()
        .unwrap_or(0)
        .min(max_inner);
    let box_w = inner + 4;
    let indent = " ".repeat((width as usize).saturating_sub(box_w) / 2);
    let mid = " ".repeat(indent.len() + box_w / 2);

    let mut lines = Vec::new();
    for (i, (node, label)) in chart.nodes.iter().zip(&labels).enumerate() {
        let fill = if node.done {
            Style::default().fg(app.theme.done_fg).bg(app.theme.done_bg)
        } else {
            Style::default().fg(app.theme.text_bright).bg(bg)
        };
        let text = truncate_to_width(label, inner);
        let pad = inner - display_width(&text);

        lines.push(Line::from(vec![
            Span::styled(indent.clone(), Style::default().bg(bg)),
            Span::styled(format!("\u{250C}{}\u{2510}", "\u{2500}".repeat(box_w - 2)), border),
        ]));
        lines.push(Line::from(vec![
            Span::styled(indent.clone(), Style::default().bg(bg)),
            Span::styled("\u{2502}", border),
            Span::styled(format!(" {}{} ", text, " ".repeat(pad)), fill),
            Span::styled("\u{2502}", border),
        ]));
        lines.push(Line::from(vec![
            Span::styled(indent.clone(), Style::default().bg(bg)),
            Span::styled(format!("\u{2514}{}\u{2518}", "\u{2500}".repeat(box_w - 2)), border),
        ]));

        if let Some(next) = chart.nodes.get(i + 1) {
            if chart.next_of(&node.id) == Some(next.id.as_str()) {
                lines.push(Line::from(Span::styled(format!("{}\u{2502}", mid), arrow)));
                lines.push(Line::from(Span::styled(format!("{}\u{25BC}", mid), arrow)));
            } else {
                lines.push(Line::from(""));
            }
        }
    }
    lines
}

fn checklist_lines(app: &App, width: u16) -> Vec<Line<'static>> {
    let bg = app.theme.background;
    let mut lines = Vec::new();

    lines.push(Line::from(Span::styled(
        format!(" Today's checklist \u{00B7} {}", day_name(app.today)),
        Style::default()
            .fg(app.theme.text)
            .bg(bg)
            .add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(""));

    let tasks = app.today_tasks();
    if tasks.is_empty() {
        lines.push(Line::from(Span::styled(
            " No tasks for today.",
            Style::default().fg(app.theme.dim).bg(bg),
        )));
        return lines;
    }

    for (i, task) in tasks.iter().enumerate() {
        let is_cursor = i == app.checklist_cursor;
        let row_bg = if is_cursor { app.theme.selection_bg } else { bg };
        let (check, check_color) = if task.done {
            ("[x]", app.theme.green)
        } else {
            ("[ ]", app.theme.text)
        };
        let mut title_style = Style::default().fg(app.theme.text_bright).bg(row_bg);
        if task.done {
            title_style = title_style
                .fg(app.theme.dim)
                .add_modifier(Modifier::CROSSED_OUT);
        }
        let spans = vec![
            Span::styled(
                if is_cursor { " \u{25B8} " } else { "   " },
                Style::default().fg(app.theme.highlight).bg(row_bg),
            ),
            Span::styled(check, Style::default().fg(check_color).bg(row_bg)),
            Span::styled(" ", Style::default().bg(row_bg)),
            Span::styled(task.time.clone(), Style::default().fg(app.theme.blue).bg(row_bg)),
            Span::styled("  ", Style::default().bg(row_bg)),
            Span::styled(task.title.clone(), title_style),
        ];
        lines.push(padded_line(spans, width, row_bg));
    }
    lines
}
