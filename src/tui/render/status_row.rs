use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::io::store::SyncStatus;
use crate::tui::app::{App, FlowTab, View};

/// Render the status row (bottom of screen): a message or key hints on the
/// left, the sync indicator on the right
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let mut spans = match &app.status_message {
        Some(msg) => vec![Span::styled(
            format!(" {}", msg),
            Style::default().fg(app.theme.yellow).bg(bg),
        )],
        None => vec![Span::styled(
            format!(" {}", key_hints(app)),
            Style::default().fg(app.theme.dim).bg(bg),
        )],
    };

    let (sync_text, sync_color) = match &app.sync_status {
        SyncStatus::Idle => ("", app.theme.dim),
        SyncStatus::Saved => ("\u{2713} saved", app.theme.green),
        SyncStatus::Failed(_) => ("\u{2717} not saved", app.theme.red),
    };
    let sync_w = sync_text.chars().count() + 1;
    let content_width: usize = spans.iter().map(|s| s.width()).sum();
    if !sync_text.is_empty() && content_width + sync_w < width {
        spans.push(Span::styled(
            " ".repeat(width - content_width - sync_w),
            Style::default().bg(bg),
        ));
        spans.push(Span::styled(sync_text, Style::default().fg(sync_color).bg(bg)));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

fn key_hints(app: &App) -> &'static str {
    if let Some(modal) = &app.modal {
        return if modal.cancel_label.is_some() {
            "Enter confirm  Esc cancel  Tab next field"
        } else {
            "Enter dismiss"
        };
    }
    if app.add_form.is_some() {
        return "Enter next/add  Tab switch field  Esc close";
    }
    match (app.view, app.flow_tab) {
        (View::Flow, FlowTab::Diagram) => "Tab checklist  j/k scroll  1-3 views  T theme  q quit",
        (View::Flow, FlowTab::Checklist) => "Space toggle  Tab diagram  1-3 views  T theme  q quit",
        (View::Manage, _) => "h/l day  a add  e edit  d remove  t template  [/] board  n r D X",
        (View::Boards, _) => "j/k move  Enter open  n new  q quit",
    }
}
