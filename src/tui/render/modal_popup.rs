use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::App;
use crate::tui::modal::ModalInput;
use crate::util::unicode::{display_width, pad_to_width, wrap_words};

const POPUP_WIDTH: u16 = 52;

/// Render the open modal centered over the screen
pub fn render_modal(frame: &mut Frame, app: &App, area: Rect) {
    let Some(modal) = &app.modal else {
        return;
    };

    let bg = app.theme.background;
    let header_style = Style::default()
        .fg(app.theme.highlight)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let text_style = Style::default().fg(app.theme.text).bg(bg);
    let dim_style = Style::default().fg(app.theme.dim).bg(bg);

    let popup_w = POPUP_WIDTH.min(area.width.saturating_sub(2));
    let inner_w = (popup_w as usize).saturating_sub(4);

    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::from(Span::styled(format!(" {}", modal.title), header_style)));
    lines.push(Line::from(""));

    if let Some(message) = &modal.message {
        for l in wrap_words(message, inner_w) {
            lines.push(Line::from(Span::styled(format!("  {}", l), text_style)));
        }
        lines.push(Line::from(""));
    }

    if !modal.inputs.is_empty() {
        let label_w = modal
            .inputs
            .iter()
            .map(|i| display_width(i.label()))
            .max()
            .unwrap_or(0);
        let field_w = inner_w.saturating_sub(label_w + 4);
        for (i, input) in modal.inputs.iter().enumerate() {
            let focused = i == modal.focus;
            lines.push(input_line(app, input, focused, label_w, field_w));
        }
        lines.push(Line::from(""));
    }

    if let Some(err) = &modal.error {
        lines.push(Line::from(Span::styled(
            format!("  {}", err),
            Style::default().fg(app.theme.red).bg(bg),
        )));
    }

    // Key hints
    let mut hints = vec![
        Span::styled("  Enter", dim_style),
        Span::styled(format!(" {}", modal.confirm_label), text_style),
    ];
    if let Some(cancel) = &modal.cancel_label {
        hints.push(Span::styled("  Esc", dim_style));
        hints.push(Span::styled(format!(" {}", cancel), text_style));
    }
    lines.push(Line::from(hints));

    let popup_h = ((lines.len() as u16) + 2).min(area.height.saturating_sub(2));
    let overlay_area = centered_rect_fixed(popup_w, popup_h, area);
    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.highlight).bg(bg))
        .style(Style::default().bg(bg));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(Style::default().bg(bg));

    frame.render_widget(paragraph, overlay_area);
}

fn input_line<'a>(
    app: &App,
    input: &ModalInput,
    focused: bool,
    label_w: usize,
    field_w: usize,
) -> Line<'a> {
    let bg = app.theme.background;
    let field_style = if focused {
        Style::default()
            .fg(app.theme.text_bright)
            .bg(app.theme.selection_bg)
    } else {
        Style::default().fg(app.theme.text).bg(bg)
    };

    let value = match input {
        ModalInput::Select { .. } => format!("\u{25C2} {} \u{25B8}", input.display()),
        _ if focused => format!("{}\u{258C}", input.display()),
        _ => input.display(),
    };

    Line::from(vec![
        Span::styled(
            format!("  {} ", pad_to_width(input.label(), label_w)),
            Style::default().fg(app.theme.dim).bg(bg),
        ),
        Span::styled(format!(" {}", pad_to_width(&value, field_w)), field_style),
    ])
}

fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width, height)
}
