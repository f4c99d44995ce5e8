use std::rc::Rc;

use chrono::{DateTime, Local, TimeZone, Utc};
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::io::backend::MemoryBackend;
use crate::io::store::Store;
use crate::model::board::{AppState, Board, Task};
use crate::model::config::UiConfig;
use crate::tui::app::App;

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// Render the whole screen for `app`
pub fn render_app(app: &mut App) -> String {
    render_to_string(TERM_W, TERM_H, |frame, _| super::render(frame, app))
}

/// Tuesday 2025-06-03, 08:00 local time
pub fn tuesday() -> DateTime<Local> {
    Local.with_ymd_and_hms(2025, 6, 3, 8, 0, 0).unwrap()
}

/// A board with fixed ids and creation date
pub fn board(id: &str, name: &str) -> Board {
    let created = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
    Board::new(id.into(), name.into(), created)
}

/// `(time, title, done)` triples become tasks `t_1`, `t_2`, ... on `day`
pub fn with_tasks(mut board: Board, day: u8, tasks: &[(&str, &str, bool)]) -> Board {
    let bucket = board.day_mut(day);
    let start = bucket.len();
    for (i, (time, title, done)) in tasks.iter().enumerate() {
        bucket.push(Task {
            id: format!("t_{}", start + i + 1),
            time: time.to_string(),
            title: title.to_string(),
            done: *done,
        });
    }
    board
}

/// An App over an in-memory store holding `boards`, the first one active
pub fn app_with_boards(boards: Vec<Board>) -> App {
    let state = AppState {
        active_board_id: boards.first().map(|b| b.id.clone()),
        boards,
    };
    let store = Store::new(Box::new(Rc::new(MemoryBackend::new())), 1);
    App::new(state, store, &UiConfig::default(), tuesday())
}

/// One board "Week A" with the given tasks on `day`
pub fn app_with_tasks(day: u8, tasks: &[(&str, &str, bool)]) -> App {
    app_with_boards(vec![with_tasks(board("b_week", "Week A"), day, tasks)])
}
