use serde::Serialize;

use crate::io::recovery::RecoveryEntry;
use crate::model::board::{AppState, Board, Task};
use crate::model::day::{DAYS_PER_WEEK, day_name};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct BoardJson {
    pub id: String,
    pub name: String,
    pub created_at: String,
    pub active: bool,
    pub tasks: usize,
}

#[derive(Serialize)]
pub struct TaskJson {
    pub id: String,
    pub time: String,
    pub title: String,
    pub done: bool,
}

#[derive(Serialize)]
pub struct DayJson {
    pub day: u8,
    pub name: &'static str,
    pub tasks: Vec<TaskJson>,
}

#[derive(Serialize)]
pub struct RecoveryEntryJson {
    pub timestamp: String,
    pub category: String,
    pub description: String,
    pub fields: Vec<(String, String)>,
    pub body: String,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn board_to_json(state: &AppState, board: &Board) -> BoardJson {
    BoardJson {
        id: board.id.clone(),
        name: board.name.clone(),
        created_at: board.created_at.to_rfc3339(),
        active: state.active_board_id.as_deref() == Some(board.id.as_str()),
        tasks: board.task_count(),
    }
}

pub fn task_to_json(task: &Task) -> TaskJson {
    TaskJson {
        id: task.id.clone(),
        time: task.time.clone(),
        title: task.title.clone(),
        done: task.done,
    }
}

pub fn day_to_json(board: &Board, day: u8) -> DayJson {
    DayJson {
        day,
        name: day_name(day),
        tasks: board.day(day).iter().map(task_to_json).collect(),
    }
}

pub fn recovery_to_json(entry: &RecoveryEntry) -> RecoveryEntryJson {
    RecoveryEntryJson {
        timestamp: entry.timestamp.to_rfc3339(),
        category: entry.category.to_string(),
        description: entry.description.clone(),
        fields: entry.fields.clone(),
        body: entry.body.clone(),
    }
}

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

/// `* Week A  (b_k3j9x0q, 4 tasks)`, with `*` marking the active board
pub fn format_board_line(state: &AppState, board: &Board) -> String {
    let active = state.active_board_id.as_deref() == Some(board.id.as_str());
    let count = board.task_count();
    format!(
        "{} {}  ({}, {} task{})",
        if active { "*" } else { " " },
        board.name,
        board.id,
        count,
        if count == 1 { "" } else { "s" }
    )
}

/// `[x] 07:00  Wake up  t_3k9x0qa`
pub fn format_task_line(task: &Task) -> String {
    format!(
        "{} {}  {}  {}",
        if task.done { "[x]" } else { "[ ]" },
        task.time,
        task.title,
        task.id
    )
}

/// A day heading followed by its tasks, indented. `empty` is printed for a
/// day with no tasks; `None` skips the day entirely.
pub fn format_day(board: &Board, day: u8, empty: Option<&str>) -> Vec<String> {
    let tasks = board.day(day);
    if tasks.is_empty() && empty.is_none() {
        return Vec::new();
    }
    let mut lines = vec![format!("{}:", day_name(day))];
    if tasks.is_empty() {
        lines.extend(empty.map(|e| format!("  {}", e)));
    }
    lines.extend(tasks.iter().map(|t| format!("  {}", format_task_line(t))));
    lines
}

/// Every non-empty day of a board, Sunday first
pub fn format_week(board: &Board) -> Vec<String> {
    let mut lines = vec![board.name.clone()];
    let days: Vec<Vec<String>> = (0..DAYS_PER_WEEK)
        .map(|day| format_day(board, day, None))
        .filter(|d| !d.is_empty())
        .collect();
    if days.is_empty() {
        lines.push("  (no tasks)".to_string());
    }
    for day in days {
        lines.extend(day);
    }
    lines
}

pub fn format_recovery_entry(entry: &RecoveryEntry) -> String {
    let mut out = format!(
        "{} [{}] {}",
        entry
            .timestamp
            .to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
        entry.category,
        entry.description
    );
    for (key, value) in &entry.fields {
        out.push_str(&format!("\n  {}: {}", key, value));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use pretty_assertions::assert_eq;

    fn board() -> Board {
        let created = DateTime::parse_from_rfc3339("2025-06-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let mut board = Board::new("b_week".into(), "Week A".into(), created);
        let mut coffee = Task::new("t_1".into(), "08:00".into(), "Coffee".into());
        coffee.done = true;
        board.day_mut(1).push(coffee);
        board
            .day_mut(1)
            .push(Task::new("t_2".into(), "09:00".into(), "Standup".into()));
        board
            .day_mut(5)
            .push(Task::new("t_3".into(), "17:00".into(), "Review".into()));
        board
    }

    #[test]
    fn board_line_marks_active() {
        let b = board();
        let state = AppState {
            boards: vec![b.clone()],
            active_board_id: Some("b_week".into()),
        };
        assert_eq!(format_board_line(&state, &b), "* Week A  (b_week, 3 tasks)");
        let inactive = AppState {
            boards: vec![b.clone()],
            active_board_id: None,
        };
        assert_eq!(format_board_line(&inactive, &b), "  Week A  (b_week, 3 tasks)");
    }

    #[test]
    fn week_skips_empty_days() {
        assert_eq!(
            format_week(&board()),
            vec![
                "Week A",
                "Monday:",
                "  [x] 08:00  Coffee  t_1",
                "  [ ] 09:00  Standup  t_2",
                "Friday:",
                "  [ ] 17:00  Review  t_3",
            ]
        );
    }

    #[test]
    fn empty_day_placeholder() {
        assert_eq!(
            format_day(&board(), 3, Some("no tasks")),
            vec!["Wednesday:", "  no tasks"]
        );
        assert!(format_day(&board(), 3, None).is_empty());
    }

    #[test]
    fn day_json_shape() {
        let json = serde_json::to_value(day_to_json(&board(), 5)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "day": 5,
                "name": "Friday",
                "tasks": [{"id": "t_3", "time": "17:00", "title": "Review", "done": false}]
            })
        );
    }
}
