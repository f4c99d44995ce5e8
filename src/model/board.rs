use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::day::DAYS_PER_WEEK;

/// Name of the board created when the store holds no boards at all
pub const DEFAULT_BOARD_NAME: &str = "Semana Padrão";

/// A single time-stamped task inside a day bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Random id like `t_3k9x0qa`
    pub id: String,
    /// Start time as `HH:MM`
    pub time: String,
    pub title: String,
    #[serde(default)]
    pub done: bool,
}

impl Task {
    pub fn new(id: String, time: String, title: String) -> Self {
        Task {
            id,
            time,
            title,
            done: false,
        }
    }
}

/// A named weekly schedule with one task bucket per weekday
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    /// Weekday index (0 = Sunday) to tasks, kept sorted by time
    #[serde(default)]
    pub days: BTreeMap<u8, Vec<Task>>,
}

impl Board {
    /// Create a board with seven empty day buckets
    pub fn new(id: String, name: String, created_at: DateTime<Utc>) -> Self {
        let days = (0..DAYS_PER_WEEK).map(|d| (d, Vec::new())).collect();
        Board {
            id,
            name,
            created_at,
            days,
        }
    }

    /// Tasks for a weekday (empty slice for an unknown day)
    pub fn day(&self, day: u8) -> &[Task] {
        self.days.get(&day).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Mutable bucket for a weekday, created on demand
    pub fn day_mut(&mut self, day: u8) -> &mut Vec<Task> {
        self.days.entry(day).or_default()
    }

    /// Ensure exactly the buckets 0..=6 exist and each is time-sorted.
    /// Returns the out-of-range day keys that were dropped.
    pub fn normalize(&mut self) -> Vec<u8> {
        let dropped: Vec<u8> = self
            .days
            .keys()
            .copied()
            .filter(|d| *d >= DAYS_PER_WEEK)
            .collect();
        for d in &dropped {
            self.days.remove(d);
        }
        for d in 0..DAYS_PER_WEEK {
            sort_by_time(self.day_mut(d));
        }
        dropped
    }

    /// Total number of tasks across the week
    pub fn task_count(&self) -> usize {
        self.days.values().map(|tasks| tasks.len()).sum()
    }
}

/// Stable sort of a bucket by its `HH:MM` strings
pub fn sort_by_time(tasks: &mut [Task]) {
    tasks.sort_by(|a, b| a.time.cmp(&b.time));
}

/// Every board and task, persisted as a single document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    #[serde(default)]
    pub boards: Vec<Board>,
    #[serde(default)]
    pub active_board_id: Option<String>,
}

impl AppState {
    /// The active board, or `None` when unset or pointing at a removed board
    pub fn active_board(&self) -> Option<&Board> {
        let id = self.active_board_id.as_deref()?;
        self.board(id)
    }

    pub fn active_board_mut(&mut self) -> Option<&mut Board> {
        let id = self.active_board_id.clone()?;
        self.board_mut(&id)
    }

    pub fn board(&self, id: &str) -> Option<&Board> {
        self.boards.iter().find(|b| b.id == id)
    }

    pub fn board_mut(&mut self, id: &str) -> Option<&mut Board> {
        self.boards.iter_mut().find(|b| b.id == id)
    }

    /// Position of a board in display order
    pub fn board_index(&self, id: &str) -> Option<usize> {
        self.boards.iter().position(|b| b.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-06-01T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn new_board_has_seven_empty_days() {
        let b = Board::new("b_1".into(), "Week".into(), ts());
        assert_eq!(b.days.keys().copied().collect::<Vec<_>>(), vec![0, 1, 2, 3, 4, 5, 6]);
        assert!(b.days.values().all(|d| d.is_empty()));
        assert_eq!(b.task_count(), 0);
    }

    #[test]
    fn json_shape_uses_camel_case_and_string_day_keys() {
        let mut state = AppState::default();
        let mut b = Board::new("b_1".into(), "Week".into(), ts());
        b.day_mut(1)
            .push(Task::new("t_1".into(), "09:00".into(), "Standup".into()));
        state.boards.push(b);
        state.active_board_id = Some("b_1".into());

        let v = serde_json::to_value(&state).unwrap();
        assert_eq!(v["activeBoardId"], "b_1");
        assert_eq!(v["boards"][0]["createdAt"], "2025-06-01T10:00:00Z");
        assert_eq!(v["boards"][0]["days"]["1"][0]["title"], "Standup");
        assert_eq!(v["boards"][0]["days"]["1"][0]["done"], false);

        let back: AppState = serde_json::from_value(v).unwrap();
        assert_eq!(back, state);
    }

    #[test]
    fn minimal_document_gets_defaults() {
        let state: AppState = serde_json::from_str("{}").unwrap();
        assert!(state.boards.is_empty());
        assert!(state.active_board_id.is_none());
    }

    #[test]
    fn normalize_fills_missing_and_drops_out_of_range_days() {
        let json = r#"{
            "id": "b_1", "name": "W", "createdAt": "2025-06-01T10:00:00Z",
            "days": {
                "2": [
                    {"id": "t_b", "time": "10:00", "title": "Late"},
                    {"id": "t_a", "time": "08:30", "title": "Early"}
                ],
                "9": []
            }
        }"#;
        let mut b: Board = serde_json::from_str(json).unwrap();
        let dropped = b.normalize();
        assert_eq!(dropped, vec![9]);
        assert_eq!(b.days.len(), 7);
        assert_eq!(b.day(2)[0].title, "Early");
        assert!(!b.day(2)[0].done);
    }

    #[test]
    fn dangling_active_id_is_treated_as_none() {
        let state = AppState {
            boards: vec![Board::new("b_1".into(), "W".into(), ts())],
            active_board_id: Some("b_gone".into()),
        };
        assert!(state.active_board().is_none());
    }
}
