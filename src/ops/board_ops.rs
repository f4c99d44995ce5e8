use chrono::{DateTime, Utc};

use crate::model::board::{AppState, Board, DEFAULT_BOARD_NAME, sort_by_time};

use super::{OpError, new_id};

fn require_name(name: &str) -> Result<String, OpError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(OpError::EmptyField("board name"));
    }
    Ok(name.to_string())
}

/// Append a new empty board and make it active. Returns the new board id.
pub fn create_board(state: &mut AppState, name: &str, now: DateTime<Utc>) -> Result<String, OpError> {
    let name = require_name(name)?;
    let board = Board::new(new_id("b"), name, now);
    let id = board.id.clone();
    state.boards.push(board);
    state.active_board_id = Some(id.clone());
    Ok(id)
}

/// Remove a board. If it was active, the first remaining board (or none)
/// becomes active.
pub fn remove_board(state: &mut AppState, id: &str) -> Result<Board, OpError> {
    let idx = state
        .board_index(id)
        .ok_or_else(|| OpError::BoardNotFound(id.to_string()))?;
    let removed = state.boards.remove(idx);
    if state.active_board_id.as_deref() == Some(id) {
        state.active_board_id = state.boards.first().map(|b| b.id.clone());
    }
    Ok(removed)
}

pub fn rename_board(state: &mut AppState, id: &str, name: &str) -> Result<(), OpError> {
    let name = require_name(name)?;
    let board = state
        .board_mut(id)
        .ok_or_else(|| OpError::BoardNotFound(id.to_string()))?;
    board.name = name;
    Ok(())
}

/// Deep-copy a board under a new name: fresh task ids, every task not done.
/// The copy becomes active. Returns the new board id.
pub fn duplicate_board(
    state: &mut AppState,
    id: &str,
    name: &str,
    now: DateTime<Utc>,
) -> Result<String, OpError> {
    let name = require_name(name)?;
    let source = state
        .board(id)
        .ok_or_else(|| OpError::BoardNotFound(id.to_string()))?;

    let mut copy = Board::new(new_id("b"), name, now);
    for (day, tasks) in &source.days {
        let bucket = copy.day_mut(*day);
        for task in tasks {
            let mut task = task.clone();
            task.id = new_id("t");
            task.done = false;
            bucket.push(task);
        }
        sort_by_time(bucket);
    }
    copy.normalize();

    let new_board_id = copy.id.clone();
    state.boards.push(copy);
    state.active_board_id = Some(new_board_id.clone());
    Ok(new_board_id)
}

/// Make an existing board the active one
pub fn set_active_board(state: &mut AppState, id: &str) -> Result<(), OpError> {
    if state.board(id).is_none() {
        return Err(OpError::BoardNotFound(id.to_string()));
    }
    state.active_board_id = Some(id.to_string());
    Ok(())
}

/// Post-load repair: normalize every board's buckets and pick the first
/// board when none is active. Returns `(board id, dropped day keys)` for
/// boards that carried out-of-range days.
pub fn normalize_state(state: &mut AppState) -> Vec<(String, Vec<u8>)> {
    let mut dropped = Vec::new();
    for board in &mut state.boards {
        let days = board.normalize();
        if !days.is_empty() {
            dropped.push((board.id.clone(), days));
        }
    }
    if state.active_board_id.is_none() {
        state.active_board_id = state.boards.first().map(|b| b.id.clone());
    }
    dropped
}

/// Create and activate the default board when there are no boards.
/// Returns true if one was created (the caller should persist).
pub fn ensure_default_board(state: &mut AppState, now: DateTime<Utc>) -> bool {
    if !state.boards.is_empty() {
        return false;
    }
    let board = Board::new(new_id("b"), DEFAULT_BOARD_NAME.to_string(), now);
    state.active_board_id = Some(board.id.clone());
    state.boards.push(board);
    true
}
