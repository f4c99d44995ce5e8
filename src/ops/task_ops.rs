use crate::model::board::{AppState, Board, Task, sort_by_time};
use crate::model::day::{DAYS_PER_WEEK, day_name};

use super::{OpError, new_id};

fn check_day(day: u8) -> Result<(), OpError> {
    if day >= DAYS_PER_WEEK {
        return Err(OpError::InvalidDay(day));
    }
    Ok(())
}

fn board_mut<'a>(state: &'a mut AppState, board_id: &str) -> Result<&'a mut Board, OpError> {
    state
        .board_mut(board_id)
        .ok_or_else(|| OpError::BoardNotFound(board_id.to_string()))
}

fn find_task_mut<'a>(
    state: &'a mut AppState,
    board_id: &str,
    day: u8,
    task_id: &str,
) -> Result<&'a mut Task, OpError> {
    check_day(day)?;
    board_mut(state, board_id)?
        .day_mut(day)
        .iter_mut()
        .find(|t| t.id == task_id)
        .ok_or_else(|| OpError::TaskNotFound(task_id.to_string()))
}

/// Append a task to the active board's bucket for `day`, then re-sort.
/// Returns the new task id.
pub fn add_task(state: &mut AppState, day: u8, time: &str, title: &str) -> Result<String, OpError> {
    check_day(day)?;
    let title = title.trim();
    if title.is_empty() {
        return Err(OpError::EmptyField("task title"));
    }
    if time.trim().is_empty() {
        return Err(OpError::EmptyField("task time"));
    }
    let board = state.active_board_mut().ok_or(OpError::NoActiveBoard)?;
    let task = Task::new(new_id("t"), time.trim().to_string(), title.to_string());
    let id = task.id.clone();
    let bucket = board.day_mut(day);
    bucket.push(task);
    sort_by_time(bucket);
    Ok(id)
}

/// Flip a task's done flag. Returns the new value.
pub fn toggle_task(state: &mut AppState, board_id: &str, day: u8, task_id: &str) -> Result<bool, OpError> {
    let task = find_task_mut(state, board_id, day, task_id)?;
    task.done = !task.done;
    Ok(task.done)
}

pub fn remove_task(state: &mut AppState, board_id: &str, day: u8, task_id: &str) -> Result<Task, OpError> {
    check_day(day)?;
    let bucket = board_mut(state, board_id)?.day_mut(day);
    let idx = bucket
        .iter()
        .position(|t| t.id == task_id)
        .ok_or_else(|| OpError::TaskNotFound(task_id.to_string()))?;
    Ok(bucket.remove(idx))
}

/// Change a task's time and title in place, then re-sort its bucket
pub fn update_task(
    state: &mut AppState,
    board_id: &str,
    day: u8,
    task_id: &str,
    time: &str,
    title: &str,
) -> Result<(), OpError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(OpError::EmptyField("task title"));
    }
    if time.trim().is_empty() {
        return Err(OpError::EmptyField("task time"));
    }
    let task = find_task_mut(state, board_id, day, task_id)?;
    task.time = time.trim().to_string();
    task.title = title.to_string();
    sort_by_time(board_mut(state, board_id)?.day_mut(day));
    Ok(())
}

/// Use one weekday as a template for another: append copies of every task
/// from `from` to `to` with fresh ids and `done` cleared, then re-sort.
/// Returns the number of tasks copied.
pub fn copy_day(state: &mut AppState, board_id: &str, from: u8, to: u8) -> Result<usize, OpError> {
    check_day(from)?;
    check_day(to)?;
    let board = board_mut(state, board_id)?;
    let copies: Vec<Task> = board
        .day(from)
        .iter()
        .map(|t| Task {
            id: new_id("t"),
            done: false,
            ..t.clone()
        })
        .collect();
    if copies.is_empty() {
        return Err(OpError::EmptySourceDay(day_name(from)));
    }
    let count = copies.len();
    let bucket = board.day_mut(to);
    bucket.extend(copies);
    sort_by_time(bucket);
    Ok(count)
}
