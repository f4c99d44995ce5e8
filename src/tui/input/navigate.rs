use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::model::day::DAYS_PER_WEEK;
use crate::tui::app::{AddForm, App, FlowTab, View};
use crate::tui::modal::{Modal, ModalAction, ModalInput};

/// Default name offered for a new board
const NEW_BOARD_NAME: &str = "Minha Semana";

pub(super) fn handle_navigate(app: &mut App, key: KeyEvent) {
    // Global bindings
    match (key.modifiers, key.code) {
        (KeyModifiers::CONTROL, KeyCode::Char('c')) | (_, KeyCode::Char('q')) => {
            app.should_quit = true;
            return;
        }
        (_, KeyCode::Char('1')) => {
            app.view = View::Flow;
            return;
        }
        (_, KeyCode::Char('2')) => {
            app.view = View::Manage;
            return;
        }
        (_, KeyCode::Char('3')) => {
            app.view = View::Boards;
            return;
        }
        (_, KeyCode::Char('T')) => {
            app.toggle_theme();
            return;
        }
        _ => {}
    }

    match app.view {
        View::Flow => handle_flow(app, key),
        View::Manage => handle_manage(app, key),
        View::Boards => handle_boards(app, key),
    }
}

fn handle_flow(app: &mut App, key: KeyEvent) {
    match (app.flow_tab, key.code) {
        (_, KeyCode::Tab) => {
            app.flow_tab = app.flow_tab.toggled();
            app.flow_scroll = 0;
            app.save_prefs();
        }
        (FlowTab::Diagram, KeyCode::Char('j') | KeyCode::Down) => {
            app.flow_scroll = app.flow_scroll.saturating_add(1);
        }
        (FlowTab::Diagram, KeyCode::Char('k') | KeyCode::Up) => {
            app.flow_scroll = app.flow_scroll.saturating_sub(1);
        }
        (FlowTab::Checklist, KeyCode::Char('j') | KeyCode::Down) => {
            let len = app.today_tasks().len();
            if app.checklist_cursor + 1 < len {
                app.checklist_cursor += 1;
            }
        }
        (FlowTab::Checklist, KeyCode::Char('k') | KeyCode::Up) => {
            app.checklist_cursor = app.checklist_cursor.saturating_sub(1);
        }
        (FlowTab::Checklist, KeyCode::Char(' ') | KeyCode::Enter) => {
            let Some(board_id) = app.active_board_id() else {
                return;
            };
            let Some(task_id) = app
                .today_tasks()
                .get(app.checklist_cursor)
                .map(|t| t.id.clone())
            else {
                return;
            };
            let day = app.today;
            app.toggle_task(&board_id, day, &task_id);
        }
        _ => {}
    }
}

fn handle_manage(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('h') | KeyCode::Left => {
            app.select_manage_day((app.manage_day + DAYS_PER_WEEK - 1) % DAYS_PER_WEEK);
        }
        KeyCode::Char('l') | KeyCode::Right => {
            app.select_manage_day((app.manage_day + 1) % DAYS_PER_WEEK);
        }
        KeyCode::Char('j') | KeyCode::Down => {
            let len = app.manage_tasks().len();
            if app.manage_cursor + 1 < len {
                app.manage_cursor += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.manage_cursor = app.manage_cursor.saturating_sub(1);
        }
        KeyCode::Char('[') => app.cycle_board(-1),
        KeyCode::Char(']') => app.cycle_board(1),
        KeyCode::Char('a') => {
            if app.active_board().is_some() {
                app.add_form = Some(AddForm::default());
            }
        }
        KeyCode::Char('e') => open_edit_task(app),
        KeyCode::Char('d') => open_remove_task(app),
        KeyCode::Char('t') => open_copy_day(app),
        KeyCode::Char('n') => open_new_board(app),
        KeyCode::Char('r') => open_rename_board(app),
        KeyCode::Char('D') => open_duplicate_board(app),
        KeyCode::Char('X') => open_remove_board(app),
        _ => {}
    }
}

fn handle_boards(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            if app.boards_cursor + 1 < app.state.boards.len() {
                app.boards_cursor += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.boards_cursor = app.boards_cursor.saturating_sub(1);
        }
        KeyCode::Enter => {
            if let Some(id) = app.state.boards.get(app.boards_cursor).map(|b| b.id.clone()) {
                app.open_board(&id);
            }
        }
        KeyCode::Char('n') => open_new_board(app),
        _ => {}
    }
}

// --- modal openers ---

fn open_new_board(app: &mut App) {
    app.modal = Some(
        Modal::new("New board", "Create", ModalAction::NewBoard)
            .with_input(ModalInput::text("name", "Name", NEW_BOARD_NAME)),
    );
}

fn open_rename_board(app: &mut App) {
    let Some(board) = app.active_board() else {
        return;
    };
    let modal = Modal::new(
        "Rename board",
        "Save",
        ModalAction::RenameBoard {
            board_id: board.id.clone(),
        },
    )
    .with_input(ModalInput::text("name", "Name", &board.name));
    app.modal = Some(modal);
}

fn open_duplicate_board(app: &mut App) {
    let Some(board) = app.active_board() else {
        return;
    };
    let modal = Modal::new(
        "Duplicate board",
        "Duplicate",
        ModalAction::DuplicateBoard {
            board_id: board.id.clone(),
        },
    )
    .with_input(ModalInput::text(
        "name",
        "Name",
        &format!("{} (cópia)", board.name),
    ));
    app.modal = Some(modal);
}

fn open_remove_board(app: &mut App) {
    let Some(board) = app.active_board() else {
        return;
    };
    let modal = Modal::new(
        &format!("Remove \"{}\"?", board.name),
        "Remove",
        ModalAction::RemoveBoard {
            board_id: board.id.clone(),
        },
    )
    .with_message("This cannot be undone.");
    app.modal = Some(modal);
}

fn open_edit_task(app: &mut App) {
    let Some(board_id) = app.active_board_id() else {
        return;
    };
    let Some(task) = app.manage_tasks().get(app.manage_cursor) else {
        return;
    };
    let modal = Modal::new(
        "Edit task",
        "Save",
        ModalAction::EditTask {
            board_id,
            day: app.manage_day,
            task_id: task.id.clone(),
        },
    )
    .with_input(ModalInput::time("time", "Time", &task.time))
    .with_input(ModalInput::text("title", "Title", &task.title));
    app.modal = Some(modal);
}

fn open_remove_task(app: &mut App) {
    let Some(board_id) = app.active_board_id() else {
        return;
    };
    let Some(task) = app.manage_tasks().get(app.manage_cursor) else {
        return;
    };
    let modal = Modal::new(
        "Remove task?",
        "Remove",
        ModalAction::RemoveTask {
            board_id,
            day: app.manage_day,
            task_id: task.id.clone(),
        },
    )
    .with_message(&format!("{} - {}", task.time, task.title));
    app.modal = Some(modal);
}

fn open_copy_day(app: &mut App) {
    let Some(board_id) = app.active_board_id() else {
        return;
    };
    let day = app.manage_day;
    let modal = Modal::new("Use day as template", "Copy", ModalAction::CopyDay { board_id })
        .with_message("Choose the source (template) day and the destination day.")
        .with_input(ModalInput::weekday("from", "From", day))
        .with_input(ModalInput::weekday("to", "To", (day + 1) % DAYS_PER_WEEK));
    app.modal = Some(modal);
}
