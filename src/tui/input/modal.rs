use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use indexmap::IndexMap;

use crate::tui::app::App;
use crate::tui::modal::{ModalAction, ModalResult};

pub(super) fn handle_modal(app: &mut App, key: KeyEvent) {
    let Some(modal) = app.modal.as_mut() else {
        return;
    };
    match (key.modifiers, key.code) {
        (_, KeyCode::Esc) => {
            if let Some(modal) = app.modal.take() {
                resolve(app, modal.action, None);
            }
        }
        (_, KeyCode::Enter) => match modal.confirm() {
            Ok(values) => {
                if let Some(modal) = app.modal.take() {
                    resolve(app, modal.action, Some(values));
                }
            }
            Err(msg) => modal.error = Some(msg),
        },
        (_, KeyCode::Tab | KeyCode::Down) => modal.focus_next(),
        (_, KeyCode::BackTab | KeyCode::Up) => modal.focus_prev(),
        (_, KeyCode::Left) => {
            if let Some(input) = modal.focused_mut() {
                input.cycle(-1);
            }
        }
        (_, KeyCode::Right) => {
            if let Some(input) = modal.focused_mut() {
                input.cycle(1);
            }
        }
        (_, KeyCode::Backspace) => {
            if let Some(input) = modal.focused_mut() {
                input.backspace();
            }
            modal.error = None;
        }
        (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char(c)) => {
            if let Some(input) = modal.focused_mut() {
                input.insert_char(c);
            }
            modal.error = None;
        }
        _ => {}
    }
}

fn field<'a>(values: &'a IndexMap<String, String>, id: &str) -> &'a str {
    values.get(id).map(String::as_str).unwrap_or("")
}

/// Hand a resolved modal's result to its pending action. Cancel is a no-op.
fn resolve(app: &mut App, action: ModalAction, result: ModalResult) {
    let Some(values) = result else {
        tracing::debug!(?action, "modal cancelled");
        return;
    };
    match action {
        ModalAction::NewBoard => app.create_board(field(&values, "name")),
        ModalAction::RenameBoard { board_id } => {
            app.rename_board(&board_id, field(&values, "name"));
        }
        ModalAction::DuplicateBoard { board_id } => {
            app.duplicate_board(&board_id, field(&values, "name"));
        }
        ModalAction::RemoveBoard { board_id } => app.remove_board(&board_id),
        ModalAction::EditTask {
            board_id,
            day,
            task_id,
        } => app.update_task(
            &board_id,
            day,
            &task_id,
            field(&values, "time"),
            field(&values, "title"),
        ),
        ModalAction::RemoveTask {
            board_id,
            day,
            task_id,
        } => app.remove_task(&board_id, day, &task_id),
        ModalAction::CopyDay { board_id } => {
            let from = field(&values, "from").parse::<u8>();
            let to = field(&values, "to").parse::<u8>();
            if let (Ok(from), Ok(to)) = (from, to) {
                app.copy_day(&board_id, from, to);
            }
        }
        ModalAction::Notice => {}
    }
}
