use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::model::day::is_valid_time;
use crate::tui::app::{AddForm, App};

/// Inline add-task form: time then title, Enter on the title submits.
/// The form stays open and clears after each task; Esc closes it.
pub(super) fn handle_add_form(app: &mut App, key: KeyEvent) {
    let Some(form) = app.add_form.as_mut() else {
        return;
    };
    match (key.modifiers, key.code) {
        (_, KeyCode::Esc) => app.add_form = None,
        (_, KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down) => {
            form.on_title = !form.on_title;
        }
        (_, KeyCode::Enter) if !form.on_title => form.on_title = true,
        (_, KeyCode::Enter) => submit(app),
        (_, KeyCode::Backspace) => {
            focused(form).backspace();
            form.error = None;
        }
        (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char(c)) => {
            focused(form).insert_char(c);
            form.error = None;
        }
        _ => {}
    }
}

fn focused(form: &mut AddForm) -> &mut crate::tui::modal::ModalInput {
    if form.on_title {
        &mut form.title
    } else {
        &mut form.time
    }
}

fn submit(app: &mut App) {
    let Some(form) = app.add_form.as_mut() else {
        return;
    };
    let time = form.time.value();
    let title = form.title.value();
    if !is_valid_time(&time) {
        form.error = Some("Time must be HH:MM".into());
        form.on_title = false;
        return;
    }
    if title.trim().is_empty() {
        form.error = Some("Title is required".into());
        return;
    }
    if app.add_task(&time, &title) {
        app.add_form = Some(AddForm::default());
    }
}
