mod form;
mod modal;
mod navigate;

use crossterm::event::{KeyCode, KeyEvent};

use super::app::App;

/// Handle a key event. An open modal captures all input, then the inline
/// add form, then the current view's bindings.
pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }

    if app.modal.is_some() {
        modal::handle_modal(app, key);
        return;
    }
    if app.add_form.is_some() {
        form::handle_add_form(app, key);
        return;
    }

    app.status_message = None;
    navigate::handle_navigate(app, key);
}

#[cfg(test)]
pub(crate) mod test_keys {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    pub fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    pub fn ch(c: char) -> KeyEvent {
        let modifiers = if c.is_ascii_uppercase() {
            KeyModifiers::SHIFT
        } else {
            KeyModifiers::NONE
        };
        KeyEvent::new(KeyCode::Char(c), modifiers)
    }

    /// Key events for typing `s`
    pub fn typed(s: &str) -> Vec<KeyEvent> {
        s.chars().map(ch).collect()
    }
}
