use indexmap::IndexMap;
use unicode_segmentation::UnicodeSegmentation;

use crate::model::day::{DAY_NAMES, is_valid_time};

/// Field values keyed by input id; `None` means the prompt was cancelled
pub type ModalResult = Option<IndexMap<String, String>>;

/// One field of a modal prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalInput {
    Text {
        id: String,
        label: String,
        value: String,
    },
    /// 24-hour `HH:MM`; other characters are rejected as typed
    Time {
        id: String,
        label: String,
        value: String,
    },
    /// `(label, value)` pairs; `selected` indexes into `options`
    Select {
        id: String,
        label: String,
        options: Vec<(String, String)>,
        selected: usize,
    },
}

impl ModalInput {
    pub fn text(id: &str, label: &str, value: &str) -> Self {
        ModalInput::Text {
            id: id.into(),
            label: label.into(),
            value: value.into(),
        }
    }

    pub fn time(id: &str, label: &str, value: &str) -> Self {
        ModalInput::Time {
            id: id.into(),
            label: label.into(),
            value: value.into(),
        }
    }

    /// A select over the seven weekdays, values `"0"`..`"6"`
    pub fn weekday(id: &str, label: &str, selected: u8) -> Self {
        ModalInput::Select {
            id: id.into(),
            label: label.into(),
            options: DAY_NAMES
                .iter()
                .enumerate()
                .map(|(i, name)| (name.to_string(), i.to_string()))
                .collect(),
            selected: selected as usize,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            ModalInput::Text { id, .. } | ModalInput::Time { id, .. } | ModalInput::Select { id, .. } => id,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            ModalInput::Text { label, .. }
            | ModalInput::Time { label, .. }
            | ModalInput::Select { label, .. } => label,
        }
    }

    /// Current value as it would appear in the result map
    pub fn value(&self) -> String {
        match self {
            ModalInput::Text { value, .. } | ModalInput::Time { value, .. } => value.clone(),
            ModalInput::Select {
                options, selected, ..
            } => options
                .get(*selected)
                .map(|(_, v)| v.clone())
                .unwrap_or_default(),
        }
    }

    /// Text shown in the field
    pub fn display(&self) -> String {
        match self {
            ModalInput::Text { value, .. } | ModalInput::Time { value, .. } => value.clone(),
            ModalInput::Select {
                options, selected, ..
            } => options
                .get(*selected)
                .map(|(l, _)| l.clone())
                .unwrap_or_default(),
        }
    }

    pub fn insert_char(&mut self, c: char) {
        match self {
            ModalInput::Text { value, .. } => {
                if c != '\n' && c != '\r' {
                    value.push(c);
                }
            }
            ModalInput::Time { value, .. } => {
                if value.len() >= 5 {
                    return;
                }
                match c {
                    '0'..='9' => {
                        if value.len() == 2 {
                            value.push(':');
                        }
                        value.push(c);
                    }
                    ':' if value.len() == 2 => value.push(':'),
                    _ => {}
                }
            }
            ModalInput::Select { .. } => {}
        }
    }

    pub fn backspace(&mut self) {
        match self {
            ModalInput::Text { value, .. } | ModalInput::Time { value, .. } => {
                if let Some((idx, _)) = value.grapheme_indices(true).next_back() {
                    value.truncate(idx);
                }
            }
            ModalInput::Select { .. } => {}
        }
    }

    /// Move a select by `delta` options, wrapping
    pub fn cycle(&mut self, delta: isize) {
        if let ModalInput::Select {
            options, selected, ..
        } = self
        {
            if options.is_empty() {
                return;
            }
            let len = options.len() as isize;
            *selected = ((*selected as isize + delta).rem_euclid(len)) as usize;
        }
    }
}

/// What to do with a modal's result once it resolves
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalAction {
    NewBoard,
    RenameBoard {
        board_id: String,
    },
    DuplicateBoard {
        board_id: String,
    },
    RemoveBoard {
        board_id: String,
    },
    EditTask {
        board_id: String,
        day: u8,
        task_id: String,
    },
    RemoveTask {
        board_id: String,
        day: u8,
        task_id: String,
    },
    CopyDay {
        board_id: String,
    },
    /// Informational; the result is ignored
    Notice,
}

/// A popup prompt. Confirming yields every input's value by id (an empty
/// map when there are no inputs); cancelling yields nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Modal {
    pub title: String,
    pub message: Option<String>,
    pub inputs: Vec<ModalInput>,
    pub confirm_label: String,
    /// `None` for an OK-only notice
    pub cancel_label: Option<String>,
    pub action: ModalAction,
    /// Index of the focused input
    pub focus: usize,
    /// Validation message from the last confirm attempt
    pub error: Option<String>,
}

impl Modal {
    pub fn new(title: &str, confirm_label: &str, action: ModalAction) -> Self {
        Modal {
            title: title.into(),
            message: None,
            inputs: Vec::new(),
            confirm_label: confirm_label.into(),
            cancel_label: Some("Cancel".into()),
            action,
            focus: 0,
            error: None,
        }
    }

    /// An OK-only warning
    pub fn notice(title: &str, message: &str) -> Self {
        Modal {
            cancel_label: None,
            ..Modal::new(title, "OK", ModalAction::Notice).with_message(message)
        }
    }

    pub fn with_message(mut self, message: &str) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_input(mut self, input: ModalInput) -> Self {
        self.inputs.push(input);
        self
    }

    pub fn focused_mut(&mut self) -> Option<&mut ModalInput> {
        self.inputs.get_mut(self.focus)
    }

    pub fn focus_next(&mut self) {
        if !self.inputs.is_empty() {
            self.focus = (self.focus + 1) % self.inputs.len();
        }
    }

    pub fn focus_prev(&mut self) {
        if !self.inputs.is_empty() {
            self.focus = (self.focus + self.inputs.len() - 1) % self.inputs.len();
        }
    }

    /// Collect the values, or explain why they can't be accepted yet
    pub fn confirm(&self) -> Result<IndexMap<String, String>, String> {
        let mut values = IndexMap::new();
        for input in &self.inputs {
            if let ModalInput::Time { value, label, .. } = input
                && !is_valid_time(value)
            {
                return Err(format!("{} must be HH:MM", label));
            }
            values.insert(input.id().to_string(), input.value());
        }
        Ok(values)
    }
}
