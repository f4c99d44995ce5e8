use std::collections::HashMap;

use ratatui::style::Color;

use crate::model::config::{ThemeColors, ThemeMode};

/// Parsed color theme for the TUI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub text_bright: Color,
    pub highlight: Color,
    pub dim: Color,
    pub border: Color,
    pub red: Color,
    pub yellow: Color,
    pub green: Color,
    pub blue: Color,
    pub selection_bg: Color,
    /// Fill and text of completed flowchart nodes
    pub done_bg: Color,
    pub done_fg: Color,
}

impl Theme {
    pub fn light() -> Self {
        Theme {
            background: Color::Rgb(0xFF, 0xFF, 0xFF),
            text: Color::Rgb(0x33, 0x41, 0x55),
            text_bright: Color::Rgb(0x0F, 0x17, 0x2A),
            highlight: Color::Rgb(0x25, 0x63, 0xEB),
            dim: Color::Rgb(0x64, 0x74, 0x8B),
            border: Color::Rgb(0x33, 0x33, 0x33),
            red: Color::Rgb(0xDC, 0x26, 0x26),
            yellow: Color::Rgb(0xCA, 0x8A, 0x04),
            green: Color::Rgb(0x15, 0x80, 0x3D),
            blue: Color::Rgb(0x25, 0x63, 0xEB),
            selection_bg: Color::Rgb(0xE2, 0xE8, 0xF0),
            done_bg: Color::Rgb(0xDC, 0xFC, 0xE7),
            done_fg: Color::Rgb(0x16, 0x65, 0x34),
        }
    }

    pub fn dark() -> Self {
        Theme {
            background: Color::Rgb(0x0D, 0x11, 0x17),
            text: Color::Rgb(0xC9, 0xD1, 0xD9),
            text_bright: Color::Rgb(0xF0, 0xF6, 0xFC),
            highlight: Color::Rgb(0x58, 0xA6, 0xFF),
            dim: Color::Rgb(0x8B, 0x94, 0x9E),
            border: Color::Rgb(0x8B, 0x94, 0x9E),
            red: Color::Rgb(0xF8, 0x51, 0x49),
            yellow: Color::Rgb(0xD2, 0x99, 0x22),
            green: Color::Rgb(0x3F, 0xB9, 0x50),
            blue: Color::Rgb(0x58, 0xA6, 0xFF),
            selection_bg: Color::Rgb(0x16, 0x1B, 0x22),
            done_bg: Color::Rgb(0xDC, 0xFC, 0xE7),
            done_fg: Color::Rgb(0x16, 0x65, 0x34),
        }
    }

    /// Base palette for `mode` with `[ui.colors.<mode>]` overrides applied
    pub fn for_mode(mode: ThemeMode, colors: &ThemeColors) -> Self {
        let (mut theme, overrides) = match mode {
            ThemeMode::Light => (Theme::light(), &colors.light),
            ThemeMode::Dark => (Theme::dark(), &colors.dark),
        };
        theme.apply_overrides(overrides);
        theme
    }

    fn apply_overrides(&mut self, overrides: &HashMap<String, String>) {
        for (key, value) in overrides {
            let Some(color) = parse_hex_color(value) else {
                tracing::warn!(key = %key, value = %value, "ignoring invalid color");
                continue;
            };
            match key.as_str() {
                "background" => self.background = color,
                "text" => self.text = color,
                "text_bright" => self.text_bright = color,
                "highlight" => self.highlight = color,
                "dim" => self.dim = color,
                "border" => self.border = color,
                "red" => self.red = color,
                "yellow" => self.yellow = color,
                "green" => self.green = color,
                "blue" => self.blue = color,
                "selection_bg" => self.selection_bg = color,
                "done_bg" => self.done_bg = color,
                "done_fg" => self.done_fg = color,
                _ => tracing::warn!(key = %key, "unknown color key"),
            }
        }
    }
}

/// Parse a hex color string like "#FF4444" into an RGB Color
fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}
