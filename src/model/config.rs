use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Configuration from config.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Data directory (default: $XDG_DATA_HOME/weekflow)
    #[serde(default)]
    pub dir: Option<PathBuf>,
    /// The single record holding the whole document
    #[serde(default = "default_row_id")]
    pub row_id: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            dir: None,
            row_id: default_row_id(),
        }
    }
}

fn default_row_id() -> u64 {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Quiet period after the last resize event before redrawing
    #[serde(default = "default_resize_debounce_ms")]
    pub resize_debounce_ms: u64,
    /// View to open when `--mode` is not given ("flow", "manage", "boards")
    #[serde(default)]
    pub default_mode: Option<String>,
    #[serde(default)]
    pub colors: ThemeColors,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            resize_debounce_ms: default_resize_debounce_ms(),
            default_mode: None,
            colors: ThemeColors::default(),
        }
    }
}

fn default_resize_debounce_ms() -> u64 {
    250
}

/// Per-theme color overrides: `[ui.colors.dark] background = "#0D1117"`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThemeColors {
    #[serde(default)]
    pub light: HashMap<String, String>,
    #[serde(default)]
    pub dark: HashMap<String, String>,
}

/// Light or dark color scheme, persisted as a local preference
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }

    pub fn parse_mode(s: &str) -> Option<Self> {
        match s {
            "light" => Some(ThemeMode::Light),
            "dark" => Some(ThemeMode::Dark),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// tracing filter directive used when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
