use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::model::config::ThemeMode;

/// Local preferences (written to .prefs.json), never sent to the backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Prefs {
    #[serde(default)]
    pub theme: ThemeMode,
    /// Last flow sub-tab ("diagram" or "checklist")
    #[serde(default)]
    pub flow_tab: Option<String>,
}

/// Read .prefs.json from the data directory
pub fn read_prefs(data_dir: &Path) -> Option<Prefs> {
    let content = fs::read_to_string(data_dir.join(".prefs.json")).ok()?;
    serde_json::from_str(&content).ok()
}

/// Write .prefs.json to the data directory
pub fn write_prefs(data_dir: &Path, prefs: &Prefs) -> Result<(), std::io::Error> {
    fs::create_dir_all(data_dir)?;
    let content = serde_json::to_string_pretty(prefs)?;
    fs::write(data_dir.join(".prefs.json"), content)
}
