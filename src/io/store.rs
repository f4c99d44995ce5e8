use std::path::PathBuf;

use chrono::Utc;

use crate::io::backend::{Backend, StoreError};
use crate::io::recovery::{RecoveryCategory, RecoveryEntry, log_recovery};
use crate::model::board::AppState;
use crate::ops::board_ops::normalize_state;

/// Outcome of the most recent save, shown as the sync indicator
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SyncStatus {
    /// Nothing written yet in this session
    #[default]
    Idle,
    Saved,
    Failed(String),
}

/// Loads and saves the whole `AppState` as a single document under one
/// fixed row of a backend. Nothing else talks to the backend.
pub struct Store {
    backend: Box<dyn Backend>,
    row_id: u64,
    /// Where dropped documents are kept (None: log only)
    recovery_dir: Option<PathBuf>,
}

impl Store {
    pub fn new(backend: Box<dyn Backend>, row_id: u64) -> Self {
        Store {
            backend,
            row_id,
            recovery_dir: None,
        }
    }

    pub fn with_recovery_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.recovery_dir = Some(dir.into());
        self
    }

    pub fn row_id(&self) -> u64 {
        self.row_id
    }

    pub fn describe(&self) -> String {
        format!("{} (row {})", self.backend.describe(), self.row_id)
    }

    /// Fetch the stored document. Any failure is logged and yields the
    /// default empty state. No retry.
    pub fn load(&self) -> AppState {
        let mut state = match self.try_load() {
            Ok(Some(state)) => state,
            Ok(None) => {
                tracing::info!(row = self.row_id, "no stored document, starting empty");
                AppState::default()
            }
            Err(e) => {
                tracing::error!(row = self.row_id, error = %e, "load failed, starting empty");
                AppState::default()
            }
        };
        for (board, days) in normalize_state(&mut state) {
            tracing::warn!(board = %board, ?days, "dropped out-of-range day buckets");
        }
        state
    }

    fn try_load(&self) -> Result<Option<AppState>, StoreError> {
        let Some(content) = self.backend.fetch(self.row_id)? else {
            return Ok(None);
        };
        match serde_json::from_value::<AppState>(content.clone()) {
            Ok(state) => Ok(Some(state)),
            Err(e) => {
                if let Some(dir) = &self.recovery_dir {
                    log_recovery(
                        dir,
                        RecoveryEntry {
                            timestamp: Utc::now(),
                            category: RecoveryCategory::Load,
                            description: "unreadable document".to_string(),
                            fields: vec![
                                ("Row".to_string(), self.row_id.to_string()),
                                ("Error".to_string(), e.to_string()),
                            ],
                            body: serde_json::to_string_pretty(&content).unwrap_or_default(),
                        },
                    );
                }
                Err(StoreError::Json(e))
            }
        }
    }

    /// Overwrite the stored document with `state`. On failure the error is
    /// logged, the document goes to the recovery log, and the write is
    /// dropped. The in-memory state is left as is.
    pub fn save(&self, state: &AppState) -> SyncStatus {
        match self.try_save(state) {
            Ok(()) => {
                tracing::debug!(row = self.row_id, boards = state.boards.len(), "saved");
                SyncStatus::Saved
            }
            Err(e) => {
                tracing::error!(row = self.row_id, error = %e, "save failed, write dropped");
                if let Some(dir) = &self.recovery_dir {
                    log_recovery(
                        dir,
                        RecoveryEntry {
                            timestamp: Utc::now(),
                            category: RecoveryCategory::Save,
                            description: "save dropped".to_string(),
                            fields: vec![
                                ("Row".to_string(), self.row_id.to_string()),
                                ("Error".to_string(), e.to_string()),
                            ],
                            body: serde_json::to_string_pretty(state).unwrap_or_default(),
                        },
                    );
                }
                SyncStatus::Failed(e.to_string())
            }
        }
    }

    fn try_save(&self, state: &AppState) -> Result<(), StoreError> {
        let content = serde_json::to_value(state)?;
        self.backend.store(self.row_id, &content)
    }
}
