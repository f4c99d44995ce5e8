use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::io::lock::{FileLock, LockError};
use crate::io::recovery::atomic_write;

/// Error type for backend and store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed document: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Lock(#[from] LockError),
    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

/// A key-value blob store. The document under a row is opaque here.
pub trait Backend {
    /// The content stored under `row_id`, or `None` if the row is absent
    fn fetch(&self, row_id: u64) -> Result<Option<Value>, StoreError>;
    /// Overwrite the content stored under `row_id`
    fn store(&self, row_id: u64, content: &Value) -> Result<(), StoreError>;
    /// Human-readable location, for logs and `wf where`
    fn describe(&self) -> String;
}

/// On-disk record: `{ "id": 1, "content": { ... } }`
#[derive(Debug, Serialize, Deserialize)]
struct Row {
    id: u64,
    content: Value,
}

/// Rows kept as `rows/<id>.json` under a data directory
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileBackend { dir: dir.into() }
    }

    pub fn row_path(&self, row_id: u64) -> PathBuf {
        self.dir.join("rows").join(format!("{}.json", row_id))
    }

    /// Lock file guarding writes to one row
    pub fn lock_path(&self, row_id: u64) -> PathBuf {
        self.dir.join("rows").join(format!("{}.lock", row_id))
    }
}

impl Backend for FileBackend {
    fn fetch(&self, row_id: u64) -> Result<Option<Value>, StoreError> {
        let path = self.row_path(row_id);
        let text = match fs::read_to_string(&path) {
            Ok(t) => t,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::ReadError { path, source: e }),
        };
        let row: Row = serde_json::from_str(&text)?;
        Ok(Some(row.content))
    }

    fn store(&self, row_id: u64, content: &Value) -> Result<(), StoreError> {
        let path = self.row_path(row_id);
        let rows_dir = self.dir.join("rows");
        fs::create_dir_all(&rows_dir).map_err(|e| StoreError::WriteError {
            path: rows_dir.clone(),
            source: e,
        })?;
        let _lock = FileLock::acquire_default(&self.lock_path(row_id))?;
        let row = Row {
            id: row_id,
            content: content.clone(),
        };
        let text = serde_json::to_string_pretty(&row)?;
        atomic_write(&path, text.as_bytes()).map_err(|e| StoreError::WriteError { path, source: e })
    }

    fn describe(&self) -> String {
        self.dir.display().to_string()
    }
}

/// In-process rows, with switches to simulate an unreachable backend
#[derive(Debug, Default)]
pub struct MemoryBackend {
    rows: RefCell<HashMap<u64, Value>>,
    fail_reads: Cell<bool>,
    fail_writes: Cell<bool>,
    writes: Cell<usize>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_row(row_id: u64, content: Value) -> Self {
        let backend = Self::default();
        backend.rows.borrow_mut().insert(row_id, content);
        backend
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.set(fail);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    /// Successful writes so far
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }

    pub fn row(&self, row_id: u64) -> Option<Value> {
        self.rows.borrow().get(&row_id).cloned()
    }
}

impl Backend for MemoryBackend {
    fn fetch(&self, row_id: u64) -> Result<Option<Value>, StoreError> {
        if self.fail_reads.get() {
            return Err(StoreError::Unavailable("reads disabled".into()));
        }
        Ok(self.row(row_id))
    }

    fn store(&self, row_id: u64, content: &Value) -> Result<(), StoreError> {
        if self.fail_writes.get() {
            return Err(StoreError::Unavailable("writes disabled".into()));
        }
        self.rows.borrow_mut().insert(row_id, content.clone());
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

impl<B: Backend + ?Sized> Backend for std::rc::Rc<B> {
    fn fetch(&self, row_id: u64) -> Result<Option<Value>, StoreError> {
        (**self).fetch(row_id)
    }

    fn store(&self, row_id: u64, content: &Value) -> Result<(), StoreError> {
        (**self).store(row_id, content)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}
