//! Workflow state persistence.
//!
//! The engine writes the whole [`WorkflowState`] after every successful
//! transition and reads it back once when constructed.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use super::state::WorkflowState;

/// Errors raised by a [`StateStore`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid workflow state: {0}")]
    Format(#[from] serde_json::Error),
}

/// A durable key/value slot for one workflow session.
pub trait StateStore: Send {
    /// Persist the full state, replacing what was stored before.
    fn save(&self, state: &WorkflowState) -> Result<(), StoreError>;

    /// Load the stored state, `None` when nothing was saved yet.
    fn load(&self) -> Result<Option<WorkflowState>, StoreError>;
}

/// Stores the session as pretty-printed JSON in `<dir>/<session_key>.json`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Store for `session_key` inside `dir`.
    pub fn new(dir: impl AsRef<Path>, session_key: &str) -> Self {
        let file_name: String = session_key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        Self { path: dir.as_ref().join(format!("{file_name}.json")) }
    }

    /// Store backed by an explicit file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io { path: self.path.clone(), source }
    }
}

impl StateStore for JsonFileStore {
    fn save(&self, state: &WorkflowState) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(state)?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        fs::write(&self.path, content).map_err(|e| self.io_error(e))?;
        tracing::debug!(path = %self.path.display(), phase = %state.phase, "Saved workflow state");
        Ok(())
    }

    fn load(&self) -> Result<Option<WorkflowState>, StoreError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path).map_err(|e| self.io_error(e))?;
        let state = serde_json::from_str(&content)?;
        Ok(Some(state))
    }
}

/// In-memory store; clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slot: Arc<Mutex<Option<WorkflowState>>>,
    saves: Arc<Mutex<usize>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-seeded with `state`.
    pub fn with_state(state: WorkflowState) -> Self {
        let store = Self::default();
        *store.slot.lock().unwrap_or_else(|e| e.into_inner()) = Some(state);
        store
    }

    /// What is currently stored.
    pub fn snapshot(&self) -> Option<WorkflowState> {
        self.slot.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        *self.saves.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl StateStore for MemoryStore {
    fn save(&self, state: &WorkflowState) -> Result<(), StoreError> {
        *self.slot.lock().unwrap_or_else(|e| e.into_inner()) = Some(state.clone());
        *self.saves.lock().unwrap_or_else(|e| e.into_inner()) += 1;
        Ok(())
    }

    fn load(&self) -> Result<Option<WorkflowState>, StoreError> {
        Ok(self.snapshot())
    }
}
