//! Applying plan items to a workspace.
//!
//! The engine hands each item to a [`PlanApplier`] in plan order and only
//! counts outcomes; what "applying" means is up to the collaborator.
//! [`ScaffoldApplier`] is the built-in one: it lays out the file structure a
//! plan describes without writing any code.

use std::fs;
use std::path::{Component, Path, PathBuf};

use super::plan::{PlanAction, PlanItem};

/// Why a single plan item could not be applied.
#[derive(Debug, thiserror::Error)]
pub enum FileApplyError {
    #[error("{path}: file already exists")]
    AlreadyExists { path: String },

    #[error("{path}: file not found")]
    NotFound { path: String },

    #[error("{path}: path is outside the project root")]
    OutsideRoot { path: String },

    #[error("{path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}: {message}")]
    Rejected { path: String, message: String },
}

/// Applies one plan item at a time.
pub trait PlanApplier {
    /// Apply a single item.
    fn apply_plan_item(&mut self, item: &PlanItem) -> Result<(), FileApplyError>;
}

/// Creates, checks, and removes files under a project root.
///
/// - `new` creates an empty file (and its parent directories); fails if it exists
/// - `modify` verifies the file exists; the content change is left to the user
/// - `remove` deletes the file; fails if it is missing
#[derive(Debug, Clone)]
pub struct ScaffoldApplier {
    root: PathBuf,
    dry_run: bool,
}

impl ScaffoldApplier {
    /// Applier rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into(), dry_run: false }
    }

    /// Validate items without touching the filesystem.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Resolve a plan path against the root, refusing escapes.
    fn resolve(&self, file: &str) -> Result<PathBuf, FileApplyError> {
        let relative = Path::new(file);
        let escapes = relative.components().any(|c| {
            matches!(c, Component::ParentDir | Component::RootDir | Component::Prefix(_))
        });

        if escapes || file.trim().is_empty() {
            return Err(FileApplyError::OutsideRoot { path: file.to_string() });
        }

        Ok(self.root.join(relative))
    }
}

impl PlanApplier for ScaffoldApplier {
    fn apply_plan_item(&mut self, item: &PlanItem) -> Result<(), FileApplyError> {
        let path = self.resolve(&item.file)?;
        let io = |source: std::io::Error| FileApplyError::Io { path: item.file.clone(), source };

        match item.action {
            PlanAction::New => {
                if path.exists() {
                    return Err(FileApplyError::AlreadyExists { path: item.file.clone() });
                }
                if !self.dry_run {
                    if let Some(parent) = path.parent() {
                        fs::create_dir_all(parent).map_err(io)?;
                    }
                    fs::OpenOptions::new().write(true).create_new(true).open(&path).map_err(io)?;
                }
            }
            PlanAction::Modify => {
                if !path.is_file() {
                    return Err(FileApplyError::NotFound { path: item.file.clone() });
                }
            }
            PlanAction::Remove => {
                if !path.is_file() {
                    return Err(FileApplyError::NotFound { path: item.file.clone() });
                }
                if !self.dry_run {
                    fs::remove_file(&path).map_err(io)?;
                }
            }
        }

        tracing::info!(
            file = %item.file,
            action = %item.action,
            dry_run = self.dry_run,
            "Applied plan item"
        );
        Ok(())
    }
}
