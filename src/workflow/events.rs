//! Notifications emitted by the workflow engine.
//!
//! Events are queued on a channel and drained by the presentation layer with
//! [`WorkflowEngine::poll_events`](super::WorkflowEngine::poll_events).

use super::plan::{PlanAction, PlanSummary};
use super::state::Phase;

/// Severity of a [`WorkflowEvent::Notice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// Something the user should be told about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowEvent {
    /// The engine moved between phases.
    PhaseChanged { from: Phase, to: Phase },

    /// An answer was recorded.
    QuestionProgress { answered: usize, total: usize },

    /// A plan is ready for review.
    PlanReady(PlanSummary),

    /// One plan item was handed to the applier.
    ItemApplied {
        file: String,
        action: PlanAction,
        /// Failure message, `None` on success
        error: Option<String>,
    },

    /// Execution finished; the session is back to idle.
    ExecutionFinished { succeeded: usize, total: usize },

    /// Free-form message.
    Notice { level: NoticeLevel, message: String },
}

impl WorkflowEvent {
    pub(crate) fn info(message: impl Into<String>) -> Self {
        Self::Notice { level: NoticeLevel::Info, message: message.into() }
    }

    pub(crate) fn warning(message: impl Into<String>) -> Self {
        Self::Notice { level: NoticeLevel::Warning, message: message.into() }
    }

    pub(crate) fn error(message: impl Into<String>) -> Self {
        Self::Notice { level: NoticeLevel::Error, message: message.into() }
    }
}
