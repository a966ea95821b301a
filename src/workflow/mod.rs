//! Workflow engine.
//!
//! Drives a planning session through its phases:
//!
//! - `idle` - nothing in progress
//! - `clarification` - questions asked, answers being collected
//! - `planning` - plan generation in flight (never persisted)
//! - `ready` - plan available for execution
//!
//! The engine owns the single [`WorkflowState`], persists it through a
//! [`StateStore`] after every successful transition, and reports progress as
//! [`WorkflowEvent`]s.

mod apply;
mod engine;
mod error;
mod events;
mod plan;
mod state;
mod store;

pub use apply::{FileApplyError, PlanApplier, ScaffoldApplier};
pub use engine::{
    AnswerProgress, AutoConfirm, Confirm, ExecutionReport, ItemOutcome, WorkflowEngine,
    WorkflowStatus,
};
pub use error::{InputValidationError, WorkflowError};
pub use events::{NoticeLevel, WorkflowEvent};
pub use plan::{plan_to_markdown, PlanAction, PlanItem, PlanSummary};
pub use state::{Phase, WorkflowState};
pub use store::{JsonFileStore, MemoryStore, StateStore, StoreError};
