//! Workflow error types.

use super::state::Phase;
use super::store::StoreError;

/// User input rejected before any state change.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputValidationError {
    #[error("The {field} is empty")]
    Empty { field: &'static str },

    #[error("The {field} is too short ({actual} characters, at least {min} required)")]
    TooShort { field: &'static str, min: usize, actual: usize },
}

impl InputValidationError {
    /// Check that trimmed `value` has at least `min` characters.
    pub fn check(field: &'static str, value: &str, min: usize) -> Result<(), Self> {
        let actual = value.trim().chars().count();
        if actual == 0 {
            return Err(Self::Empty { field });
        }
        if actual < min {
            return Err(Self::TooShort { field, min, actual });
        }
        Ok(())
    }
}

/// Errors raised by [`WorkflowEngine`](super::WorkflowEngine) operations.
///
/// None of these leave the persisted state half-updated.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error(transparent)]
    InvalidInput(#[from] InputValidationError),

    #[error("Cannot {operation} while the workflow is {phase}")]
    InvalidPhase { operation: &'static str, phase: Phase },

    #[error("All {0} clarification questions are already answered")]
    AnswersComplete(usize),

    #[error("Only {answered} of {total} clarification questions are answered")]
    AnswersIncomplete { answered: usize, total: usize },

    #[error("There is no plan to execute")]
    NoPlan,

    #[error("Cancelled")]
    Cancelled,

    #[error("Could not produce {0}")]
    GenerationFailed(&'static str),

    #[error("Failed to persist workflow state: {0}")]
    Persist(#[from] StoreError),
}
