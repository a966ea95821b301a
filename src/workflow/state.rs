//! The persisted workflow aggregate.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::plan::PlanItem;

/// One discrete state of the workflow session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// No request in progress
    #[default]
    Idle,
    /// Questions asked, collecting answers
    Clarification,
    /// Plan generation in flight
    Planning,
    /// Plan available for execution
    Ready,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Idle => "idle",
            Phase::Clarification => "clarification",
            Phase::Planning => "planning",
            Phase::Ready => "ready",
        };
        f.write_str(name)
    }
}

/// The session's single mutable aggregate.
///
/// Invariants (restored by [`WorkflowState::sanitized`] after loading):
/// - `clarification_answers.len() <= clarification_questions.len()`
/// - `plan` is non-empty only in [`Phase::Ready`]
/// - `user_request` is empty only in [`Phase::Idle`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowState {
    /// Current phase
    pub phase: Phase,

    /// The feature request being planned
    pub user_request: String,

    /// Questions asked on entering clarification
    pub clarification_questions: Vec<String>,

    /// Answers, in the order given
    pub clarification_answers: Vec<String>,

    /// Generated plan (ready phase only)
    pub plan: Vec<PlanItem>,

    /// Last successful transition
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl WorkflowState {
    /// Whether every question has an answer.
    pub fn answers_complete(&self) -> bool {
        !self.clarification_questions.is_empty()
            && self.clarification_answers.len() >= self.clarification_questions.len()
    }

    /// The next question without an answer.
    pub fn pending_question(&self) -> Option<&str> {
        self.clarification_questions.get(self.clarification_answers.len()).map(String::as_str)
    }

    /// Questions paired with their answers so far.
    pub fn answered_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.clarification_questions
            .iter()
            .zip(&self.clarification_answers)
            .map(|(q, a)| (q.as_str(), a.as_str()))
    }

    /// Stamp the state with the current time.
    pub fn touch(&mut self) {
        self.updated_at = Some(Utc::now());
    }

    /// Bring a loaded state back within its invariants.
    ///
    /// A persisted `planning` phase means the process stopped mid-generation;
    /// it resumes in `clarification` so the plan can be requested again.
    pub fn sanitized(mut self) -> Self {
        let original = self.clone();

        if self.phase == Phase::Planning {
            self.phase = Phase::Clarification;
        }

        self.clarification_answers.truncate(self.clarification_questions.len());

        if self.phase != Phase::Ready {
            self.plan.clear();
        } else if self.plan.is_empty() {
            self.phase = Phase::Clarification;
        }

        if self.phase == Phase::Clarification
            && (self.clarification_questions.is_empty() || self.user_request.is_empty())
        {
            self.phase = Phase::Idle;
        }

        if self.phase == Phase::Idle {
            self = Self { updated_at: self.updated_at, ..Self::default() };
        }

        if self != original {
            tracing::warn!(
                from = %original.phase,
                to = %self.phase,
                "Persisted workflow state was inconsistent and has been repaired"
            );
        }

        self
    }
}
