//! The workflow state machine.
//!
//! ```text
//! idle --start--> clarification --answer*--> clarification --submit--> planning --> ready
//!   ^                  |                                                   |          |
//!   |                  +------------------ start (re-ask) -----------------+          |
//!   +------------------------------- execute / restart ------------------------------+
//! ```
//!
//! Every successful transition is written to the [`StateStore`] before it
//! becomes visible; a failed step leaves both the stored and the in-memory
//! state in the last good phase.

use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};

use crate::ai::{BackendStatus, GenerationAdapter};
use crate::context::{ContextAggregator, ProjectContext};
use crate::core::{FallbackResult, GeneralConfig};

use super::apply::PlanApplier;
use super::error::{InputValidationError, WorkflowError};
use super::events::WorkflowEvent;
use super::plan::{plan_to_markdown, PlanItem, PlanSummary};
use super::state::{Phase, WorkflowState};
use super::store::StateStore;

/// Asks the user to approve a destructive step.
pub trait Confirm {
    /// Return `true` to proceed.
    fn confirm(&mut self, prompt: &str) -> bool;
}

/// Gives the same answer to every prompt.
#[derive(Debug, Clone, Copy)]
pub struct AutoConfirm(pub bool);

impl Confirm for AutoConfirm {
    fn confirm(&mut self, prompt: &str) -> bool {
        tracing::debug!(prompt, approved = self.0, "Auto-answered confirmation");
        self.0
    }
}

/// Progress after an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerProgress {
    pub answered: usize,
    pub total: usize,
}

impl AnswerProgress {
    /// Whether every question now has an answer.
    pub fn is_complete(&self) -> bool {
        self.answered >= self.total
    }
}

/// Outcome of applying one plan item.
#[derive(Debug, Clone)]
pub struct ItemOutcome {
    pub item: PlanItem,
    /// Failure message, `None` on success
    pub error: Option<String>,
}

/// Result of [`WorkflowEngine::execute`].
#[derive(Debug, Clone)]
pub struct ExecutionReport {
    /// The request the plan was built for
    pub request: String,
    /// Per-item outcomes, in plan order
    pub outcomes: Vec<ItemOutcome>,
}

impl ExecutionReport {
    /// Items applied successfully.
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.error.is_none()).count()
    }

    /// Items in the plan.
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    /// Items that failed.
    pub fn failures(&self) -> impl Iterator<Item = &ItemOutcome> {
        self.outcomes.iter().filter(|o| o.error.is_some())
    }

    /// Check if every item was applied.
    pub fn is_successful(&self) -> bool {
        self.succeeded() == self.total()
    }
}

/// Point-in-time view of the session.
#[derive(Debug, Clone)]
pub struct WorkflowStatus {
    pub phase: Phase,
    pub request: String,
    pub answered: usize,
    pub questions: usize,
    pub plan: PlanSummary,
    pub can_submit: bool,
    pub backend: BackendStatus,
}

/// Drives one planning session through its phases.
pub struct WorkflowEngine {
    state: WorkflowState,
    store: Box<dyn StateStore>,
    adapter: GenerationAdapter,
    aggregator: ContextAggregator,
    confirm: Box<dyn Confirm>,
    settings: GeneralConfig,
    root: Option<PathBuf>,
    context: Option<ProjectContext>,
    event_tx: Sender<WorkflowEvent>,
    event_rx: Receiver<WorkflowEvent>,
}

impl WorkflowEngine {
    /// Create an engine, reloading any persisted session from `store`.
    ///
    /// A stored state that cannot be read is reported and replaced by a
    /// fresh idle session.
    pub fn new(store: Box<dyn StateStore>, adapter: GenerationAdapter) -> Self {
        let (event_tx, event_rx) = mpsc::channel();

        let state = match store.load() {
            Ok(Some(state)) => {
                let state = state.sanitized();
                tracing::info!(phase = %state.phase, "Resumed workflow session");
                state
            }
            Ok(None) => WorkflowState::default(),
            Err(e) => {
                tracing::warn!(error = %e, "Could not load workflow state, starting fresh");
                let _ = event_tx.send(WorkflowEvent::warning(format!(
                    "Previous session could not be restored ({e}); starting fresh"
                )));
                WorkflowState::default()
            }
        };

        Self {
            state,
            store,
            adapter,
            aggregator: ContextAggregator::default(),
            confirm: Box::new(AutoConfirm(false)),
            settings: GeneralConfig::default(),
            root: None,
            context: None,
            event_tx,
            event_rx,
        }
    }

    /// Project root to build context from.
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    /// Use a custom context aggregator.
    pub fn with_aggregator(mut self, aggregator: ContextAggregator) -> Self {
        self.aggregator = aggregator;
        self
    }

    /// Confirmation collaborator for execute and restart.
    pub fn with_confirm(mut self, confirm: Box<dyn Confirm>) -> Self {
        self.confirm = confirm;
        self
    }

    /// Input validation thresholds.
    pub fn with_settings(mut self, settings: GeneralConfig) -> Self {
        self.settings = settings;
        self
    }

    /// Current session state.
    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    /// The cached project context, once built.
    pub fn context(&self) -> Option<&ProjectContext> {
        self.context.as_ref()
    }

    /// The generation adapter.
    pub fn adapter(&self) -> &GenerationAdapter {
        &self.adapter
    }

    /// Whether `submit` would be accepted now.
    pub fn can_submit(&self) -> bool {
        self.state.phase == Phase::Clarification && self.state.answers_complete()
    }

    /// Drain queued events (non-blocking).
    pub fn poll_events(&self) -> Vec<WorkflowEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.event_rx.try_recv() {
            events.push(event);
        }
        events
    }

    /// Snapshot of the session.
    pub fn status(&self) -> WorkflowStatus {
        WorkflowStatus {
            phase: self.state.phase,
            request: self.state.user_request.clone(),
            answered: self.state.clarification_answers.len(),
            questions: self.state.clarification_questions.len(),
            plan: PlanSummary::from_items(&self.state.plan),
            can_submit: self.can_submit(),
            backend: self.adapter.status().clone(),
        }
    }

    /// The current plan as Markdown, if there is one.
    pub fn plan_markdown(&self) -> Option<String> {
        (self.state.phase == Phase::Ready)
            .then(|| plan_to_markdown(&self.state.user_request, &self.state.plan))
    }

    /// Re-check the reasoning backend.
    pub async fn refresh_backend(&mut self) -> BackendStatus {
        let status = self.adapter.refresh().await.clone();
        match &status {
            BackendStatus::Ready { provider, .. } => {
                self.emit(WorkflowEvent::info(format!("Connected to {provider}")));
            }
            BackendStatus::Fallback(reason) => {
                self.emit(WorkflowEvent::warning(format!("Backend unavailable: {reason}")));
            }
        }
        status
    }

    /// Begin (or re-begin) planning `request`; returns the questions asked.
    pub async fn start(&mut self, request: &str) -> Result<Vec<String>, WorkflowError> {
        self.require(&[Phase::Idle, Phase::Clarification], "start")?;

        let request = request.trim();
        self.validate("request", request, self.settings.min_request_len)?;

        self.ensure_context();

        let result = self.adapter.propose_clarifications(request, self.context.as_ref()).await;
        self.report_fallback(&result, "clarification questions");
        let questions = result.into_inner();

        if questions.is_empty() {
            self.emit(WorkflowEvent::error("No clarification questions could be produced"));
            self.commit(WorkflowState::default())?;
            return Err(WorkflowError::GenerationFailed("clarification questions"));
        }

        let next = WorkflowState {
            phase: Phase::Clarification,
            user_request: request.to_string(),
            clarification_questions: questions.clone(),
            ..WorkflowState::default()
        };
        self.commit(next)?;

        tracing::info!(questions = questions.len(), "Started planning session");
        self.emit(WorkflowEvent::QuestionProgress { answered: 0, total: questions.len() });
        Ok(questions)
    }

    /// Record the answer to the next open question.
    pub fn answer(&mut self, text: &str) -> Result<AnswerProgress, WorkflowError> {
        self.require(&[Phase::Clarification], "answer")?;

        let total = self.state.clarification_questions.len();
        if self.state.clarification_answers.len() >= total {
            self.emit(WorkflowEvent::warning("All questions are already answered"));
            return Err(WorkflowError::AnswersComplete(total));
        }

        let text = text.trim();
        self.validate("answer", text, self.settings.min_answer_len)?;

        let mut next = self.state.clone();
        next.clarification_answers.push(text.to_string());
        self.commit(next)?;

        let progress = AnswerProgress { answered: self.state.clarification_answers.len(), total };
        self.emit(WorkflowEvent::QuestionProgress {
            answered: progress.answered,
            total: progress.total,
        });
        if progress.is_complete() {
            self.emit(WorkflowEvent::info("All questions answered, ready to submit"));
        }

        Ok(progress)
    }

    /// Generate the plan from the collected answers.
    pub async fn submit(&mut self) -> Result<Vec<PlanItem>, WorkflowError> {
        self.require(&[Phase::Clarification], "submit")?;

        if !self.state.answers_complete() {
            let answered = self.state.clarification_answers.len();
            let total = self.state.clarification_questions.len();
            self.emit(WorkflowEvent::warning(format!(
                "Answer all questions before submitting ({answered}/{total})"
            )));
            return Err(WorkflowError::AnswersIncomplete { answered, total });
        }

        self.set_phase(Phase::Planning);
        self.ensure_context();

        let answers: Vec<(&str, &str)> = self.state.answered_pairs().collect();
        let result = self
            .adapter
            .propose_plan(&self.state.user_request, &answers, self.context.as_ref())
            .await;
        self.report_fallback(&result, "the plan");
        let plan = result.into_inner();

        if plan.is_empty() {
            self.set_phase(Phase::Clarification);
            self.emit(WorkflowEvent::error("No plan could be produced"));
            return Err(WorkflowError::GenerationFailed("a plan"));
        }

        let mut next = self.state.clone();
        next.phase = Phase::Ready;
        next.plan = plan.clone();

        if let Err(e) = self.commit(next) {
            self.set_phase(Phase::Clarification);
            return Err(e);
        }

        let summary = PlanSummary::from_items(&plan);
        tracing::info!(items = plan.len(), %summary, "Plan ready");
        self.emit(WorkflowEvent::PlanReady(summary));
        Ok(plan)
    }

    /// Apply every plan item, then return to idle.
    ///
    /// Item failures are collected, not fatal. The session resets to idle
    /// whatever the outcome; if that reset cannot be saved the report is
    /// still returned and the failure is reported as an error notice.
    pub fn execute(
        &mut self,
        applier: &mut dyn PlanApplier,
    ) -> Result<ExecutionReport, WorkflowError> {
        self.require(&[Phase::Ready], "execute")?;

        if self.state.plan.is_empty() {
            return Err(WorkflowError::NoPlan);
        }

        let prompt = format!("Apply {} planned changes?", self.state.plan.len());
        if !self.confirm.confirm(&prompt) {
            self.emit(WorkflowEvent::info("Execution cancelled"));
            return Err(WorkflowError::Cancelled);
        }

        let mut outcomes = Vec::with_capacity(self.state.plan.len());
        for item in &self.state.plan {
            let error = match applier.apply_plan_item(item) {
                Ok(()) => None,
                Err(e) => {
                    tracing::warn!(file = %item.file, error = %e, "Plan item failed");
                    Some(e.to_string())
                }
            };

            let _ = self.event_tx.send(WorkflowEvent::ItemApplied {
                file: item.file.clone(),
                action: item.action,
                error: error.clone(),
            });
            outcomes.push(ItemOutcome { item: item.clone(), error });
        }

        let report = ExecutionReport { request: self.state.user_request.clone(), outcomes };
        tracing::info!(succeeded = report.succeeded(), total = report.total(), "Plan executed");
        self.emit(WorkflowEvent::ExecutionFinished {
            succeeded: report.succeeded(),
            total: report.total(),
        });

        if let Err(e) = self.reset() {
            tracing::warn!(error = %e, "Plan executed but the reset session was not saved");
        }
        Ok(report)
    }

    /// Discard the session after confirmation.
    pub fn restart(&mut self) -> Result<(), WorkflowError> {
        if !self.confirm.confirm("Discard the current session and start over?") {
            self.emit(WorkflowEvent::info("Restart cancelled"));
            return Err(WorkflowError::Cancelled);
        }

        self.reset()?;
        self.emit(WorkflowEvent::info("Session cleared"));
        Ok(())
    }

    /// Build the project context once; failures only cost the context.
    fn ensure_context(&mut self) {
        if self.context.is_some() {
            return;
        }

        let Some(root) = &self.root else {
            tracing::debug!("No project root configured, planning without context");
            return;
        };

        match self.aggregator.analyze(root) {
            Ok(context) => self.context = Some(context),
            Err(e) => {
                tracing::warn!(error = %e, "Planning without project context");
                self.emit(WorkflowEvent::warning(format!("{e}; planning without project context")));
            }
        }
    }

    /// Turn a fallback after a healthy start into a user-visible warning.
    fn report_fallback<T>(&self, result: &FallbackResult<T>, what: &str) {
        if !result.used_fallback {
            return;
        }

        let reason = result.fallback_description.as_deref().unwrap_or("unknown reason");
        if self.adapter.is_backend_ready() {
            self.emit(WorkflowEvent::warning(format!(
                "Backend could not produce {what} ({reason}); using built-in suggestions"
            )));
        } else {
            tracing::debug!(reason, "Using built-in {what}");
        }
    }

    fn require(&self, allowed: &[Phase], operation: &'static str) -> Result<(), WorkflowError> {
        if allowed.contains(&self.state.phase) {
            return Ok(());
        }
        self.emit(WorkflowEvent::warning(format!(
            "Cannot {operation} while the workflow is {}",
            self.state.phase
        )));
        Err(WorkflowError::InvalidPhase { operation, phase: self.state.phase })
    }

    fn validate(&self, field: &'static str, value: &str, min: usize) -> Result<(), WorkflowError> {
        InputValidationError::check(field, value, min).map_err(|e| {
            self.emit(WorkflowEvent::warning(e.to_string()));
            WorkflowError::from(e)
        })
    }

    /// Persist `next`, then make it current.
    fn commit(&mut self, mut next: WorkflowState) -> Result<(), WorkflowError> {
        next.touch();
        if let Err(e) = self.store.save(&next) {
            tracing::error!(error = %e, "Failed to persist workflow state");
            self.emit(WorkflowEvent::error(format!("Could not save the session: {e}")));
            return Err(e.into());
        }

        let from = self.state.phase;
        self.state = next;
        if from != self.state.phase {
            self.emit(WorkflowEvent::PhaseChanged { from, to: self.state.phase });
        }
        Ok(())
    }

    /// In-memory phase change (planning is never persisted).
    fn set_phase(&mut self, phase: Phase) {
        let from = self.state.phase;
        if from != phase {
            self.state.phase = phase;
            self.emit(WorkflowEvent::PhaseChanged { from, to: phase });
        }
    }

    /// Return to idle; memory is cleared even if persisting fails.
    fn reset(&mut self) -> Result<(), WorkflowError> {
        let result = self.commit(WorkflowState::default());
        if result.is_err() {
            self.set_phase(Phase::Idle);
            self.state = WorkflowState::default();
        }
        result
    }

    fn emit(&self, event: WorkflowEvent) {
        let _ = self.event_tx.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::ReasoningBackend;
    use crate::core::DegradationReason;
    use crate::workflow::{FileApplyError, MemoryStore, NoticeLevel, StoreError};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;

    fn engine(store: &MemoryStore) -> WorkflowEngine {
        WorkflowEngine::new(
            Box::new(store.clone()),
            GenerationAdapter::offline(DegradationReason::MissingCredentials),
        )
        .with_confirm(Box::new(AutoConfirm(true)))
    }

    #[tokio::test]
    async fn test_short_request_is_rejected_without_mutation() {
        let store = MemoryStore::new();
        let mut engine = engine(&store);

        let err = engine.start("login").await.unwrap_err();
        assert!(matches!(err, WorkflowError::InvalidInput(InputValidationError::TooShort { .. })));
        assert_eq!(engine.phase(), Phase::Idle);
        assert!(engine.state().clarification_questions.is_empty());
        assert_eq!(store.save_count(), 0);
    }

    #[tokio::test]
    async fn test_start_enters_clarification_and_persists() {
        let store = MemoryStore::new();
        let mut engine = engine(&store);

        let questions = engine.start("Add a dark mode toggle").await.unwrap();
        assert_eq!(questions.len(), 2);
        assert_eq!(engine.phase(), Phase::Clarification);
        assert_eq!(store.snapshot().unwrap().clarification_questions, questions);

        let events = engine.poll_events();
        assert!(events.contains(&WorkflowEvent::PhaseChanged {
            from: Phase::Idle,
            to: Phase::Clarification
        }));
        assert!(events.contains(&WorkflowEvent::QuestionProgress { answered: 0, total: 2 }));
    }

    #[tokio::test]
    async fn test_restart_from_clarification_clears_answers() {
        let store = MemoryStore::new();
        let mut engine = engine(&store);
        engine.start("Add a dark mode toggle").await.unwrap();
        engine.answer("Everyone").unwrap();

        engine.start("Add a REST endpoint for orders").await.unwrap();
        assert!(engine.state().clarification_answers.is_empty());
        assert_eq!(engine.state().user_request, "Add a REST endpoint for orders");
    }

    #[tokio::test]
    async fn test_extra_answers_are_no_ops() {
        let store = MemoryStore::new();
        let mut engine = engine(&store);
        engine.start("Add a dark mode toggle").await.unwrap();

        assert!(!engine.answer("Everyone").unwrap().is_complete());
        assert!(engine.answer("Settings page").unwrap().is_complete());
        assert!(engine.can_submit());

        let err = engine.answer("One more").unwrap_err();
        assert!(matches!(err, WorkflowError::AnswersComplete(2)));
        assert_eq!(engine.state().clarification_answers, vec!["Everyone", "Settings page"]);
        assert_eq!(engine.phase(), Phase::Clarification);
    }

    #[tokio::test]
    async fn test_submit_requires_all_answers() {
        let store = MemoryStore::new();
        let mut engine = engine(&store);
        engine.start("Add a dark mode toggle").await.unwrap();
        engine.answer("Everyone").unwrap();
        engine.poll_events();

        let err = engine.submit().await.unwrap_err();
        assert!(matches!(err, WorkflowError::AnswersIncomplete { answered: 1, total: 2 }));
        assert_eq!(engine.phase(), Phase::Clarification);
        assert!(engine.poll_events().iter().any(|e| matches!(
            e,
            WorkflowEvent::Notice { level: NoticeLevel::Warning, .. }
        )));
    }

    #[tokio::test]
    async fn test_submit_passes_through_planning() {
        let store = MemoryStore::new();
        let mut engine = engine(&store);
        engine.start("Add a dark mode toggle").await.unwrap();
        engine.answer("Everyone").unwrap();
        engine.answer("Settings page").unwrap();
        engine.poll_events();

        let plan = engine.submit().await.unwrap();
        assert!(!plan.is_empty());
        assert_eq!(engine.phase(), Phase::Ready);

        let events = engine.poll_events();
        let phases: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                WorkflowEvent::PhaseChanged { to, .. } => Some(*to),
                _ => None,
            })
            .collect();
        assert_eq!(phases, vec![Phase::Planning, Phase::Ready]);
        assert!(engine.plan_markdown().unwrap().contains("## Create"));
    }

    #[test]
    fn test_invalid_phase() {
        let store = MemoryStore::new();
        let mut engine = engine(&store);

        let err = engine.answer("hello").unwrap_err();
        assert!(matches!(
            err,
            WorkflowError::InvalidPhase { operation: "answer", phase: Phase::Idle }
        ));

        struct Never;
        impl PlanApplier for Never {
            fn apply_plan_item(
                &mut self,
                _item: &PlanItem,
            ) -> Result<(), crate::workflow::FileApplyError> {
                unreachable!()
            }
        }
        assert!(matches!(engine.execute(&mut Never), Err(WorkflowError::InvalidPhase { .. })));
    }

    #[tokio::test]
    async fn test_declined_restart_keeps_session() {
        let store = MemoryStore::new();
        let mut engine = engine(&store).with_confirm(Box::new(AutoConfirm(false)));
        engine.start("Add a dark mode toggle").await.unwrap();

        assert!(matches!(engine.restart(), Err(WorkflowError::Cancelled)));
        assert_eq!(engine.phase(), Phase::Clarification);
    }

    /// Store whose saves start failing once `fail` is set.
    #[derive(Clone, Default)]
    struct FlakyStore {
        inner: MemoryStore,
        fail: Arc<AtomicBool>,
    }

    impl StateStore for FlakyStore {
        fn save(&self, state: &WorkflowState) -> Result<(), StoreError> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(StoreError::Io {
                    path: "state.json".into(),
                    source: std::io::Error::other("disk full"),
                });
            }
            self.inner.save(state)
        }

        fn load(&self) -> Result<Option<WorkflowState>, StoreError> {
            self.inner.load()
        }
    }

    /// Backend that counts calls and always returns the same reply.
    struct Counting {
        reply: &'static str,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl ReasoningBackend for Counting {
        async fn complete(&self, _prompt: &str) -> anyhow::Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.reply.to_string())
        }

        fn name(&self) -> &str {
            "counting"
        }

        async fn handshake(&self) -> anyhow::Result<()> {
            Ok(())
        }
    }

    struct Accept;

    impl PlanApplier for Accept {
        fn apply_plan_item(&mut self, _item: &PlanItem) -> Result<(), FileApplyError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_partial_submit_never_calls_backend() {
        let calls = Arc::new(AtomicUsize::new(0));
        let backend =
            Counting { reply: "1. Which tenant?\n2. Which roles?", calls: Arc::clone(&calls) };
        let mut engine = WorkflowEngine::new(
            Box::new(MemoryStore::new()),
            GenerationAdapter::with_backend(Box::new(backend)),
        );

        engine.start("Add user authentication with Auth0").await.unwrap();
        engine.answer("prod").unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let err = engine.submit().await.unwrap_err();
        assert!(matches!(err, WorkflowError::AnswersIncomplete { answered: 1, total: 2 }));
        assert_eq!(calls.load(Ordering::SeqCst), 1, "plan generation must not run");
        assert_eq!(engine.phase(), Phase::Clarification);
    }

    #[tokio::test]
    async fn test_execute_reports_even_when_reset_is_not_saved() {
        let store = FlakyStore::default();
        let mut engine = WorkflowEngine::new(
            Box::new(store.clone()),
            GenerationAdapter::offline(DegradationReason::MissingCredentials),
        )
        .with_confirm(Box::new(AutoConfirm(true)));

        engine.start("Add user authentication with Auth0").await.unwrap();
        for answer in ["Auth0", "Email", "Account pages"] {
            engine.answer(answer).unwrap();
        }
        engine.submit().await.unwrap();
        engine.poll_events();

        store.fail.store(true, Ordering::SeqCst);
        let report = engine.execute(&mut Accept).unwrap();

        assert_eq!((report.succeeded(), report.total()), (6, 6));
        assert_eq!(engine.phase(), Phase::Idle);
        assert_eq!(store.inner.snapshot().unwrap().phase, Phase::Ready);

        let events = engine.poll_events();
        assert!(events.contains(&WorkflowEvent::ExecutionFinished { succeeded: 6, total: 6 }));
        assert!(events.iter().any(|e| matches!(
            e,
            WorkflowEvent::Notice { level: NoticeLevel::Error, message }
                if message.contains("disk full")
        )));
    }

    #[tokio::test]
    async fn test_restart_clears_everything() {
        let store = MemoryStore::new();
        let mut engine = engine(&store);
        engine.start("Add a dark mode toggle").await.unwrap();

        engine.restart().unwrap();
        assert_eq!(
            engine.state(),
            &WorkflowState { updated_at: engine.state().updated_at, ..WorkflowState::default() }
        );
        assert_eq!(store.snapshot().unwrap().phase, Phase::Idle);
    }
}
