use crate::question::Question;
use crate::store::{AnswerRecord, AnswerStore};
use crate::timer::{time_limit_ms, Countdown, TimerStatus};
use chrono::Local;
use thiserror::Error;

/// Where a session currently sits in its lifecycle.
///
/// Loading -> InProgress -> Completed, with Failed reachable from Loading
/// only (question resolution failed or produced nothing). Completed and
/// Failed are terminal.
#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    Loading,
    InProgress,
    Completed,
    Failed(String),
}

#[derive(Debug, Error, PartialEq)]
pub enum SessionError {
    #[error("interview has no questions")]
    EmptyQuestionList,
    /// `begin` was called on a session that already left Loading, whether it
    /// started or failed.
    #[error("questions can only be assigned while loading")]
    NotLoading,
    /// A caller invoked an in-progress operation outside InProgress. This is
    /// a programming-contract violation: the Err is the loud signal, and
    /// ignoring it leaves a finished session untouched.
    #[error("{op} is only valid while a question is in progress")]
    InvalidTransition { op: &'static str },
}

/// Outcome of finalizing the current question.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// Finalized and moved to the question at `index`.
    Advanced { index: usize, record: AnswerRecord },
    /// Finalized the last question; the session is done.
    Completed { record: AnswerRecord },
}

/// Linear walk through an ordered question list with per-question countdowns.
///
/// The question list is assigned once at `begin` and never mutated. The
/// current index only ever increases; there is no way to revisit an earlier
/// question. Each question is finalized exactly once, either by an explicit
/// submit or by its countdown expiring, and the finalize appends one
/// immutable `AnswerRecord`.
///
/// Ticks come from the host's event loop; a manual submit cancels the live
/// countdown synchronously, so a tick arriving after the submit cannot
/// finalize the same index twice.
pub struct Session {
    phase: Phase,
    questions: Vec<Question>,
    current_index: usize,
    countdown: Countdown,
    draft: String,
    completed: Vec<AnswerRecord>,
    store: Option<Box<dyn AnswerStore>>,
    storage_warnings: Vec<String>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            phase: Phase::Loading,
            questions: Vec::new(),
            current_index: 0,
            countdown: Countdown::idle(),
            draft: String::new(),
            completed: Vec::new(),
            store: None,
            storage_warnings: Vec::new(),
        }
    }

    /// Attach a durable answer log. Appends happen as each question is
    /// finalized; append failures are collected as warnings, never fatal.
    pub fn with_store(mut self, store: Box<dyn AnswerStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Supply the resolved question list and start the first countdown.
    /// An empty list fails the session (there is nothing to administer).
    pub fn begin(&mut self, questions: Vec<Question>) -> Result<(), SessionError> {
        if self.phase != Phase::Loading {
            return Err(SessionError::NotLoading);
        }
        if questions.is_empty() {
            self.phase = Phase::Failed("interview has no questions".to_string());
            return Err(SessionError::EmptyQuestionList);
        }

        self.questions = questions;
        self.phase = Phase::InProgress;
        self.enter_question(0);
        Ok(())
    }

    /// Record a resolution failure. Only meaningful while still loading;
    /// a running session cannot be failed from outside.
    pub fn fail(&mut self, message: impl Into<String>) {
        if self.phase == Phase::Loading {
            self.phase = Phase::Failed(message.into());
        }
    }

    fn enter_question(&mut self, index: usize) {
        self.current_index = index;
        let question = &self.questions[index];
        self.countdown = Countdown::new(time_limit_ms(question.difficulty));
        self.draft = question.initial_draft();
    }

    /// Replace the in-progress draft. Never touches the clock or the index.
    pub fn update_draft(&mut self, content: impl Into<String>) -> Result<(), SessionError> {
        if self.phase != Phase::InProgress {
            return Err(SessionError::InvalidTransition {
                op: "update_draft",
            });
        }
        self.draft = content.into();
        Ok(())
    }

    /// Candidate-initiated finalize: stop the clock, record the answer with
    /// whatever time remained, and advance.
    pub fn submit_current(&mut self, content: &str) -> Result<Transition, SessionError> {
        if self.phase != Phase::InProgress {
            return Err(SessionError::InvalidTransition {
                op: "submit_current",
            });
        }
        self.countdown.cancel();
        let remaining = self.countdown.remaining_ms();
        Ok(self.finalize(content.to_string(), remaining))
    }

    /// Advance the clock by `elapsed_ms`. On expiry the current draft is
    /// submitted as-is (answer-on-timeout, not answer-discard) with zero
    /// time remaining.
    pub fn on_tick(&mut self, elapsed_ms: u64) -> Option<Transition> {
        if self.phase != Phase::InProgress {
            return None;
        }
        match self.countdown.tick(elapsed_ms) {
            TimerStatus::Expired => {
                let draft = self.draft.clone();
                Some(self.finalize(draft, 0))
            }
            TimerStatus::Running(_) | TimerStatus::Idle => None,
        }
    }

    fn finalize(&mut self, content: String, time_remaining_ms: u64) -> Transition {
        let record = AnswerRecord {
            question_id: self.questions[self.current_index].id.clone(),
            content,
            submitted_at: Local::now(),
            time_remaining_ms,
        };

        self.completed.push(record.clone());
        if let Some(store) = self.store.as_mut() {
            if let Err(err) = store.append(&record) {
                self.storage_warnings
                    .push(format!("answer for {} not persisted: {err}", record.question_id));
            }
        }

        let next = self.current_index + 1;
        if next == self.questions.len() {
            self.current_index = next;
            self.countdown = Countdown::idle();
            self.draft.clear();
            self.phase = Phase::Completed;
            Transition::Completed { record }
        } else {
            self.enter_question(next);
            Transition::Advanced {
                index: next,
                record,
            }
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// The active question, or None outside InProgress.
    pub fn current_question(&self) -> Option<&Question> {
        if self.phase == Phase::InProgress {
            self.questions.get(self.current_index)
        } else {
            None
        }
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    pub fn time_remaining_ms(&self) -> u64 {
        self.countdown.remaining_ms()
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// All finalized answers so far, in question order.
    pub fn completed_answers(&self) -> &[AnswerRecord] {
        &self.completed
    }

    /// Record a persistence problem raised outside the append path, such as
    /// the durable log failing to open at startup. Shown alongside append
    /// failures so the candidate never finishes believing answers were logged
    /// when nothing was written.
    pub fn warn_storage(&mut self, message: impl Into<String>) {
        self.storage_warnings.push(message.into());
    }

    /// Non-fatal persistence failures accumulated so far.
    pub fn storage_warnings(&self) -> &[String] {
        &self.storage_warnings
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.phase, Phase::Completed | Phase::Failed(_))
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
