use thiserror::Error;
use tracing::debug;

use crate::models::{Dosha, DoshaResult, Question, ResponseSet};
use crate::services::classifier::DoshaClassifier;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    AwaitingAnswer(usize),
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("assessment is already completed")]
    AlreadyCompleted,

    #[error("question index {index} is out of range for a bank of {len} questions")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("question {index} can only be revisited once an earlier question leads to it")]
    NotYetReached { index: usize },

    #[error("already at the first question")]
    AtFirstQuestion,

    #[error("already at the last question")]
    AtLastQuestion,

    #[error("question {0} must be answered before moving on")]
    Unanswered(String),
}

/// Walks a respondent through the bank one question at a time.
///
/// Answering the final question classifies the collected responses.
/// Moving back never discards answers; answering a question again replaces
/// only that answer.
#[derive(Debug, Clone)]
pub struct AssessmentSession {
    classifier: DoshaClassifier,
    responses: ResponseSet,
    state: SessionState,
    furthest: usize,
    result: Option<DoshaResult>,
}

impl AssessmentSession {
    pub fn new(classifier: DoshaClassifier) -> Self {
        Self {
            classifier,
            responses: ResponseSet::new(),
            state: SessionState::AwaitingAnswer(0),
            furthest: 0,
            result: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_completed(&self) -> bool {
        self.state == SessionState::Completed
    }

    pub fn responses(&self) -> &ResponseSet {
        &self.responses
    }

    pub fn result(&self) -> Option<&DoshaResult> {
        self.result.as_ref()
    }

    pub fn current_question(&self) -> Option<&Question> {
        match self.state {
            SessionState::AwaitingAnswer(index) => self.classifier.bank().get(index),
            SessionState::Completed => None,
        }
    }

    pub fn question_count(&self) -> usize {
        self.classifier.bank().len()
    }

    /// Position of the current question as shown to the respondent, 1-based
    /// and scaled to 100.
    pub fn progress_percent(&self) -> u32 {
        let len = self.question_count();
        let position = match self.state {
            SessionState::AwaitingAnswer(index) => index + 1,
            SessionState::Completed => len,
        };
        u32::try_from(position * 100 / len.max(1)).unwrap_or(100)
    }

    /// Records `dosha` for the current question and advances. On the last
    /// question the session completes and the result is returned.
    pub fn answer(&mut self, dosha: Dosha) -> Result<Option<&DoshaResult>, SessionError> {
        let index = self.current_index()?;
        let len = self.question_count();
        let question_id = self
            .classifier
            .bank()
            .get(index)
            .map(|q| q.id.clone())
            .ok_or(SessionError::IndexOutOfRange { index, len })?;

        if let Some(previous) = self.responses.record(question_id.clone(), dosha) {
            debug!("Replaced answer to {} ({} -> {})", question_id, previous, dosha);
        }

        if index + 1 == len {
            return Ok(Some(self.complete()));
        }

        self.move_to(index + 1);
        Ok(None)
    }

    /// Finishes early, classifying whatever has been answered so far.
    pub fn submit(&mut self) -> Result<&DoshaResult, SessionError> {
        self.current_index()?;
        Ok(self.complete())
    }

    /// Returns to an earlier question. Allowed from a completed session too,
    /// in which case the previous result is discarded.
    pub fn revisit(&mut self, index: usize) -> Result<(), SessionError> {
        let len = self.question_count();
        if index >= len {
            return Err(SessionError::IndexOutOfRange { index, len });
        }
        if index > self.furthest {
            return Err(SessionError::NotYetReached { index });
        }

        if self.is_completed() {
            debug!("Reopening completed assessment at question {}", index);
            self.result = None;
        }
        self.state = SessionState::AwaitingAnswer(index);
        Ok(())
    }

    /// Steps to the previous question; from a completed session, reopens
    /// the last question reached.
    pub fn go_back(&mut self) -> Result<(), SessionError> {
        match self.state {
            SessionState::AwaitingAnswer(0) => Err(SessionError::AtFirstQuestion),
            SessionState::AwaitingAnswer(index) => self.revisit(index - 1),
            SessionState::Completed => self.revisit(self.furthest),
        }
    }

    /// Moves forward without re-answering; the current question must
    /// already have an answer.
    pub fn advance(&mut self) -> Result<(), SessionError> {
        let index = self.current_index()?;
        if index + 1 >= self.question_count() {
            return Err(SessionError::AtLastQuestion);
        }
        if let Some(question) = self.classifier.bank().get(index) {
            if !self.responses.contains(&question.id) {
                return Err(SessionError::Unanswered(question.id.clone()));
            }
        }
        self.move_to(index + 1);
        Ok(())
    }

    fn current_index(&self) -> Result<usize, SessionError> {
        match self.state {
            SessionState::AwaitingAnswer(index) => Ok(index),
            SessionState::Completed => Err(SessionError::AlreadyCompleted),
        }
    }

    fn move_to(&mut self, index: usize) {
        self.state = SessionState::AwaitingAnswer(index);
        self.furthest = self.furthest.max(index);
    }

    fn complete(&mut self) -> &DoshaResult {
        self.state = SessionState::Completed;
        debug!(
            "Assessment completed with {} of {} questions answered",
            self.responses.len(),
            self.question_count()
        );
        self.result.insert(self.classifier.classify(&self.responses))
    }
}
