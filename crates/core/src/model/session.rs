use chrono::{DateTime, Utc};
use std::fmt;
use thiserror::Error;

use crate::model::{AnswerSheet, DisplayState, Question, QuestionIndex};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no questions were loaded for this topic")]
    EmptyQuestionSet,

    #[error("question index {index} is out of range for {len} questions")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("{option:?} is not an option of question {index}")]
    InvalidOption { index: usize, option: String },
}

/// In-memory record of one quiz attempt.
///
/// The question set is fixed at construction. Answers and review flags are
/// tracked independently per question; the palette indicator is derived from
/// both via [`DisplayState::derive`].
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    questions: Vec<Question>,
    answers: Vec<Option<String>>,
    review: Vec<bool>,
    current: usize,
    started_at: DateTime<Utc>,
}

impl Session {
    /// Start a fresh session over `questions`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptyQuestionSet` if `questions` is empty.
    pub fn new(questions: Vec<Question>, started_at: DateTime<Utc>) -> Result<Self, SessionError> {
        if questions.is_empty() {
            return Err(SessionError::EmptyQuestionSet);
        }

        let len = questions.len();
        Ok(Self {
            questions,
            answers: vec![None; len],
            review: vec![false; len],
            current: 0,
            started_at,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn current(&self) -> QuestionIndex {
        QuestionIndex::new(self.current)
    }

    #[must_use]
    pub fn current_question(&self) -> &Question {
        &self.questions[self.current]
    }

    #[must_use]
    pub fn is_first(&self) -> bool {
        self.current == 0
    }

    #[must_use]
    pub fn is_last(&self) -> bool {
        self.current + 1 == self.questions.len()
    }

    #[must_use]
    pub fn contains(&self, index: QuestionIndex) -> bool {
        index.value() < self.questions.len()
    }

    /// # Errors
    ///
    /// Returns `SessionError::IndexOutOfRange` if `index` is not in the session.
    pub fn question(&self, index: QuestionIndex) -> Result<&Question, SessionError> {
        let i = self.check(index)?;
        Ok(&self.questions[i])
    }

    /// # Errors
    ///
    /// Returns `SessionError::IndexOutOfRange` if `index` is not in the session.
    pub fn answer(&self, index: QuestionIndex) -> Result<Option<&str>, SessionError> {
        let i = self.check(index)?;
        Ok(self.answers[i].as_deref())
    }

    /// # Errors
    ///
    /// Returns `SessionError::IndexOutOfRange` if `index` is not in the session.
    pub fn is_marked(&self, index: QuestionIndex) -> Result<bool, SessionError> {
        let i = self.check(index)?;
        Ok(self.review[i])
    }

    /// # Errors
    ///
    /// Returns `SessionError::IndexOutOfRange` if `index` is not in the session.
    pub fn display_state(&self, index: QuestionIndex) -> Result<DisplayState, SessionError> {
        let i = self.check(index)?;
        Ok(self.state_at(i))
    }

    /// Palette indicators for every question, in order.
    #[must_use]
    pub fn display_states(&self) -> Vec<DisplayState> {
        (0..self.questions.len()).map(|i| self.state_at(i)).collect()
    }

    /// Record `option` as the answer for `index`, replacing any prior answer.
    ///
    /// The review flag is left alone, so a flagged question keeps showing
    /// `MarkedForReview` after it is answered.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::IndexOutOfRange` if `index` is not in the session.
    /// Returns `SessionError::InvalidOption` if `option` is not one of the question's options.
    pub fn set_answer(&mut self, index: QuestionIndex, option: &str) -> Result<(), SessionError> {
        let i = self.check(index)?;
        if !self.questions[i].has_option(option) {
            return Err(SessionError::InvalidOption {
                index: i,
                option: option.to_string(),
            });
        }
        self.answers[i] = Some(option.to_string());
        Ok(())
    }

    /// Flip the review flag for `index` and return the new value.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::IndexOutOfRange` if `index` is not in the session.
    pub fn toggle_review(&mut self, index: QuestionIndex) -> Result<bool, SessionError> {
        let i = self.check(index)?;
        self.review[i] = !self.review[i];
        Ok(self.review[i])
    }

    /// Move to `index`. Navigation never depends on answer state.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::IndexOutOfRange` if `index` is not in the session.
    pub fn set_current(&mut self, index: QuestionIndex) -> Result<(), SessionError> {
        self.current = self.check(index)?;
        Ok(())
    }

    #[must_use]
    pub fn unanswered_count(&self) -> usize {
        self.answers.iter().filter(|answer| answer.is_none()).count()
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.len() - self.unanswered_count()
    }

    /// Snapshot of all answers in question order.
    #[must_use]
    pub fn answer_sheet(&self) -> AnswerSheet {
        AnswerSheet::new(self.answers.clone())
    }

    fn state_at(&self, i: usize) -> DisplayState {
        DisplayState::derive(self.answers[i].is_some(), self.review[i])
    }

    fn check(&self, index: QuestionIndex) -> Result<usize, SessionError> {
        let len = self.questions.len();
        if index.value() < len {
            Ok(index.value())
        } else {
            Err(SessionError::IndexOutOfRange {
                index: index.value(),
                len,
            })
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("questions_len", &self.questions.len())
            .field("current", &self.current)
            .field("unanswered", &self.unanswered_count())
            .field("started_at", &self.started_at)
            .finish_non_exhaustive()
    }
}
