//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{QuestionError, SessionError, TopicError};

/// Errors emitted by a `QuestionProvider`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProviderError {
    #[error("question request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error("question service rejected the request: {0}")]
    Rejected(String),
    #[error("question {index} is invalid: {source}")]
    InvalidQuestion {
        index: usize,
        #[source]
        source: QuestionError,
    },
    #[error("no questions configured for topic {0}")]
    UnknownTopic(String),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted by a `SubmissionService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SubmitError {
    #[error("submission failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error("submission service rejected the answers: {0}")]
    Rejected(String),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted by the quiz controller.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizError {
    #[error("no questions were loaded for this topic")]
    EmptyQuestionSet,
    #[error("failed to generate quiz: {0}")]
    LoadFailed(#[source] ProviderError),
    #[error("failed to submit quiz: {0}")]
    SubmitFailed(#[source] SubmitError),
    #[error("session contract violated: {0}")]
    Contract(#[source] SessionError),
    #[error(transparent)]
    Topic(#[from] TopicError),
    #[error("another request is still in flight")]
    Busy,
    #[error("{action} is not available right now")]
    Unavailable { action: &'static str },
    #[error("no quiz is in progress")]
    NoSession,
    #[error("a quiz can only be started from the setup screen")]
    NotInSetup,
    #[error("there is no submission waiting for confirmation")]
    NoPendingConfirmation,
    #[error("confirm or cancel the pending submission first")]
    AwaitingConfirmation,
}

impl From<SessionError> for QuizError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::EmptyQuestionSet => Self::EmptyQuestionSet,
            other => Self::Contract(other),
        }
    }
}

impl QuizError {
    /// True for failures the learner should see; false for misuse of the controller.
    #[must_use]
    pub fn is_user_visible(&self) -> bool {
        matches!(
            self,
            Self::EmptyQuestionSet | Self::LoadFailed(_) | Self::SubmitFailed(_)
        )
    }

    /// Single human-readable line for the learner, if this error is user-visible.
    #[must_use]
    pub fn user_message(&self) -> Option<String> {
        match self {
            Self::EmptyQuestionSet => Some(
                "No questions were loaded for this topic. The quiz service might be unavailable."
                    .to_string(),
            ),
            Self::LoadFailed(ProviderError::Rejected(message)) => {
                Some(format!("Failed to generate quiz: {message}"))
            }
            Self::LoadFailed(_) => Some("Failed to generate quiz. Please try again.".to_string()),
            Self::SubmitFailed(SubmitError::Rejected(message)) => {
                Some(format!("Failed to submit quiz: {message}"))
            }
            Self::SubmitFailed(_) => Some("Failed to submit quiz. Please try again.".to_string()),
            _ => None,
        }
    }
}
