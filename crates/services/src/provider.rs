use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use quiz_core::model::{AnswerSheet, Question, QuizResult, Topic};

use crate::error::{ProviderError, SubmitError};

/// Supplies the question set for a topic.
#[async_trait]
pub trait QuestionProvider: Send + Sync {
    /// Fetch the ordered question set for `topic`.
    ///
    /// An empty vector is a valid reply; the controller turns it into
    /// `QuizError::EmptyQuestionSet`.
    async fn fetch_questions(&self, topic: &Topic) -> Result<Vec<Question>, ProviderError>;
}

/// Accepts final answers and returns the score.
#[async_trait]
pub trait SubmissionService: Send + Sync {
    async fn submit(&self, answers: &AnswerSheet) -> Result<QuizResult, SubmitError>;
}

/// In-memory provider keyed by topic.
#[derive(Clone, Default)]
pub struct StaticQuestionProvider {
    sets: Arc<Mutex<HashMap<Topic, Vec<Question>>>>,
}

impl StaticQuestionProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_topic(self, topic: Topic, questions: Vec<Question>) -> Self {
        self.insert(topic, questions);
        self
    }

    pub fn insert(&self, topic: Topic, questions: Vec<Question>) {
        let mut sets = self
            .sets
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        sets.insert(topic, questions);
    }
}

#[async_trait]
impl QuestionProvider for StaticQuestionProvider {
    async fn fetch_questions(&self, topic: &Topic) -> Result<Vec<Question>, ProviderError> {
        let sets = self
            .sets
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        sets.get(topic)
            .cloned()
            .ok_or_else(|| ProviderError::UnknownTopic(topic.to_string()))
    }
}
