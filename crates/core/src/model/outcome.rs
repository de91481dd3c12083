use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::Topic;

/// Score returned by the submission service; passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizResult {
    pub score: u32,
    pub total: u32,
    #[serde(default)]
    pub points_earned: Option<u32>,
}

/// Terminal record of a submitted quiz.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizOutcome {
    pub topic: Topic,
    pub result: QuizResult,
    pub started_at: DateTime<Utc>,
    pub submitted_at: DateTime<Utc>,
}

impl QuizOutcome {
    /// Human-readable summary line for the result screen.
    #[must_use]
    pub fn message(&self) -> String {
        let base = format!(
            "Quiz complete! You scored {} out of {}",
            self.result.score, self.result.total
        );
        match self.result.points_earned {
            Some(points) => format!("{base} and earned {points} points."),
            None => format!("{base}."),
        }
    }
}
