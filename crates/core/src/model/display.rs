use serde::Serialize;

/// Palette indicator for a single question. Derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DisplayState {
    NotAnswered,
    Answered,
    MarkedForReview,
}

impl DisplayState {
    /// Review takes precedence over answered, which takes precedence over unanswered.
    #[must_use]
    pub fn derive(answered: bool, marked_for_review: bool) -> Self {
        if marked_for_review {
            Self::MarkedForReview
        } else if answered {
            Self::Answered
        } else {
            Self::NotAnswered
        }
    }
}
