use serde::Serialize;

/// Ordered answers handed to the submission service, one slot per question.
///
/// Serializes as a JSON array with `null` for unanswered slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AnswerSheet(Vec<Option<String>>);

impl AnswerSheet {
    #[must_use]
    pub fn new(slots: Vec<Option<String>>) -> Self {
        Self(slots)
    }

    #[must_use]
    pub fn slots(&self) -> &[Option<String>] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn unanswered(&self) -> usize {
        self.0.iter().filter(|slot| slot.is_none()).count()
    }
}
