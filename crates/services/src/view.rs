//! Render-ready snapshot of the controller.
//!
//! This is presentation-agnostic: no styling, no layout. Any renderer can be
//! a pure function of `QuizView`.

use quiz_core::model::{DisplayState, QuestionIndex, Session, Topic};

use crate::controller::{Confirmation, QuizController, Stage};

pub const MARK_FOR_REVIEW: &str = "Mark for Review";
pub const UNMARK_REVIEW: &str = "Unmark Review";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizView {
    Setup(SetupView),
    InProgress(SessionView),
    Finished(ResultView),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupView {
    pub topics: Vec<Topic>,
    pub selected: Topic,
    pub start_enabled: bool,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionView {
    pub topic: Topic,
    pub palette: Vec<PaletteItem>,
    pub current: QuestionIndex,
    pub question: QuestionCard,
    pub previous_enabled: bool,
    pub next_enabled: bool,
    pub review_label: &'static str,
    pub submit_enabled: bool,
    pub submitting: bool,
    pub unanswered: usize,
    pub confirmation: Option<Confirmation>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaletteItem {
    pub number: usize,
    pub state: DisplayState,
    pub is_current: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionCard {
    pub number: usize,
    pub prompt: String,
    pub options: Vec<OptionItem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionItem {
    pub text: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultView {
    pub topic: Topic,
    pub score: u32,
    pub total: u32,
    pub points_earned: Option<u32>,
    pub message: String,
}

impl QuizController {
    /// Derive the current view. Pure; call after every transition.
    #[must_use]
    pub fn view(&self) -> QuizView {
        match self.stage() {
            Stage::Setup => QuizView::Setup(SetupView {
                topics: self.topics().topics().to_vec(),
                selected: self.topics().selected().clone(),
                start_enabled: !self.is_loading(),
                loading: self.is_loading(),
                error: self.notice().map(str::to_string),
            }),
            Stage::InProgress { topic, session } => {
                QuizView::InProgress(self.session_view(topic, session))
            }
            Stage::Finished(outcome) => QuizView::Finished(ResultView {
                topic: outcome.topic.clone(),
                score: outcome.result.score,
                total: outcome.result.total,
                points_earned: outcome.result.points_earned,
                message: outcome.message(),
            }),
        }
    }

    fn session_view(&self, topic: &Topic, session: &Session) -> SessionView {
        let current = session.current();
        let palette = session
            .display_states()
            .into_iter()
            .enumerate()
            .map(|(i, state)| PaletteItem {
                number: i + 1,
                state,
                is_current: i == current.value(),
            })
            .collect();

        let selected = session.answer(current).ok().flatten();
        let question = session.current_question();
        let card = QuestionCard {
            number: current.number(),
            prompt: question.prompt().to_string(),
            options: question
                .options()
                .iter()
                .map(|text| OptionItem {
                    text: text.clone(),
                    selected: selected == Some(text.as_str()),
                })
                .collect(),
        };

        let marked = session.is_marked(current).unwrap_or(false);
        let busy = self.is_submitting();
        let confirming = self.confirmation().is_some();

        SessionView {
            topic: topic.clone(),
            palette,
            current,
            question: card,
            previous_enabled: !busy && !confirming && self.can_go_previous(),
            next_enabled: !busy && !confirming && self.can_go_next(),
            review_label: if marked { UNMARK_REVIEW } else { MARK_FOR_REVIEW },
            submit_enabled: !busy && !confirming,
            submitting: busy,
            unanswered: session.unanswered_count(),
            confirmation: self.confirmation().cloned(),
            error: self.notice().map(str::to_string),
        }
    }
}
