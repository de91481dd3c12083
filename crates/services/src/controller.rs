use std::fmt;

use quiz_core::Clock;
use quiz_core::model::{
    AnswerSheet, Question, QuestionIndex, QuizOutcome, QuizResult, Session, SessionError, Topic,
    TopicCatalog,
};

use crate::error::{ProviderError, QuizError, SubmitError};

//
// ─── ACTIONS & EFFECTS ─────────────────────────────────────────────────────────
//

/// Discrete user action delivered by the view layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SelectTopic(Topic),
    Start,
    SelectOption(String),
    Next,
    Previous,
    ToggleReview,
    JumpTo(QuestionIndex),
    Submit,
    Confirm,
    Decline,
    NewQuiz,
}

/// Work the shell must carry out after an action has been applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    /// Fetch questions for the topic, then call `finish_load`.
    Load(Topic),
    /// Ask the learner to confirm or decline.
    Confirm(Confirmation),
    /// Send the answers, then call `finish_submit`.
    Submit(AnswerSheet),
}

/// Pending submit confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    pub unanswered: usize,
    pub message: String,
}

impl Confirmation {
    #[must_use]
    pub fn new(unanswered: usize) -> Self {
        let mut message = String::from("Are you sure you want to submit?");
        match unanswered {
            0 => {}
            1 => message.push_str("\nYou have 1 unanswered question."),
            n => message.push_str(&format!("\nYou have {n} unanswered questions.")),
        }
        Self {
            unanswered,
            message,
        }
    }
}

//
// ─── STAGE ─────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    Setup,
    InProgress { topic: Topic, session: Session },
    Finished(QuizOutcome),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InFlight {
    Load,
    Submit,
}

//
// ─── CONTROLLER ────────────────────────────────────────────────────────────────
//

/// Navigation and submission controller for a single learner.
///
/// Owns the active `Session` and sequences every transition against it.
/// Outbound calls are split in two phases (`begin_load`/`finish_load`,
/// `confirm_submit`/`finish_submit`); while one is in flight every other
/// state-changing action fails with `QuizError::Busy`.
pub struct QuizController {
    clock: Clock,
    topics: TopicCatalog,
    stage: Stage,
    in_flight: Option<InFlight>,
    confirmation: Option<Confirmation>,
    notice: Option<String>,
}

impl QuizController {
    #[must_use]
    pub fn new(clock: Clock, topics: TopicCatalog) -> Self {
        Self {
            clock,
            topics,
            stage: Stage::Setup,
            in_flight: None,
            confirmation: None,
            notice: None,
        }
    }

    #[must_use]
    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    #[must_use]
    pub fn topics(&self) -> &TopicCatalog {
        &self.topics
    }

    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        match &self.stage {
            Stage::InProgress { session, .. } => Some(session),
            _ => None,
        }
    }

    #[must_use]
    pub fn outcome(&self) -> Option<&QuizOutcome> {
        match &self.stage {
            Stage::Finished(outcome) => Some(outcome),
            _ => None,
        }
    }

    #[must_use]
    pub fn confirmation(&self) -> Option<&Confirmation> {
        self.confirmation.as_ref()
    }

    /// Last user-visible failure, if it has not been superseded.
    #[must_use]
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.in_flight == Some(InFlight::Load)
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.in_flight == Some(InFlight::Submit)
    }

    #[must_use]
    pub fn can_go_next(&self) -> bool {
        self.session().is_some_and(|s| !s.is_last())
    }

    #[must_use]
    pub fn can_go_previous(&self) -> bool {
        self.session().is_some_and(|s| !s.is_first())
    }

    /// Map an action onto the controller and report any follow-up work.
    ///
    /// # Errors
    ///
    /// Returns the `QuizError` of the underlying transition.
    pub fn apply(&mut self, action: Action) -> Result<Effect, QuizError> {
        tracing::trace!(?action, "applying action");
        match action {
            Action::SelectTopic(topic) => self.select_topic(&topic).map(|()| Effect::None),
            Action::Start => self.begin_load().map(Effect::Load),
            Action::SelectOption(option) => self.select_option(&option).map(|()| Effect::None),
            Action::Next => self.go_next().map(|()| Effect::None),
            Action::Previous => self.go_previous().map(|()| Effect::None),
            Action::ToggleReview => self.toggle_review_current().map(|_| Effect::None),
            Action::JumpTo(index) => self.jump_to(index).map(|()| Effect::None),
            Action::Submit => self.request_submit().map(Effect::Confirm),
            Action::Confirm => self.confirm_submit().map(Effect::Submit),
            Action::Decline => self.cancel_submit().map(|()| Effect::None),
            Action::NewQuiz => self.new_quiz().map(|()| Effect::None),
        }
    }

    // ─── Setup ────────────────────────────────────────────────────────────────

    /// # Errors
    ///
    /// Returns `QuizError::Busy` while a load is in flight, `QuizError::NotInSetup`
    /// outside the setup stage, and `QuizError::Topic` for topics outside the catalog.
    pub fn select_topic(&mut self, topic: &Topic) -> Result<(), QuizError> {
        self.ensure_idle()?;
        if !matches!(self.stage, Stage::Setup) {
            return Err(QuizError::NotInSetup);
        }
        self.topics.select(topic)?;
        Ok(())
    }

    /// Mark a load as in flight and return the topic to fetch.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Busy` if a request is already in flight and
    /// `QuizError::NotInSetup` outside the setup stage.
    pub fn begin_load(&mut self) -> Result<Topic, QuizError> {
        self.ensure_idle()?;
        if !matches!(self.stage, Stage::Setup) {
            return Err(QuizError::NotInSetup);
        }
        self.in_flight = Some(InFlight::Load);
        self.notice = None;
        let topic = self.topics.selected().clone();
        tracing::info!(%topic, "loading question set");
        Ok(topic)
    }

    /// Resolve the in-flight load with the provider's reply.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::LoadFailed` if the provider failed and
    /// `QuizError::EmptyQuestionSet` if it returned no questions. In both
    /// cases the setup stage remains and no session is created.
    pub fn finish_load(
        &mut self,
        fetched: Result<Vec<Question>, ProviderError>,
    ) -> Result<(), QuizError> {
        if self.in_flight != Some(InFlight::Load) {
            return Err(QuizError::Unavailable {
                action: "finish load",
            });
        }
        self.in_flight = None;

        let now = self.clock.now();
        let started = fetched
            .map_err(QuizError::LoadFailed)
            .and_then(|questions| Session::new(questions, now).map_err(QuizError::from));

        match started {
            Ok(session) => {
                let topic = self.topics.selected().clone();
                tracing::info!(%topic, questions = session.len(), "quiz session started");
                self.stage = Stage::InProgress { topic, session };
                Ok(())
            }
            Err(err) => Err(self.surface(err)),
        }
    }

    // ─── Navigation ───────────────────────────────────────────────────────────

    /// Record an answer for the current question.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NoSession` without an active session and
    /// `QuizError::Contract` if `option` does not belong to the question.
    pub fn select_option(&mut self, option: &str) -> Result<(), QuizError> {
        let session = self.session_mut()?;
        let index = session.current();
        session.set_answer(index, option).map_err(contract)?;
        tracing::debug!(index = index.value(), "answer selected");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `QuizError::Unavailable` on the last question.
    pub fn go_next(&mut self) -> Result<(), QuizError> {
        let session = self.session_mut()?;
        if session.is_last() {
            return Err(QuizError::Unavailable { action: "next" });
        }
        let next = QuestionIndex::new(session.current().value() + 1);
        session.set_current(next).map_err(contract)
    }

    /// # Errors
    ///
    /// Returns `QuizError::Unavailable` on the first question.
    pub fn go_previous(&mut self) -> Result<(), QuizError> {
        let session = self.session_mut()?;
        if session.is_first() {
            return Err(QuizError::Unavailable { action: "previous" });
        }
        let previous = QuestionIndex::new(session.current().value() - 1);
        session.set_current(previous).map_err(contract)
    }

    /// Jump straight to `index`; answer and review state never block it.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Unavailable` if `index` is not on the palette.
    pub fn jump_to(&mut self, index: QuestionIndex) -> Result<(), QuizError> {
        let session = self.session_mut()?;
        if !session.contains(index) {
            return Err(QuizError::Unavailable { action: "jump" });
        }
        session.set_current(index).map_err(contract)
    }

    /// Toggle the review flag of the current question and return the new flag.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NoSession` without an active session.
    pub fn toggle_review_current(&mut self) -> Result<bool, QuizError> {
        let session = self.session_mut()?;
        let index = session.current();
        let marked = session.toggle_review(index).map_err(contract)?;
        tracing::debug!(index = index.value(), marked, "review toggled");
        Ok(marked)
    }

    // ─── Submission ───────────────────────────────────────────────────────────

    /// First phase of submission: build the confirmation prompt.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NoSession` without an active session.
    pub fn request_submit(&mut self) -> Result<Confirmation, QuizError> {
        let unanswered = self.session_mut()?.unanswered_count();
        let confirmation = Confirmation::new(unanswered);
        self.notice = None;
        self.confirmation = Some(confirmation.clone());
        Ok(confirmation)
    }

    /// Decline the pending confirmation; the session is left as it was.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NoPendingConfirmation` if nothing is pending.
    pub fn cancel_submit(&mut self) -> Result<(), QuizError> {
        self.confirmation
            .take()
            .map(|_| ())
            .ok_or(QuizError::NoPendingConfirmation)
    }

    /// Accept the pending confirmation and hand back the answers to send.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NoPendingConfirmation` if nothing is pending.
    pub fn confirm_submit(&mut self) -> Result<AnswerSheet, QuizError> {
        self.ensure_idle()?;
        if self.confirmation.is_none() {
            return Err(QuizError::NoPendingConfirmation);
        }
        let Some(session) = self.session() else {
            return Err(QuizError::NoSession);
        };
        let sheet = session.answer_sheet();
        self.confirmation = None;
        self.in_flight = Some(InFlight::Submit);
        tracing::info!(
            slots = sheet.len(),
            unanswered = sheet.unanswered(),
            "submitting answers"
        );
        Ok(sheet)
    }

    /// Resolve the in-flight submission.
    ///
    /// On success the session is discarded and the stage becomes `Finished`.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::SubmitFailed` if the service failed; the session is
    /// kept unchanged so the learner can submit again.
    pub fn finish_submit(
        &mut self,
        submitted: Result<QuizResult, SubmitError>,
    ) -> Result<QuizOutcome, QuizError> {
        if self.in_flight != Some(InFlight::Submit) {
            return Err(QuizError::Unavailable {
                action: "finish submit",
            });
        }
        self.in_flight = None;

        let result = match submitted {
            Ok(result) => result,
            Err(err) => return Err(self.surface(QuizError::SubmitFailed(err))),
        };

        let Stage::InProgress { topic, session } =
            std::mem::replace(&mut self.stage, Stage::Setup)
        else {
            return Err(QuizError::NoSession);
        };

        let outcome = QuizOutcome {
            topic,
            result,
            started_at: session.started_at(),
            submitted_at: self.clock.now(),
        };
        tracing::info!(
            score = outcome.result.score,
            total = outcome.result.total,
            "quiz submitted"
        );
        self.stage = Stage::Finished(outcome.clone());
        Ok(outcome)
    }

    /// Drop any session or result and return to topic selection.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Busy` while a request is in flight.
    pub fn new_quiz(&mut self) -> Result<(), QuizError> {
        self.ensure_idle()?;
        if self.session().is_some() {
            tracing::info!("discarding active session");
        }
        self.stage = Stage::Setup;
        self.confirmation = None;
        self.notice = None;
        Ok(())
    }

    // ─── Helpers ──────────────────────────────────────────────────────────────

    fn ensure_idle(&self) -> Result<(), QuizError> {
        if self.in_flight.is_some() {
            return Err(QuizError::Busy);
        }
        Ok(())
    }

    fn session_mut(&mut self) -> Result<&mut Session, QuizError> {
        self.ensure_idle()?;
        if self.confirmation.is_some() {
            return Err(QuizError::AwaitingConfirmation);
        }
        match &mut self.stage {
            Stage::InProgress { session, .. } => Ok(session),
            _ => Err(QuizError::NoSession),
        }
    }

    fn surface(&mut self, err: QuizError) -> QuizError {
        tracing::warn!(error = %err, "request failed");
        self.notice = err.user_message();
        err
    }
}

impl fmt::Debug for QuizController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizController")
            .field("stage", &self.stage)
            .field("in_flight", &self.in_flight)
            .field("confirmation", &self.confirmation)
            .field("notice", &self.notice)
            .finish_non_exhaustive()
    }
}

fn contract(err: SessionError) -> QuizError {
    tracing::error!(error = %err, "session contract violated");
    QuizError::from(err)
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
