use std::sync::Arc;

use quiz_core::model::{AnswerSheet, QuizOutcome, Topic};

use crate::controller::{Action, Confirmation, Effect, QuizController};
use crate::error::QuizError;
use crate::provider::{QuestionProvider, SubmissionService};

/// What the shell should present after an action has been fully handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Continue,
    Started { questions: usize },
    Confirm(Confirmation),
    Finished(QuizOutcome),
}

/// Runs controller effects against the external collaborators.
#[derive(Clone)]
pub struct QuizLoopService {
    provider: Arc<dyn QuestionProvider>,
    submitter: Arc<dyn SubmissionService>,
}

impl QuizLoopService {
    #[must_use]
    pub fn new(provider: Arc<dyn QuestionProvider>, submitter: Arc<dyn SubmissionService>) -> Self {
        Self {
            provider,
            submitter,
        }
    }

    /// Apply `action` and, when it needs a collaborator, await the reply and
    /// feed it back into the controller.
    ///
    /// # Errors
    ///
    /// Returns the controller's `QuizError`; load and submit failures are
    /// also recorded on the controller as a notice.
    pub async fn handle(
        &self,
        controller: &mut QuizController,
        action: Action,
    ) -> Result<StepOutcome, QuizError> {
        match controller.apply(action)? {
            Effect::None => Ok(StepOutcome::Continue),
            Effect::Confirm(confirmation) => Ok(StepOutcome::Confirm(confirmation)),
            Effect::Load(topic) => self.load(controller, topic).await,
            Effect::Submit(sheet) => self.submit(controller, sheet).await,
        }
    }

    #[tracing::instrument(skip_all, fields(topic = %topic))]
    async fn load(
        &self,
        controller: &mut QuizController,
        topic: Topic,
    ) -> Result<StepOutcome, QuizError> {
        let fetched = self.provider.fetch_questions(&topic).await;
        controller.finish_load(fetched)?;
        let questions = controller.session().map_or(0, |session| session.len());
        Ok(StepOutcome::Started { questions })
    }

    #[tracing::instrument(skip_all, fields(slots = sheet.len()))]
    async fn submit(
        &self,
        controller: &mut QuizController,
        sheet: AnswerSheet,
    ) -> Result<StepOutcome, QuizError> {
        let submitted = self.submitter.submit(&sheet).await;
        let outcome = controller.finish_submit(submitted)?;
        Ok(StepOutcome::Finished(outcome))
    }
}
