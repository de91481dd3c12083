use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use quiz_core::model::{
    AnswerSheet, DisplayState, Question, QuestionIndex, QuizResult, Topic, TopicCatalog,
};
use quiz_core::time::fixed_clock;
use quiz_services::{
    Action, ProviderError, QuestionProvider, QuizController, QuizError, QuizLoopService,
    QuizView, Stage, StaticQuestionProvider, StepOutcome, SubmissionService, SubmitError,
};

struct FakeSubmission {
    reply: Mutex<Vec<Result<QuizResult, SubmitError>>>,
    received: Mutex<Vec<AnswerSheet>>,
}

impl FakeSubmission {
    fn replying(replies: Vec<Result<QuizResult, SubmitError>>) -> Arc<Self> {
        Arc::new(Self {
            reply: Mutex::new(replies),
            received: Mutex::new(Vec::new()),
        })
    }

    fn received(&self) -> Vec<AnswerSheet> {
        self.received.lock().unwrap().clone()
    }
}

#[async_trait]
impl SubmissionService for FakeSubmission {
    async fn submit(&self, answers: &AnswerSheet) -> Result<QuizResult, SubmitError> {
        self.received.lock().unwrap().push(answers.clone());
        self.reply.lock().unwrap().remove(0)
    }
}

struct BrokenProvider;

#[async_trait]
impl QuestionProvider for BrokenProvider {
    async fn fetch_questions(&self, _topic: &Topic) -> Result<Vec<Question>, ProviderError> {
        Err(ProviderError::Rejected("Failed to generate quiz for this topic.".into()))
    }
}

fn general() -> Topic {
    Topic::new("general").unwrap()
}

fn scenario_provider() -> StaticQuestionProvider {
    StaticQuestionProvider::new()
        .with_topic(
            general(),
            vec![
                Question::new("Which gas traps heat?", ["A", "B"]).unwrap(),
                Question::new("Which bin takes glass?", ["A", "B", "C"]).unwrap(),
                Question::new("Is composting good?", ["A"]).unwrap(),
            ],
        )
        .with_topic(Topic::new("biodiversity").unwrap(), Vec::new())
}

fn score_1_of_3() -> Result<QuizResult, SubmitError> {
    Ok(QuizResult {
        score: 1,
        total: 3,
        points_earned: None,
    })
}

async fn scenario_a(
    submitter: Arc<FakeSubmission>,
) -> (QuizLoopService, QuizController) {
    let service = QuizLoopService::new(Arc::new(scenario_provider()), submitter);
    let mut controller = QuizController::new(fixed_clock(), TopicCatalog::default());

    service
        .handle(&mut controller, Action::SelectTopic(general()))
        .await
        .unwrap();
    let step = service.handle(&mut controller, Action::Start).await.unwrap();
    assert_eq!(step, StepOutcome::Started { questions: 3 });
    (service, controller)
}

#[tokio::test]
async fn scenario_a_load_general_topic() {
    let (_service, controller) = scenario_a(FakeSubmission::replying(Vec::new())).await;

    let session = controller.session().unwrap();
    assert_eq!(session.unanswered_count(), 3);
    assert_eq!(session.current(), QuestionIndex::new(0));
    assert_eq!(session.display_states(), vec![DisplayState::NotAnswered; 3]);
}

#[tokio::test]
async fn scenario_b_decline_keeps_state() {
    let (service, mut controller) = scenario_a(FakeSubmission::replying(Vec::new())).await;

    service
        .handle(&mut controller, Action::SelectOption("A".into()))
        .await
        .unwrap();
    service
        .handle(&mut controller, Action::JumpTo(QuestionIndex::new(1)))
        .await
        .unwrap();
    service
        .handle(&mut controller, Action::ToggleReview)
        .await
        .unwrap();

    let step = service.handle(&mut controller, Action::Submit).await.unwrap();
    let StepOutcome::Confirm(confirmation) = step else {
        panic!("expected confirmation, got {step:?}");
    };
    assert_eq!(confirmation.unanswered, 2);
    assert!(confirmation.message.contains("2 unanswered questions"));

    let before = controller.session().unwrap().clone();
    service
        .handle(&mut controller, Action::Decline)
        .await
        .unwrap();
    assert_eq!(controller.session().unwrap(), &before);
    assert_eq!(controller.session().unwrap().unanswered_count(), 2);
    assert_eq!(
        controller.session().unwrap().display_states(),
        vec![
            DisplayState::Answered,
            DisplayState::MarkedForReview,
            DisplayState::NotAnswered
        ]
    );
}

#[tokio::test]
async fn scenario_c_confirm_surfaces_result_and_discards_session() {
    let submitter = FakeSubmission::replying(vec![score_1_of_3()]);
    let (service, mut controller) = scenario_a(Arc::clone(&submitter)).await;

    controller.select_option("A").unwrap();
    controller.jump_to(QuestionIndex::new(1)).unwrap();
    controller.toggle_review_current().unwrap();

    service.handle(&mut controller, Action::Submit).await.unwrap();
    let step = service.handle(&mut controller, Action::Confirm).await.unwrap();
    let StepOutcome::Finished(outcome) = step else {
        panic!("expected finished, got {step:?}");
    };
    assert_eq!(outcome.result.score, 1);
    assert_eq!(outcome.result.total, 3);

    assert_eq!(
        submitter.received(),
        vec![AnswerSheet::new(vec![Some("A".into()), None, None])]
    );

    let QuizView::Finished(view) = controller.view() else {
        panic!("expected result view");
    };
    assert_eq!((view.score, view.total), (1, 3));

    assert!(controller.session().is_none());
    let err = service
        .handle(&mut controller, Action::Next)
        .await
        .unwrap_err();
    assert!(matches!(err, QuizError::NoSession));
}

#[tokio::test]
async fn scenario_d_empty_question_set_keeps_setup() {
    let service = QuizLoopService::new(
        Arc::new(scenario_provider()),
        FakeSubmission::replying(Vec::new()),
    );
    let mut controller = QuizController::new(fixed_clock(), TopicCatalog::default());
    controller
        .select_topic(&Topic::new("biodiversity").unwrap())
        .unwrap();

    let err = service
        .handle(&mut controller, Action::Start)
        .await
        .unwrap_err();
    assert!(matches!(err, QuizError::EmptyQuestionSet));
    assert!(matches!(controller.stage(), Stage::Setup));

    let QuizView::Setup(view) = controller.view() else {
        panic!("expected setup view");
    };
    assert!(view.start_enabled);
    assert!(view.error.unwrap().starts_with("No questions were loaded"));
}

#[tokio::test]
async fn scenario_e_jump_ignores_answer_state() {
    let (service, mut controller) = scenario_a(FakeSubmission::replying(Vec::new())).await;

    service
        .handle(&mut controller, Action::JumpTo(QuestionIndex::new(2)))
        .await
        .unwrap();
    assert_eq!(
        controller.session().unwrap().current(),
        QuestionIndex::new(2)
    );
}

#[tokio::test]
async fn provider_failure_is_load_failed() {
    let service = QuizLoopService::new(
        Arc::new(BrokenProvider),
        FakeSubmission::replying(Vec::new()),
    );
    let mut controller = QuizController::new(fixed_clock(), TopicCatalog::default());

    let err = service
        .handle(&mut controller, Action::Start)
        .await
        .unwrap_err();
    assert!(matches!(err, QuizError::LoadFailed(ProviderError::Rejected(_))));
    assert!(err.is_user_visible());
    assert!(controller.session().is_none());
    assert!(!controller.is_loading());

    let QuizView::Setup(view) = controller.view() else {
        panic!("expected setup view");
    };
    assert_eq!(
        view.error.as_deref(),
        Some("Failed to generate quiz: Failed to generate quiz for this topic.")
    );
}

#[tokio::test]
async fn submit_failure_allows_manual_retry() {
    let submitter = FakeSubmission::replying(vec![
        Err(SubmitError::Rejected("database unavailable".into())),
        score_1_of_3(),
    ]);
    let (service, mut controller) = scenario_a(Arc::clone(&submitter)).await;
    controller.select_option("B").unwrap();

    service.handle(&mut controller, Action::Submit).await.unwrap();
    let err = service
        .handle(&mut controller, Action::Confirm)
        .await
        .unwrap_err();
    assert!(matches!(err, QuizError::SubmitFailed(_)));
    assert_eq!(controller.session().unwrap().unanswered_count(), 2);
    assert_eq!(submitter.received().len(), 1);

    service.handle(&mut controller, Action::Submit).await.unwrap();
    let step = service.handle(&mut controller, Action::Confirm).await.unwrap();
    assert!(matches!(step, StepOutcome::Finished(_)));
    assert_eq!(submitter.received().len(), 2);
    assert_eq!(submitter.received()[0], submitter.received()[1]);
}

#[tokio::test]
async fn new_quiz_after_result_reloads_fresh_session() {
    let submitter = FakeSubmission::replying(vec![score_1_of_3()]);
    let (service, mut controller) = scenario_a(submitter).await;
    controller.select_option("B").unwrap();
    service.handle(&mut controller, Action::Submit).await.unwrap();
    service.handle(&mut controller, Action::Confirm).await.unwrap();

    service.handle(&mut controller, Action::NewQuiz).await.unwrap();
    service.handle(&mut controller, Action::Start).await.unwrap();

    let session = controller.session().unwrap();
    assert_eq!(session.unanswered_count(), 3);
    assert_eq!(session.answer(QuestionIndex::new(0)).unwrap(), None);
}
