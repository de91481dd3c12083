#![forbid(unsafe_code)]

pub mod controller;
pub mod error;
pub mod http;
pub mod provider;
pub mod view;
pub mod workflow;

pub use quiz_core::Clock;

pub use controller::{Action, Confirmation, Effect, QuizController, Stage};
pub use error::{ProviderError, QuizError, SubmitError};
pub use http::{HttpQuizApi, QuizApiConfig};
pub use provider::{QuestionProvider, StaticQuestionProvider, SubmissionService};
pub use view::{
    OptionItem, PaletteItem, QuestionCard, QuizView, ResultView, SessionView, SetupView,
};
pub use workflow::{QuizLoopService, StepOutcome};
