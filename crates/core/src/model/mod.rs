mod answers;
mod display;
mod ids;
mod outcome;
mod question;
mod session;
mod topic;

pub use answers::AnswerSheet;
pub use display::DisplayState;
pub use ids::QuestionIndex;
pub use outcome::{QuizOutcome, QuizResult};
pub use question::{Question, QuestionError};
pub use session::{Session, SessionError};
pub use topic::{Topic, TopicCatalog, TopicError};
