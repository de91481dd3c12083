use std::fmt;

use quiz_core::model::{QuestionIndex, Topic};
use quiz_services::{Action, QuizView};

/// One line of learner input, resolved against the current view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Act(Action),
    Show,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    Unknown(String),
    MissingValue { command: &'static str },
    InvalidNumber { raw: String },
    NoSuchOption { number: usize },
    InvalidTopic { raw: String },
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputError::Unknown(raw) => write!(f, "unknown command: {raw} (type `help`)"),
            InputError::MissingValue { command } => write!(f, "{command} requires a value"),
            InputError::InvalidNumber { raw } => write!(f, "not a number: {raw}"),
            InputError::NoSuchOption { number } => write!(f, "there is no option {number}"),
            InputError::InvalidTopic { raw } => write!(f, "invalid topic: {raw:?}"),
        }
    }
}

impl std::error::Error for InputError {}

pub const HELP: &str = "\
Commands:
  topic <name>     choose a topic (setup)
  start            generate a quiz for the chosen topic
  answer <n> | a   select option n for the current question
  next | n         next question
  prev | p         previous question
  jump <n> | j     go to question n
  review | r       mark / unmark the current question for review
  submit           submit the quiz (asks for confirmation)
  yes | no         answer the confirmation prompt
  new              start over with a new topic
  show             redraw the screen
  quit | q         exit";

/// Parse a line of input.
///
/// # Errors
///
/// Returns `InputError` for unknown commands or malformed arguments.
pub fn parse(line: &str, view: &QuizView) -> Result<Input, InputError> {
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Ok(Input::Show);
    };
    let rest = words.collect::<Vec<_>>().join(" ");
    let confirming = matches!(view, QuizView::InProgress(v) if v.confirmation.is_some());

    let action = match command.to_lowercase().as_str() {
        "q" | "quit" | "exit" => return Ok(Input::Quit),
        "help" | "?" => return Ok(Input::Help),
        "show" => return Ok(Input::Show),
        "y" | "yes" if confirming => Action::Confirm,
        "n" | "no" if confirming => Action::Decline,
        "topic" => {
            let raw = require(&rest, "topic")?;
            let topic = Topic::new(raw).map_err(|_| InputError::InvalidTopic {
                raw: raw.to_string(),
            })?;
            Action::SelectTopic(topic)
        }
        "start" => Action::Start,
        "n" | "next" => Action::Next,
        "p" | "prev" | "previous" => Action::Previous,
        "r" | "review" => Action::ToggleReview,
        "submit" => Action::Submit,
        "new" => Action::NewQuiz,
        "j" | "jump" => {
            let number = parse_number(require(&rest, "jump")?)?;
            let index = QuestionIndex::from_number(number).ok_or(InputError::InvalidNumber {
                raw: number.to_string(),
            })?;
            Action::JumpTo(index)
        }
        "a" | "answer" => {
            let number = parse_number(require(&rest, "answer")?)?;
            Action::SelectOption(option_text(view, number)?)
        }
        other => return Err(InputError::Unknown(other.to_string())),
    };
    Ok(Input::Act(action))
}

fn require<'a>(rest: &'a str, command: &'static str) -> Result<&'a str, InputError> {
    if rest.is_empty() {
        Err(InputError::MissingValue { command })
    } else {
        Ok(rest)
    }
}

fn parse_number(raw: &str) -> Result<usize, InputError> {
    raw.parse().map_err(|_| InputError::InvalidNumber {
        raw: raw.to_string(),
    })
}

fn option_text(view: &QuizView, number: usize) -> Result<String, InputError> {
    let QuizView::InProgress(session) = view else {
        return Err(InputError::NoSuchOption { number });
    };
    number
        .checked_sub(1)
        .and_then(|i| session.question.options.get(i))
        .map(|option| option.text.clone())
        .ok_or(InputError::NoSuchOption { number })
}
