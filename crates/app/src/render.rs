use std::fmt::Write;

use quiz_core::model::DisplayState;
use quiz_services::{QuizView, ResultView, SessionView, SetupView};

/// Render a view as plain text.
#[must_use]
pub fn render(view: &QuizView) -> String {
    match view {
        QuizView::Setup(setup) => render_setup(setup),
        QuizView::InProgress(session) => render_session(session),
        QuizView::Finished(result) => render_result(result),
    }
}

fn render_setup(view: &SetupView) -> String {
    let mut out = String::from("Choose a quiz topic:\n");
    for topic in &view.topics {
        let marker = if *topic == view.selected { '>' } else { ' ' };
        let _ = writeln!(out, " {marker} {topic}");
    }
    if view.loading {
        out.push_str("Generating...\n");
    } else if view.start_enabled {
        out.push_str("Type `start` to begin.\n");
    }
    if let Some(error) = &view.error {
        let _ = writeln!(out, "Error: {error}");
    }
    out
}

fn render_session(view: &SessionView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "[{}] {}", view.topic, palette(view));
    let _ = writeln!(
        out,
        "Question {}: {}",
        view.question.number, view.question.prompt
    );
    for (i, option) in view.question.options.iter().enumerate() {
        let mark = if option.selected { 'x' } else { ' ' };
        let _ = writeln!(out, "  ({mark}) {}. {}", i + 1, option.text);
    }

    let mut actions = Vec::new();
    if view.previous_enabled {
        actions.push("prev");
    }
    if view.next_enabled {
        actions.push("next");
    }
    if view.submit_enabled {
        actions.push("submit");
    }
    let _ = writeln!(
        out,
        "{} unanswered | {} | {}",
        view.unanswered,
        view.review_label,
        actions.join(" / ")
    );

    if view.submitting {
        out.push_str("Submitting...\n");
    }
    if let Some(confirmation) = &view.confirmation {
        let _ = writeln!(out, "{}\n[yes/no]", confirmation.message);
    }
    if let Some(error) = &view.error {
        let _ = writeln!(out, "Error: {error}");
    }
    out
}

fn palette(view: &SessionView) -> String {
    view.palette
        .iter()
        .map(|item| {
            let symbol = match item.state {
                DisplayState::NotAnswered => ' ',
                DisplayState::Answered => '*',
                DisplayState::MarkedForReview => '?',
            };
            if item.is_current {
                format!("<{}{symbol}>", item.number)
            } else {
                format!("[{}{symbol}]", item.number)
            }
        })
        .collect::<Vec<_>>()
        .join("")
}

fn render_result(view: &ResultView) -> String {
    format!("{}\nType `new` to take another quiz.\n", view.message)
}
