//! Spoken-text templating for turn directives.

use quiz_core::model::QuizSummary;

pub const PICK_CATEGORY_PROMPT: &str =
    "Please pick a category that you would wish to study from. ";
pub const PICK_CATEGORY_REPROMPT: &str = "Please pick a category.";
pub const WELCOME: &str =
    "Welcome to Study Buddy. Please pick a category that you would wish to study from.";
pub const GOODBYE: &str = "See you next time friend!";

/// Joins spoken options naturally: "a", "a and b", "a, b, and c".
pub fn join_options(options: &[&str]) -> String {
    match options {
        [] => String::new(),
        [only] => (*only).to_string(),
        [first, last] => format!("{first} and {last}"),
        [head @ .., last] => format!("{}, and {last}", head.join(", ")),
    }
}

/// "Please select a quiz" prompt listing a category's options.
pub fn quiz_options_prompt(options: &[&str]) -> String {
    format!(
        "Please select a quiz. Options are {}. ",
        join_options(options)
    )
}

/// The end-of-quiz stats sentence, or `None` when nothing was tallied.
pub fn summary_sentence(summary: QuizSummary) -> Option<String> {
    summary.percent_correct().map(|rate| {
        format!(
            "Great study session. Your stats are {} correct and {} incorrect, \
             for a correct rate of {} percent. ",
            summary.correct(),
            summary.incorrect(),
            rate
        )
    })
}
