use std::sync::Arc;

use rand::rng;
use rand::seq::SliceRandom;

use quiz_core::model::{ActiveQuiz, AnswerOutcome, QuestionCard, QuizSummary, SessionState, Step};
use quiz_core::{Clock, QuizCatalog};

use crate::error::TurnError;
use crate::quiz_source::QuizSource;
use crate::turn::directive::{Action, Directive, TurnOutcome};
use crate::turn::speech;

const DEFAULT_TRIES_LIMIT: u32 = 3;

/// Per-turn decision logic for the quiz session.
///
/// Every operation takes the current [`SessionState`] and returns the next
/// state plus a speakable [`Directive`]. The only suspension point is the
/// quiz-set fetch inside [`TurnProcessor::select_quiz`]; the caller must
/// await each turn fully before starting the next one for the same
/// conversation.
pub struct TurnProcessor {
    catalog: QuizCatalog,
    source: Arc<dyn QuizSource>,
    clock: Clock,
    tries_limit: u32,
}

impl TurnProcessor {
    #[must_use]
    pub fn new(catalog: QuizCatalog, source: Arc<dyn QuizSource>) -> Self {
        Self {
            catalog,
            source,
            clock: Clock::default_clock(),
            tries_limit: DEFAULT_TRIES_LIMIT,
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Maximum consecutive wrong attempts per question before the term is
    /// revealed and the question counted as missed.
    #[must_use]
    pub fn with_tries_limit(mut self, tries_limit: u32) -> Self {
        self.tries_limit = tries_limit;
        self
    }

    #[must_use]
    pub fn catalog(&self) -> &QuizCatalog {
        &self.catalog
    }

    /// Run one turn.
    ///
    /// # Errors
    ///
    /// Returns `TurnError` when the quiz-set fetch fails or the fetched set
    /// is empty. User-input problems never error; they come back as
    /// directives.
    pub async fn process(
        &self,
        state: SessionState,
        action: Action,
    ) -> Result<TurnOutcome, TurnError> {
        match action {
            Action::SelectCategory { category } => Ok(self.select_category(state, &category)),
            Action::SelectQuiz { quiz } => self.select_quiz(state, &quiz).await,
            Action::SubmitAnswer { answer } => Ok(self.submit_answer(state, &answer)),
            Action::RepeatQuestion => Ok(self.repeat_question(state)),
            Action::SkipQuestion => Ok(self.skip_question(state)),
            Action::EndQuiz => Ok(self.end_quiz(state)),
        }
    }

    /// Pick a topic, listing the quizzes it offers.
    #[must_use]
    pub fn select_category(&self, state: SessionState, category: &str) -> TurnOutcome {
        let title = "Category Select";

        if state.category().is_some() {
            return TurnOutcome::new(
                state,
                Directive::say(title, "You have already selected a category. "),
            );
        }

        let options = self.catalog.quizzes_in(category);
        if options.is_empty() {
            let known: Vec<&str> = self
                .catalog
                .categories()
                .iter()
                .map(|listing| listing.name.as_str())
                .collect();
            let speech = format!(
                "There are no quizzes in the {category} category. \
                 Categories are {}. ",
                speech::join_options(&known)
            );
            return TurnOutcome::new(
                state,
                Directive::ask(title, speech, speech::PICK_CATEGORY_REPROMPT),
            );
        }

        let prompt = speech::quiz_options_prompt(&options);
        let speech = format!("{category} category selected. {prompt}");
        TurnOutcome::new(
            SessionState::CategoryChosen {
                category: category.to_string(),
            },
            Directive::ask(title, speech, prompt),
        )
    }

    /// Load a quiz by spoken name, shuffle it, and ask the first question.
    ///
    /// # Errors
    ///
    /// Fetch failures and empty quiz sets are fatal for the turn.
    pub async fn select_quiz(
        &self,
        state: SessionState,
        quiz_name: &str,
    ) -> Result<TurnOutcome, TurnError> {
        let title = "Quiz Select";

        let category = match state {
            SessionState::QuizActive(quiz) => {
                return Ok(TurnOutcome::new(
                    SessionState::QuizActive(quiz),
                    Directive::say(title, "You have already selected a quiz. "),
                ));
            }
            SessionState::Idle => {
                return Ok(TurnOutcome::new(
                    SessionState::Idle,
                    Directive::ask(
                        title,
                        "Please pick a category before selecting a quiz. ",
                        speech::PICK_CATEGORY_REPROMPT,
                    ),
                ));
            }
            SessionState::CategoryChosen { category } => category,
        };

        let Some(quiz_id) = self.catalog.resolve(quiz_name) else {
            let options = self.catalog.quizzes_in(&category);
            let speech = format!(
                "There is no quiz called {quiz_name} in the {category} category. \
                 {}",
                speech::quiz_options_prompt(&options)
            );
            let reprompt = speech::quiz_options_prompt(&options);
            return Ok(TurnOutcome::new(
                SessionState::CategoryChosen { category },
                Directive::ask(title, speech, reprompt),
            ));
        };

        let mut questions = self.source.fetch_quiz_set(quiz_id).await?;
        shuffle_questions(&mut questions);

        let quiz = ActiveQuiz::new(category, quiz_id, questions, self.clock.now())?;
        let definition = quiz.current_question().definition().to_string();
        Ok(TurnOutcome::new(
            SessionState::QuizActive(quiz),
            Directive::ask(title, definition.clone(), definition),
        ))
    }

    /// Grade a spoken answer against the current question.
    #[must_use]
    pub fn submit_answer(&self, state: SessionState, answer: &str) -> TurnOutcome {
        let title = "Answer Question";

        let quiz = match state {
            SessionState::QuizActive(quiz) => quiz,
            other => {
                return TurnOutcome::new(other, Directive::say(title, "No question to answer. "));
            }
        };

        match quiz.answer(answer, self.tries_limit) {
            AnswerOutcome::Correct(step) => {
                Self::after_advance(title, "Congratulations you are correct! ", step)
            }
            AnswerOutcome::TryAgain(quiz) => {
                let definition = quiz.current_question().definition().to_string();
                let speech = format!("Incorrect Answer. Try Again. {definition}");
                TurnOutcome::new(
                    SessionState::QuizActive(quiz),
                    Directive::ask(title, speech, definition),
                )
            }
            AnswerOutcome::Revealed { term, step } => {
                let feedback = format!(
                    "You have gotten this question incorrect. \
                     The correct answer is {term}. "
                );
                match step {
                    Step::Continue(quiz) => {
                        let definition = quiz.current_question().definition().to_string();
                        let speech =
                            format!("{feedback}Moving on to the next question. {definition}");
                        TurnOutcome::new(
                            SessionState::QuizActive(quiz),
                            Directive::ask(title, speech, definition),
                        )
                    }
                    finished => Self::after_advance(title, &feedback, finished),
                }
            }
        }
    }

    /// Re-ask the current question without touching any state.
    #[must_use]
    pub fn repeat_question(&self, state: SessionState) -> TurnOutcome {
        let title = "Repeat Question";

        match state.active_quiz() {
            Some(quiz) => {
                let definition = quiz.current_question().definition().to_string();
                TurnOutcome::new(state, Directive::ask(title, definition.clone(), definition))
            }
            None => TurnOutcome::new(state, Directive::say(title, "No question to repeat. ")),
        }
    }

    /// Give up on the current question, revealing the answer.
    #[must_use]
    pub fn skip_question(&self, state: SessionState) -> TurnOutcome {
        let title = "Skip Question";

        let quiz = match state {
            SessionState::QuizActive(quiz) => quiz,
            other => {
                return TurnOutcome::new(other, Directive::say(title, "No question to skip. "));
            }
        };

        let (term, step) = quiz.skip();
        let feedback = format!("The correct answer is {term}. ");
        Self::after_advance(title, &feedback, step)
    }

    /// End the quiz early, reporting the score so far.
    #[must_use]
    pub fn end_quiz(&self, state: SessionState) -> TurnOutcome {
        let title = "End Quiz";

        let quiz = match state {
            SessionState::QuizActive(quiz) => quiz,
            other => {
                return TurnOutcome::new(
                    other,
                    Directive::say(title, "Currently not doing a quiz. "),
                );
            }
        };

        Self::completion_outcome(title, String::new(), quiz.finish())
    }

    fn after_advance(title: &str, feedback: &str, step: Step) -> TurnOutcome {
        match step {
            Step::Continue(quiz) => {
                let definition = quiz.current_question().definition().to_string();
                let speech = format!("{feedback}{definition}");
                TurnOutcome::new(
                    SessionState::QuizActive(quiz),
                    Directive::ask(title, speech, definition),
                )
            }
            Step::Finished(summary) => {
                Self::completion_outcome(title, feedback.to_string(), summary)
            }
        }
    }

    fn completion_outcome(title: &str, mut speech: String, summary: QuizSummary) -> TurnOutcome {
        if let Some(sentence) = speech::summary_sentence(summary) {
            speech.push_str(&sentence);
        }
        speech.push_str(speech::PICK_CATEGORY_PROMPT);
        TurnOutcome::new(
            SessionState::Idle,
            Directive::ask(title, speech, speech::PICK_CATEGORY_REPROMPT),
        )
    }
}

/// Uniform random permutation of the question order (Fisher-Yates).
///
/// Runs on every quiz load so the set is never presented in source order
/// by default.
pub(crate) fn shuffle_questions(questions: &mut [QuestionCard]) {
    let mut rng = rng();
    questions.shuffle(&mut rng);
}
