use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{QuestionCard, QuizId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizStateError {
    #[error("quiz set has no questions")]
    Empty,

    #[error("question position {position} is out of bounds for {len} questions")]
    PositionOutOfBounds { position: usize, len: usize },
}

//
// ─── SESSION STATE ─────────────────────────────────────────────────────────────
//

/// Per-conversation quiz state, threaded through the turn processor one turn
/// at a time.
///
/// The transport layer serializes this between turns; nothing here performs
/// I/O. Each conversation starts at `Idle` and returns to `Idle` whenever a
/// quiz completes or is ended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SessionState {
    /// No category chosen, no quiz running.
    Idle,
    /// A topic was picked; a quiz has not been loaded yet.
    CategoryChosen { category: String },
    /// A quiz is loaded and in progress.
    QuizActive(ActiveQuiz),
}

impl SessionState {
    /// The conversation-start state.
    #[must_use]
    pub fn empty() -> Self {
        Self::Idle
    }

    #[must_use]
    pub fn is_quiz_active(&self) -> bool {
        matches!(self, Self::QuizActive(_))
    }

    /// The chosen category, if one has been picked this quiz cycle.
    #[must_use]
    pub fn category(&self) -> Option<&str> {
        match self {
            Self::Idle => None,
            Self::CategoryChosen { category } => Some(category),
            Self::QuizActive(quiz) => Some(quiz.category()),
        }
    }

    #[must_use]
    pub fn active_quiz(&self) -> Option<&ActiveQuiz> {
        match self {
            Self::QuizActive(quiz) => Some(quiz),
            _ => None,
        }
    }

    /// Clears every quiz-scoped field, including the category.
    ///
    /// Completion and explicit end both land here; a new quiz cycle starts
    /// with a fresh category selection.
    #[must_use]
    pub fn reset_quiz(self) -> Self {
        Self::Idle
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::empty()
    }
}

//
// ─── ACTIVE QUIZ ───────────────────────────────────────────────────────────────
//

/// A loaded quiz stepping through its questions.
///
/// Invariant: `questions` is non-empty and `position < questions.len()` at
/// all times. Transitions that advance past the last question consume the
/// value and hand back a [`QuizSummary`] instead, so a live `ActiveQuiz`
/// always has a current question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "QuizSnapshot", into = "QuizSnapshot")]
pub struct ActiveQuiz {
    category: String,
    quiz_id: QuizId,
    questions: Vec<QuestionCard>,
    position: usize,
    correct: u32,
    incorrect: u32,
    tries: u32,
    started_at: DateTime<Utc>,
}

/// Whether the quiz continues after an advance, or just finished.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Continue(ActiveQuiz),
    Finished(QuizSummary),
}

/// Outcome of grading one spoken answer.
#[derive(Debug, Clone, PartialEq)]
pub enum AnswerOutcome {
    /// The answer matched; the quiz advanced.
    Correct(Step),
    /// Wrong, with tries remaining; the same question repeats.
    TryAgain(ActiveQuiz),
    /// Wrong for the last allowed time; the term is revealed and the quiz
    /// advanced with the question counted as missed.
    Revealed { term: String, step: Step },
}

impl ActiveQuiz {
    /// Start a quiz over the given (already shuffled) question list.
    ///
    /// # Errors
    ///
    /// Returns `QuizStateError::Empty` if the question list is empty.
    pub fn new(
        category: impl Into<String>,
        quiz_id: QuizId,
        questions: Vec<QuestionCard>,
        started_at: DateTime<Utc>,
    ) -> Result<Self, QuizStateError> {
        if questions.is_empty() {
            return Err(QuizStateError::Empty);
        }
        Ok(Self {
            category: category.into(),
            quiz_id,
            questions,
            position: 0,
            correct: 0,
            incorrect: 0,
            tries: 0,
            started_at,
        })
    }

    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    #[must_use]
    pub fn quiz_id(&self) -> QuizId {
        self.quiz_id
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn current_question(&self) -> &QuestionCard {
        &self.questions[self.position]
    }

    /// Zero-based position of the current question.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    /// Consecutive wrong attempts on the current question so far.
    #[must_use]
    pub fn tries(&self) -> u32 {
        self.tries
    }

    #[must_use]
    pub fn correct(&self) -> u32 {
        self.correct
    }

    #[must_use]
    pub fn incorrect(&self) -> u32 {
        self.incorrect
    }

    /// Grade a spoken answer against the current question.
    ///
    /// A question only ever counts once toward the tallies: correct only
    /// when answered right on the first attempt, incorrect on the first
    /// wrong attempt. Reaching `tries_limit` wrong attempts reveals the
    /// term and force-advances.
    #[must_use]
    pub fn answer(mut self, answer: &str, tries_limit: u32) -> AnswerOutcome {
        if self.current_question().matches(answer) {
            if self.tries == 0 {
                self.correct += 1;
            }
            self.tries = 0;
            AnswerOutcome::Correct(self.advance())
        } else {
            if self.tries == 0 {
                self.incorrect += 1;
            }
            self.tries += 1;
            if self.tries < tries_limit {
                AnswerOutcome::TryAgain(self)
            } else {
                let term = self.current_question().term().to_string();
                self.tries = 0;
                AnswerOutcome::Revealed {
                    term,
                    step: self.advance(),
                }
            }
        }
    }

    /// Give up on the current question, revealing its term.
    ///
    /// Counts as incorrect only if no wrong attempt was already tallied.
    #[must_use]
    pub fn skip(mut self) -> (String, Step) {
        let term = self.current_question().term().to_string();
        if self.tries == 0 {
            self.incorrect += 1;
        }
        self.tries = 0;
        (term, self.advance())
    }

    /// End the quiz early, yielding the score so far.
    #[must_use]
    pub fn finish(self) -> QuizSummary {
        QuizSummary {
            correct: self.correct,
            incorrect: self.incorrect,
        }
    }

    fn advance(mut self) -> Step {
        self.position += 1;
        if self.position >= self.questions.len() {
            Step::Finished(self.finish())
        } else {
            Step::Continue(self)
        }
    }
}

//
// ─── QUIZ SUMMARY ──────────────────────────────────────────────────────────────
//

/// Final tallies for a finished quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizSummary {
    correct: u32,
    incorrect: u32,
}

impl QuizSummary {
    #[must_use]
    pub fn new(correct: u32, incorrect: u32) -> Self {
        Self { correct, incorrect }
    }

    #[must_use]
    pub fn correct(&self) -> u32 {
        self.correct
    }

    #[must_use]
    pub fn incorrect(&self) -> u32 {
        self.incorrect
    }

    /// Correct rate rounded to a whole percent, or `None` when no question
    /// was ever tallied.
    #[must_use]
    pub fn percent_correct(&self) -> Option<u32> {
        let total = u64::from(self.correct) + u64::from(self.incorrect);
        if total == 0 {
            return None;
        }
        #[allow(clippy::cast_precision_loss)]
        let rate = f64::from(self.correct) * 100.0 / total as f64;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let rounded = rate.round() as u32;
        Some(rounded)
    }
}

//
// ─── PERSISTED FORM ────────────────────────────────────────────────────────────
//

/// Wire form of [`ActiveQuiz`] as held in the platform's session store.
///
/// Rehydration re-checks the position invariant; a snapshot that violates
/// it is rejected rather than resumed.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct QuizSnapshot {
    category: String,
    quiz_id: QuizId,
    questions: Vec<QuestionCard>,
    position: usize,
    correct: u32,
    incorrect: u32,
    tries: u32,
    started_at: DateTime<Utc>,
}

impl TryFrom<QuizSnapshot> for ActiveQuiz {
    type Error = QuizStateError;

    fn try_from(snapshot: QuizSnapshot) -> Result<Self, Self::Error> {
        if snapshot.questions.is_empty() {
            return Err(QuizStateError::Empty);
        }
        if snapshot.position >= snapshot.questions.len() {
            return Err(QuizStateError::PositionOutOfBounds {
                position: snapshot.position,
                len: snapshot.questions.len(),
            });
        }
        Ok(Self {
            category: snapshot.category,
            quiz_id: snapshot.quiz_id,
            questions: snapshot.questions,
            position: snapshot.position,
            correct: snapshot.correct,
            incorrect: snapshot.incorrect,
            tries: snapshot.tries,
            started_at: snapshot.started_at,
        })
    }
}

impl From<ActiveQuiz> for QuizSnapshot {
    fn from(quiz: ActiveQuiz) -> Self {
        Self {
            category: quiz.category,
            quiz_id: quiz.quiz_id,
            questions: quiz.questions,
            position: quiz.position,
            correct: quiz.correct,
            incorrect: quiz.incorrect,
            tries: quiz.tries,
            started_at: quiz.started_at,
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    const TRIES_LIMIT: u32 = 3;

    fn build_quiz(terms: &[&str]) -> ActiveQuiz {
        let questions = terms
            .iter()
            .map(|t| QuestionCard::new(*t, format!("definition of {t}")))
            .collect();
        ActiveQuiz::new("science", QuizId::new(224426529), questions, fixed_now()).unwrap()
    }

    fn expect_continue(step: Step) -> ActiveQuiz {
        match step {
            Step::Continue(quiz) => quiz,
            Step::Finished(summary) => panic!("quiz finished early: {summary:?}"),
        }
    }

    #[test]
    fn empty_question_list_is_rejected() {
        let err =
            ActiveQuiz::new("math", QuizId::new(1), Vec::new(), fixed_now()).unwrap_err();
        assert_eq!(err, QuizStateError::Empty);
    }

    #[test]
    fn first_try_correct_counts_once() {
        let quiz = build_quiz(&["a", "b"]);
        let AnswerOutcome::Correct(step) = quiz.answer("a", TRIES_LIMIT) else {
            panic!("expected correct");
        };
        let quiz = expect_continue(step);
        assert_eq!(quiz.correct(), 1);
        assert_eq!(quiz.incorrect(), 0);
        assert_eq!(quiz.position(), 1);
        assert_eq!(quiz.tries(), 0);
    }

    #[test]
    fn correct_after_wrong_attempts_does_not_count() {
        let mut quiz = build_quiz(&["a", "b"]);
        for attempt in 1..TRIES_LIMIT {
            quiz = match quiz.answer("nope", TRIES_LIMIT) {
                AnswerOutcome::TryAgain(q) => q,
                other => panic!("expected retry, got {other:?}"),
            };
            assert_eq!(quiz.tries(), attempt);
            assert_eq!(quiz.position(), 0, "retry stays on the same question");
        }

        // One wrong question, tallied exactly once.
        assert_eq!(quiz.incorrect(), 1);

        let AnswerOutcome::Correct(step) = quiz.answer("a", TRIES_LIMIT) else {
            panic!("expected correct");
        };
        let quiz = expect_continue(step);
        assert_eq!(quiz.correct(), 0);
        assert_eq!(quiz.incorrect(), 1);
        assert_eq!(quiz.position(), 1);
    }

    #[test]
    fn tries_limit_reveals_and_advances() {
        let mut quiz = build_quiz(&["a", "b"]);
        for _ in 1..TRIES_LIMIT {
            quiz = match quiz.answer("nope", TRIES_LIMIT) {
                AnswerOutcome::TryAgain(q) => q,
                other => panic!("expected retry, got {other:?}"),
            };
        }
        let AnswerOutcome::Revealed { term, step } = quiz.answer("nope", TRIES_LIMIT) else {
            panic!("expected reveal");
        };
        assert_eq!(term, "a");
        let quiz = expect_continue(step);
        assert_eq!(quiz.incorrect(), 1, "wrong attempts tally once, not per try");
        assert_eq!(quiz.position(), 1);
        assert_eq!(quiz.tries(), 0);
    }

    #[test]
    fn answering_last_question_finishes() {
        let quiz = build_quiz(&["only"]);
        let AnswerOutcome::Correct(Step::Finished(summary)) = quiz.answer("only", TRIES_LIMIT)
        else {
            panic!("expected completion");
        };
        assert_eq!(summary.correct(), 1);
        assert_eq!(summary.incorrect(), 0);
    }

    #[test]
    fn skip_counts_incorrect_only_when_untallied() {
        let quiz = build_quiz(&["a", "b", "c"]);
        let (term, step) = quiz.skip();
        assert_eq!(term, "a");
        let quiz = expect_continue(step);
        assert_eq!(quiz.incorrect(), 1);

        // A wrong attempt already tallied this question; skip adds nothing.
        let AnswerOutcome::TryAgain(quiz) = quiz.answer("nope", TRIES_LIMIT) else {
            panic!("expected retry");
        };
        assert_eq!(quiz.incorrect(), 2);
        let (term, step) = quiz.skip();
        assert_eq!(term, "b");
        let quiz = expect_continue(step);
        assert_eq!(quiz.incorrect(), 2);
        assert_eq!(quiz.tries(), 0);
    }

    #[test]
    fn percent_correct_rounds() {
        assert_eq!(QuizSummary::new(3, 1).percent_correct(), Some(75));
        assert_eq!(QuizSummary::new(0, 1).percent_correct(), Some(0));
        assert_eq!(QuizSummary::new(1, 2).percent_correct(), Some(33));
        assert_eq!(QuizSummary::new(2, 1).percent_correct(), Some(67));
        assert_eq!(QuizSummary::new(0, 0).percent_correct(), None);
    }

    #[test]
    fn percent_correct_does_not_overflow_on_extreme_tallies() {
        assert_eq!(
            QuizSummary::new(u32::MAX, u32::MAX).percent_correct(),
            Some(50)
        );
        assert_eq!(QuizSummary::new(u32::MAX, 0).percent_correct(), Some(100));
    }

    #[test]
    fn snapshot_roundtrip_preserves_state() {
        let mut quiz = build_quiz(&["a", "b", "c"]);
        quiz = match quiz.answer("a", TRIES_LIMIT) {
            AnswerOutcome::Correct(Step::Continue(q)) => q,
            other => panic!("unexpected {other:?}"),
        };

        let json = serde_json::to_string(&SessionState::QuizActive(quiz.clone())).unwrap();
        let restored: SessionState = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, SessionState::QuizActive(quiz));
    }

    #[test]
    fn out_of_bounds_snapshot_is_rejected() {
        let json = serde_json::json!({
            "QuizActive": {
                "category": "math",
                "quiz_id": 1,
                "questions": [{"term": "a", "definition": "d"}],
                "position": 1,
                "correct": 0,
                "incorrect": 0,
                "tries": 0,
                "started_at": "2023-11-14T22:13:20Z"
            }
        });
        let result: Result<SessionState, _> = serde_json::from_value(json);
        assert!(result.is_err());
    }

    #[test]
    fn reset_clears_category() {
        let state = SessionState::QuizActive(build_quiz(&["a"]));
        assert!(state.is_quiz_active());
        assert_eq!(state.category(), Some("science"));
        let state = state.reset_quiz();
        assert_eq!(state, SessionState::Idle);
        assert_eq!(state.category(), None);
    }
}
