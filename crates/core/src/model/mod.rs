mod ids;
mod question;
mod session;

pub use ids::{ParseIdError, QuizId};
pub use question::QuestionCard;
pub use session::{ActiveQuiz, AnswerOutcome, QuizStateError, QuizSummary, SessionState, Step};
