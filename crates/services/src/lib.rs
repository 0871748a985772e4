#![forbid(unsafe_code)]

pub mod dispatch;
pub mod error;
pub mod quiz_source;
pub mod turn;

pub use quiz_core::Clock;

pub use dispatch::{EventRouter, Request};
pub use error::{QuizSourceError, TurnError};
pub use quiz_source::{QuizSource, QuizletClient, QuizletConfig, StaticQuizSource};
pub use turn::{Action, Directive, TurnOutcome, TurnProcessor};
