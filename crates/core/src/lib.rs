#![forbid(unsafe_code)]

pub mod catalog;
pub mod model;
pub mod time;

pub use catalog::QuizCatalog;
pub use time::Clock;
