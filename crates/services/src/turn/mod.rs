mod directive;
mod processor;
pub(crate) mod speech;

// Public API of the turn subsystem.
pub use crate::error::TurnError;
pub use directive::{Action, Directive, TurnOutcome};
pub use processor::TurnProcessor;
