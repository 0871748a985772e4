//! Routes decoded platform events onto turn-processor actions.
//!
//! The transport layer is responsible for unwrapping its own envelope; what
//! arrives here is already one of the three event kinds with the intent
//! name and slot values extracted.

use std::collections::HashMap;

use tracing::{debug, info};

use quiz_core::model::SessionState;

use crate::error::TurnError;
use crate::turn::speech;
use crate::turn::{Action, Directive, TurnOutcome, TurnProcessor};

/// One inbound conversational event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// The user opened the skill without asking for anything.
    Launch,
    /// A recognized utterance with its slot values.
    Intent {
        name: String,
        slots: HashMap<String, String>,
    },
    /// The platform closed the session; no response is expected.
    SessionEnded,
}

impl Request {
    #[must_use]
    pub fn intent(name: impl Into<String>) -> Self {
        Self::Intent {
            name: name.into(),
            slots: HashMap::new(),
        }
    }

    #[must_use]
    pub fn intent_with_slot(
        name: impl Into<String>,
        slot: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::Intent {
            name: name.into(),
            slots: HashMap::from([(slot.into(), value.into())]),
        }
    }
}

/// Per-conversation event router.
///
/// The caller owns serialization: it must persist the returned state and
/// fully await each turn before feeding the next event for the same
/// conversation.
pub struct EventRouter {
    processor: TurnProcessor,
}

impl EventRouter {
    #[must_use]
    pub fn new(processor: TurnProcessor) -> Self {
        Self { processor }
    }

    #[must_use]
    pub fn processor(&self) -> &TurnProcessor {
        &self.processor
    }

    /// Handle one event against the conversation's current state.
    ///
    /// Returns `None` for `SessionEnded`, which takes no response.
    ///
    /// # Errors
    ///
    /// Returns `TurnError::UnknownIntent` for an intent name outside the
    /// supported set, `TurnError::MissingSlot` when a required slot value
    /// is absent, and propagates fetch failures from quiz selection.
    pub async fn handle(
        &self,
        state: SessionState,
        request: Request,
    ) -> Result<Option<TurnOutcome>, TurnError> {
        match request {
            Request::Launch => {
                info!("session launched");
                Ok(Some(TurnOutcome::new(
                    SessionState::empty(),
                    Directive::ask("Welcome", speech::WELCOME, speech::PICK_CATEGORY_REPROMPT),
                )))
            }
            Request::SessionEnded => {
                info!("session ended by platform");
                Ok(None)
            }
            Request::Intent { name, slots } => {
                debug!(intent = %name, "routing intent");
                if is_end_request(&name) {
                    return Ok(Some(TurnOutcome::new(
                        SessionState::empty(),
                        Directive::farewell("Session Ended", speech::GOODBYE),
                    )));
                }
                let action = decode_action(&name, &slots)?;
                let outcome = self.processor.process(state, action).await?;
                Ok(Some(outcome))
            }
        }
    }
}

fn is_end_request(intent: &str) -> bool {
    matches!(intent, "AMAZON.StopIntent" | "AMAZON.CancelIntent" | "endSkill")
}

fn decode_action(intent: &str, slots: &HashMap<String, String>) -> Result<Action, TurnError> {
    let slot = |name: &str| -> Result<String, TurnError> {
        slots
            .get(name)
            .cloned()
            .ok_or_else(|| TurnError::MissingSlot {
                intent: intent.to_string(),
                slot: name.to_string(),
            })
    };

    match intent {
        "categorySelect" => Ok(Action::SelectCategory {
            category: slot("category")?,
        }),
        "quizSelect" => Ok(Action::SelectQuiz {
            quiz: slot("quiz")?,
        }),
        "answerQuestion" => Ok(Action::SubmitAnswer {
            answer: slot("answer")?,
        }),
        "repeatQuestion" => Ok(Action::RepeatQuestion),
        "skipQuestion" => Ok(Action::SkipQuestion),
        "endQuiz" => Ok(Action::EndQuiz),
        other => Err(TurnError::UnknownIntent(other.to_string())),
    }
}
