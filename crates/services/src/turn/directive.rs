use quiz_core::model::SessionState;

/// One requested quiz operation, decoded from the platform event by the
/// dispatch layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SelectCategory { category: String },
    SelectQuiz { quiz: String },
    SubmitAnswer { answer: String },
    RepeatQuestion,
    SkipQuestion,
    EndQuiz,
}

/// The response payload for one turn: what to say, what to reprompt with,
/// and whether the conversation ends here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    pub title: String,
    pub speech_text: String,
    pub reprompt_text: Option<String>,
    pub should_end_session: bool,
}

impl Directive {
    /// A directive that keeps the session open and reprompts if the user
    /// stays silent.
    #[must_use]
    pub fn ask(
        title: impl Into<String>,
        speech_text: impl Into<String>,
        reprompt_text: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            speech_text: speech_text.into(),
            reprompt_text: Some(reprompt_text.into()),
            should_end_session: false,
        }
    }

    /// A directive with no reprompt; the session stays open.
    #[must_use]
    pub fn say(title: impl Into<String>, speech_text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            speech_text: speech_text.into(),
            reprompt_text: None,
            should_end_session: false,
        }
    }

    /// A directive that closes the session after speaking.
    #[must_use]
    pub fn farewell(title: impl Into<String>, speech_text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            speech_text: speech_text.into(),
            reprompt_text: None,
            should_end_session: true,
        }
    }
}

/// The state to persist for the next turn plus the directive to speak.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnOutcome {
    pub state: SessionState,
    pub directive: Directive,
}

impl TurnOutcome {
    #[must_use]
    pub fn new(state: SessionState, directive: Directive) -> Self {
        Self { state, directive }
    }
}
