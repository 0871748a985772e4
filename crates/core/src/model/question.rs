use serde::{Deserialize, Serialize};

/// One term/definition pair from a quiz set.
///
/// The `definition` is the prompt read to the user; the `term` is the
/// expected spoken answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionCard {
    term: String,
    definition: String,
}

impl QuestionCard {
    #[must_use]
    pub fn new(term: impl Into<String>, definition: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            definition: definition.into(),
        }
    }

    #[must_use]
    pub fn term(&self) -> &str {
        &self.term
    }

    #[must_use]
    pub fn definition(&self) -> &str {
        &self.definition
    }

    /// Whether the spoken answer matches this card's term.
    ///
    /// Comparison is a case-sensitive exact match.
    #[must_use]
    pub fn matches(&self, answer: &str) -> bool {
        self.term == answer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_is_exact() {
        let card = QuestionCard::new("mitochondria", "the powerhouse of the cell");
        assert!(card.matches("mitochondria"));
        assert!(!card.matches("Mitochondria"));
        assert!(!card.matches("mitochondria "));
    }
}
