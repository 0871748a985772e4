use serde::{Deserialize, Serialize};

use crate::model::QuizId;

/// One quiz offered by a category: its spoken name and the provider's
/// set identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizListing {
    pub name: String,
    pub id: QuizId,
}

/// A category and the quizzes it offers, in announcement order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryListing {
    pub name: String,
    pub quizzes: Vec<QuizListing>,
}

/// Read-only catalog of categories and their quizzes, injected into the
/// turn processor at construction time.
///
/// Lookups by category or quiz name degrade gracefully: an unknown
/// category simply has no quizzes, and an unknown quiz name resolves to
/// nothing. Matching is on the exact spoken name.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QuizCatalog {
    categories: Vec<CategoryListing>,
}

impl QuizCatalog {
    #[must_use]
    pub fn new(categories: Vec<CategoryListing>) -> Self {
        Self { categories }
    }

    /// Spoken names of the quizzes available in `category`, in order.
    ///
    /// Empty for a category the catalog does not know.
    #[must_use]
    pub fn quizzes_in(&self, category: &str) -> Vec<&str> {
        self.categories
            .iter()
            .filter(|listing| listing.name == category)
            .flat_map(|listing| listing.quizzes.iter().map(|quiz| quiz.name.as_str()))
            .collect()
    }

    /// Resolve a spoken quiz name to the provider's set identifier.
    #[must_use]
    pub fn resolve(&self, quiz_name: &str) -> Option<QuizId> {
        self.categories
            .iter()
            .flat_map(|listing| listing.quizzes.iter())
            .find(|quiz| quiz.name == quiz_name)
            .map(|quiz| quiz.id)
    }

    #[must_use]
    pub fn categories(&self) -> &[CategoryListing] {
        &self.categories
    }

    /// The built-in study catalog: three categories, seven quizzes.
    #[must_use]
    pub fn study_defaults() -> Self {
        fn listing(name: &str, quizzes: &[(&str, u64)]) -> CategoryListing {
            CategoryListing {
                name: name.to_string(),
                quizzes: quizzes
                    .iter()
                    .map(|(quiz, id)| QuizListing {
                        name: (*quiz).to_string(),
                        id: QuizId::new(*id),
                    })
                    .collect(),
            }
        }

        Self::new(vec![
            listing(
                "history",
                &[
                    ("war of eighteen twelve", 224419706),
                    ("ancient greeks", 224423901),
                    ("world war two", 224423253),
                ],
            ),
            listing(
                "science",
                &[("anatomy of a cell", 224426220), ("taxonomy", 224426529)],
            ),
            listing(
                "math",
                &[("multiplication tables", 224427231), ("geometry", 224427531)],
            ),
        ])
    }
}
