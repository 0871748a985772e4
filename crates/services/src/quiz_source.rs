use std::collections::HashMap;
use std::env;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use quiz_core::model::{QuestionCard, QuizId};

use crate::error::QuizSourceError;

/// The injected fetch capability for quiz sets.
///
/// `selectQuiz` is the only operation that suspends; it awaits exactly one
/// fetch and the turn does not complete until that fetch resolves or fails.
#[async_trait]
pub trait QuizSource: Send + Sync {
    /// Fetch the question list for a quiz set.
    ///
    /// # Errors
    ///
    /// Returns `QuizSourceError` on network failure, a non-success status,
    /// a malformed payload, or an unknown set id.
    async fn fetch_quiz_set(&self, id: QuizId) -> Result<Vec<QuestionCard>, QuizSourceError>;
}

//
// ─── QUIZLET CLIENT ────────────────────────────────────────────────────────────
//

#[derive(Clone, Debug)]
pub struct QuizletConfig {
    pub base_url: String,
    pub client_id: String,
}

impl QuizletConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>, client_id: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client_id: client_id.into(),
        }
    }

    #[must_use]
    pub fn from_env() -> Option<Self> {
        let client_id = env::var("QUIZLET_CLIENT_ID").ok()?;
        if client_id.trim().is_empty() {
            return None;
        }
        let base_url = env::var("QUIZLET_BASE_URL")
            .unwrap_or_else(|_| "https://api.quizlet.com/2.0/sets".into());
        Some(Self {
            base_url,
            client_id,
        })
    }
}

/// Fetches quiz sets from the Quizlet terms endpoint.
#[derive(Clone)]
pub struct QuizletClient {
    client: Client,
    config: QuizletConfig,
}

impl QuizletClient {
    #[must_use]
    pub fn new(config: QuizletConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }
}

#[async_trait]
impl QuizSource for QuizletClient {
    async fn fetch_quiz_set(&self, id: QuizId) -> Result<Vec<QuestionCard>, QuizSourceError> {
        let url = format!(
            "{}/{}/terms?client_id={}",
            self.config.base_url.trim_end_matches('/'),
            id.value(),
            self.config.client_id
        );
        debug!(quiz_id = %id, "fetching quiz set");

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(QuizSourceError::HttpStatus(response.status()));
        }

        let terms: Vec<TermDto> = response.json().await?;
        debug!(quiz_id = %id, terms = terms.len(), "quiz set fetched");

        Ok(terms
            .into_iter()
            .map(|dto| QuestionCard::new(dto.term, dto.definition))
            .collect())
    }
}

#[derive(Debug, Deserialize)]
struct TermDto {
    term: String,
    definition: String,
}

//
// ─── STATIC SOURCE ─────────────────────────────────────────────────────────────
//

/// In-memory quiz source for tests and offline runs.
#[derive(Debug, Clone, Default)]
pub struct StaticQuizSource {
    sets: HashMap<QuizId, Vec<QuestionCard>>,
}

impl StaticQuizSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_set(mut self, id: QuizId, questions: Vec<QuestionCard>) -> Self {
        self.sets.insert(id, questions);
        self
    }
}

#[async_trait]
impl QuizSource for StaticQuizSource {
    async fn fetch_quiz_set(&self, id: QuizId) -> Result<Vec<QuestionCard>, QuizSourceError> {
        self.sets
            .get(&id)
            .cloned()
            .ok_or(QuizSourceError::UnknownSet(id))
    }
}
