//! Fetch collaborator: where quiz documents come from.

mod http;
mod wire;

use async_trait::async_trait;

use crate::error::FetchError;

pub use http::{HttpQuizSource, QuizSourceConfig};
pub use wire::{Marks, OptionPayload, QuestionPayload, QuizPayload, parse_payload};

/// Something that can hand over a quiz document.
#[async_trait]
pub trait QuizSource: Send + Sync {
    async fn fetch(&self) -> Result<QuizPayload, FetchError>;
}

/// Serves a payload held in memory, e.g. a local JSON file or a test fixture.
#[derive(Debug, Clone)]
pub struct StaticQuizSource {
    payload: QuizPayload,
}

impl StaticQuizSource {
    #[must_use]
    pub fn new(payload: QuizPayload) -> Self {
        Self { payload }
    }

    /// Parse a JSON document up front.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Decode` if the document is not a quiz payload.
    pub fn from_json(body: &str) -> Result<Self, FetchError> {
        parse_payload(body).map(Self::new)
    }
}

#[async_trait]
impl QuizSource for StaticQuizSource {
    async fn fetch(&self) -> Result<QuizPayload, FetchError> {
        Ok(self.payload.clone())
    }
}
