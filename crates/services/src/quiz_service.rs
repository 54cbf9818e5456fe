use std::sync::Arc;

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{error, info};

use quiz_core::model::QuizDefinition;

use crate::error::FetchError;
use crate::source::QuizSource;

/// Loads a playable quiz definition from a `QuizSource`.
#[derive(Clone)]
pub struct QuizService {
    source: Arc<dyn QuizSource>,
    shuffle_options: bool,
}

impl QuizService {
    #[must_use]
    pub fn new(source: Arc<dyn QuizSource>) -> Self {
        Self {
            source,
            shuffle_options: false,
        }
    }

    /// Shuffle option order even when the document does not ask for it.
    #[must_use]
    pub fn with_shuffle_options(mut self, shuffle_options: bool) -> Self {
        self.shuffle_options = shuffle_options;
        self
    }

    /// Fetch, convert and validate the quiz.
    ///
    /// The definition comes back behind an `Arc` so restarts can share it.
    ///
    /// # Errors
    ///
    /// Returns `FetchError` when the source fails, the document cannot be
    /// converted, or the resulting definition is not playable.
    pub async fn load(&self) -> Result<Arc<QuizDefinition>, FetchError> {
        let definition = self.load_inner().await.inspect_err(|err| {
            error!(error = %err, "failed to load quiz");
        })?;
        info!(
            title = %definition.title,
            questions = definition.questions.len(),
            duration_seconds = definition.duration_seconds,
            "quiz loaded"
        );
        Ok(Arc::new(definition))
    }

    async fn load_inner(&self) -> Result<QuizDefinition, FetchError> {
        let payload = self.source.fetch().await?;
        let shuffle = self.shuffle_options || payload.shuffle;

        let mut definition = payload.into_definition()?;
        if shuffle {
            shuffle_options(&mut definition, &mut rand::rng());
        }
        definition.validate()?;
        Ok(definition)
    }
}

fn shuffle_options<R: Rng + ?Sized>(definition: &mut QuizDefinition, rng: &mut R) {
    for question in &mut definition.questions {
        question.options.shuffle(rng);
    }
}
