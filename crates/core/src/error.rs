use thiserror::Error;

use crate::model::QuizDefinitionError;
use crate::session::{SessionError, SummaryError};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Definition(#[from] QuizDefinitionError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Summary(#[from] SummaryError),
}
