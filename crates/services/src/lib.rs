#![forbid(unsafe_code)]

pub mod error;
pub mod quiz_service;
pub mod sessions;
pub mod source;

pub use quiz_core::Clock;
pub use sessions as session;

pub use error::{FetchError, RunError};
pub use quiz_service::QuizService;
pub use sessions::{QuizSessionRunner, SessionOutcome, SessionProgress, SessionUpdate};
pub use source::{HttpQuizSource, QuizSource, QuizSourceConfig, StaticQuizSource};
