#![forbid(unsafe_code)]

pub mod error;
pub mod model;
pub mod session;
pub mod time;

pub use error::Error;
pub use session::{
    FinishReason, QuizSummary, SessionController, SessionError, SessionPhase, SessionState,
};
pub use time::Clock;
