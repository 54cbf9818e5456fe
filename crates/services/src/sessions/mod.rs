mod progress;
mod runner;

// Public API of the session subsystem.
pub use crate::error::RunError;
pub use progress::SessionProgress;
pub use runner::{QuizSessionRunner, SessionOutcome, SessionUpdate};
