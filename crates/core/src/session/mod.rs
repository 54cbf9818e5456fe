mod controller;
mod state;
mod summary;

pub use controller::{Operation, SessionController, SessionError};
pub use state::{FinishReason, SessionPhase, SessionState};
pub use summary::{QuizSummary, SummaryError};
